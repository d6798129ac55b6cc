use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_palace::core::{
    Blueprint, Engine, EngineConfig, ImageListBuilder, LinkResolver, NoCharacters, TriggerEvent,
    TriggerKind,
};
use tui_palace::demo::{self, demo_level};
use tui_palace::replay::DrawListHasher;
use tui_palace::term::BlockView;

fn bench_idle_cycle(c: &mut Criterion) {
    let mut engine = Engine::new(demo_level(), EngineConfig::default());
    let mut lists = ImageListBuilder::new();
    let mut hasher = DrawListHasher::default();

    c.bench_function("idle_cycle", |b| {
        b.iter(|| {
            engine.run_cycle(&[], &NoCharacters, &mut lists, &mut hasher);
            black_box(hasher.take());
        })
    });
}

fn bench_busy_cycle(c: &mut Criterion) {
    let mut engine = Engine::new(demo_level(), EngineConfig::default());
    let mut lists = ImageListBuilder::new();
    let mut view = BlockView::new();
    let events = [
        TriggerEvent::new(TriggerKind::Plate, demo::PLATE),
        TriggerEvent::new(TriggerKind::Spike, demo::SPIKES),
        TriggerEvent::new(TriggerKind::LooseFloor, demo::LOOSE_TOP),
    ];

    c.bench_function("busy_cycle_block_view", |b| {
        b.iter(|| {
            if engine.trans().is_empty() && engine.mobs().is_empty() {
                engine.reset();
            }
            view.begin_frame();
            let report = engine.run_cycle(&events, &NoCharacters, &mut lists, &mut view);
            black_box(report);
        })
    });
}

fn bench_full_redraw(c: &mut Criterion) {
    let mut engine = Engine::new(demo_level(), EngineConfig::default());
    let mut lists = ImageListBuilder::new();
    let mut view = BlockView::new();

    c.bench_function("full_redraw", |b| {
        b.iter(|| {
            engine.set_visible_screen(black_box(1));
            engine.run_cycle(&[], &NoCharacters, &mut lists, &mut view);
        })
    });
}

fn bench_fingerprint(c: &mut Criterion) {
    let engine = Engine::new(demo_level(), EngineConfig::default());
    c.bench_function("fingerprint", |b| b.iter(|| black_box(engine.fingerprint())));
}

fn bench_link_chain(c: &mut Criterion) {
    let level: Blueprint = demo_level();
    let config = EngineConfig::default();
    let resolver = LinkResolver::new(&level.links()[..], config.capacity.link_traversal_cap);

    c.bench_function("resolve_plate_chain", |b| {
        b.iter(|| {
            for target in resolver.resolve(black_box(0)) {
                black_box(target);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_idle_cycle,
    bench_busy_cycle,
    bench_full_redraw,
    bench_fingerprint,
    bench_link_chain
);
criterion_main!(benches);
