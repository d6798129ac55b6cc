use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_palace::core::{Engine, EngineConfig, ImageListBuilder, NoCharacters, TriggerEvent, TriggerKind};
use tui_palace::demo::{self, demo_level};
use tui_palace::replay::DrawListHasher;
use tui_palace::term::{BlockView, FrameBuffer, PalaceView, RunnerStatus, Viewport};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

/// Triggers fired during the counted run, by cycle offset.
fn events_at(n: u64) -> &'static [TriggerEvent] {
    const PLATE: [TriggerEvent; 1] = [TriggerEvent::new(TriggerKind::Plate, demo::PLATE)];
    const SPIKES: [TriggerEvent; 1] = [TriggerEvent::new(TriggerKind::Spike, demo::SPIKES)];
    const LOOSE: [TriggerEvent; 2] = [
        TriggerEvent::new(TriggerKind::LooseFloor, demo::LOOSE_TOP),
        TriggerEvent::new(TriggerKind::LooseFloor, demo::LOOSE_DROP),
    ];
    match n {
        3 => &PLATE,
        10 => &SPIKES,
        20 => &LOOSE,
        // Already running: rejected or ignored without allocating.
        25 => &PLATE,
        _ => &[],
    }
}

// One test per binary: the counter is process-wide.
#[test]
fn cycle_and_render_are_allocation_free_after_warmup() {
    let mut engine = Engine::new(demo_level(), EngineConfig::default());
    let mut lists = ImageListBuilder::new();
    let mut view = BlockView::new();
    let mut hasher = DrawListHasher::default();
    let palace = PalaceView::default();
    let status = RunnerStatus {
        cursor: Some(demo::PLATE),
        ..RunnerStatus::default()
    };
    let viewport = Viewport::new(80, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    // Warm-up.
    engine.run_cycle(&[], &NoCharacters, &mut lists, &mut view);
    palace.render_into(&view, &engine, &status, viewport, &mut fb);

    let mut fingerprints = 0u64;
    let allocs = with_alloc_counting(|| {
        for n in 0..200 {
            view.begin_frame();
            engine.run_cycle(events_at(n), &NoCharacters, &mut lists, &mut view);
            palace.render_into(&view, &engine, &status, viewport, &mut fb);
            fingerprints ^= engine.fingerprint();
        }
    });
    assert!(allocs == 0);
    assert!(fingerprints != 0);

    engine.reset();
    let allocs = with_alloc_counting(|| {
        for n in 0..200 {
            engine.run_cycle(events_at(n), &NoCharacters, &mut lists, &mut hasher);
            fingerprints ^= hasher.take();
        }
    });
    assert!(allocs == 0);
}
