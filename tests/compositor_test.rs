use tui_palace::core::image_list::{LayerImage, MidImage, Peel, WipeRect};
use tui_palace::core::{
    Engine, EngineConfig, ImageListBuilder, LayerRenderer, NoCharacters, TriggerEvent, TriggerKind,
};
use tui_palace::demo::{self, demo_level};
use tui_palace::types::{ImageTable, ObjectId, Opacity, BLOCKS_PER_SCREEN};

/// Remembers the order of layer calls and the last frame's lists.
#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
    general: Vec<Peel>,
    wipe: Vec<WipeRect>,
    back: Vec<LayerImage>,
    mid: Vec<MidImage>,
    fore: Vec<LayerImage>,
    message: Vec<LayerImage>,
}

impl Recorder {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// The renderer saw exactly what the builder holds.
    fn matches(&self, lists: &ImageListBuilder) -> bool {
        self.general == lists.general()
            && self.wipe == lists.wipe()
            && self.back == lists.back()
            && self.mid == lists.mid()
            && self.fore == lists.fore()
            && self.message == lists.message()
    }

    fn frame_is_empty(&self) -> bool {
        self.general.is_empty()
            && self.wipe.is_empty()
            && self.back.is_empty()
            && self.mid.is_empty()
            && self.fore.is_empty()
            && self.message.is_empty()
    }
}

impl LayerRenderer for Recorder {
    fn draw_general(&mut self, peels: &[Peel]) {
        self.calls.push("general");
        self.general = peels.to_vec();
    }

    fn draw_wipe(&mut self, rects: &[WipeRect]) {
        self.calls.push("wipe");
        self.wipe = rects.to_vec();
    }

    fn draw_back(&mut self, images: &[LayerImage]) {
        self.calls.push("back");
        self.back = images.to_vec();
    }

    fn draw_mid(&mut self, images: &[MidImage]) {
        self.calls.push("mid");
        self.mid = images.to_vec();
    }

    fn draw_fore(&mut self, images: &[LayerImage]) {
        self.calls.push("fore");
        self.fore = images.to_vec();
    }

    fn draw_message(&mut self, images: &[LayerImage]) {
        self.calls.push("message");
        self.message = images.to_vec();
    }
}

fn cycle(engine: &mut Engine, events: &[TriggerEvent], lists: &mut ImageListBuilder, rec: &mut Recorder) {
    rec.reset();
    engine.run_cycle(events, &NoCharacters, lists, rec);
}

#[test]
fn layers_are_flushed_in_fixed_order() {
    let mut engine = Engine::new(demo_level(), EngineConfig::default());
    let mut lists = ImageListBuilder::new();
    let mut rec = Recorder::default();

    cycle(&mut engine, &[], &mut lists, &mut rec);
    assert_eq!(rec.calls, ["general", "wipe", "back", "mid", "fore", "message"]);
}

#[test]
fn first_frame_redraws_the_whole_screen() {
    let mut engine = Engine::new(demo_level(), EngineConfig::default());
    let mut lists = ImageListBuilder::new();
    let mut rec = Recorder::default();

    cycle(&mut engine, &[], &mut lists, &mut rec);
    // Every block is peeled and has its background stored.
    assert_eq!(rec.general.len(), BLOCKS_PER_SCREEN);
    let stored = rec.back.iter().filter(|i| i.opacity == Opacity::Store).count();
    assert!(stored >= BLOCKS_PER_SCREEN);
    // The gate's front post goes in front of characters.
    assert!(rec.fore.iter().any(|i| i.image.table == ImageTable::Foreground
        && i.image.index == ObjectId::Gate.bits()
        && (i.x, i.y) == (demo::GATE_NEAR.x(), demo::GATE_NEAR.y())));
    assert!(rec.matches(&lists));
    assert_eq!(lists.dropped(), 0);
}

#[test]
fn clean_screen_produces_empty_lists() {
    let config = EngineConfig::default();
    let mut engine = Engine::new(demo_level(), config);
    let mut lists = ImageListBuilder::new();
    let mut rec = Recorder::default();

    for _ in 0..config.render.redraw_passes {
        cycle(&mut engine, &[], &mut lists, &mut rec);
    }
    cycle(&mut engine, &[], &mut lists, &mut rec);
    assert!(rec.frame_is_empty());
}

#[test]
fn spike_trigger_redraws_its_block() {
    let config = EngineConfig::default();
    let mut engine = Engine::new(demo_level(), config);
    let mut lists = ImageListBuilder::new();
    let mut rec = Recorder::default();
    for _ in 0..=config.render.redraw_passes {
        cycle(&mut engine, &[], &mut lists, &mut rec);
    }

    let trigger = [TriggerEvent::new(TriggerKind::Spike, demo::SPIKES)];
    let mut saw_spikes = false;
    for n in 0..8 {
        let events: &[TriggerEvent] = if n == 0 { &trigger } else { &[] };
        cycle(&mut engine, events, &mut lists, &mut rec);

        // Nothing but the spike block is touched.
        for peel in &rec.general {
            assert_eq!((peel.x, peel.y), (demo::SPIKES.x(), demo::SPIKES.y()));
        }
        saw_spikes |= rec.back.iter().any(|i| {
            i.image.table == ImageTable::Movable
                && i.image.index == ObjectId::Spikes.bits()
                && i.image.variant > 0
                && (i.x, i.y) == (demo::SPIKES.x(), demo::SPIKES.y())
        });
    }
    assert!(saw_spikes);
}

#[test]
fn gate_motion_uses_the_movable_channel() {
    let config = EngineConfig::default();
    let mut engine = Engine::new(demo_level(), config);
    let mut lists = ImageListBuilder::new();
    let mut rec = Recorder::default();
    for _ in 0..=config.render.redraw_passes {
        cycle(&mut engine, &[], &mut lists, &mut rec);
    }

    let plate = [TriggerEvent::new(TriggerKind::Plate, demo::PLATE)];
    let gate = demo::GATE_NEAR;
    let mut bar_wipes = 0;
    for n in 0..6 {
        let events: &[TriggerEvent] = if n == 0 { &plate } else { &[] };
        cycle(&mut engine, events, &mut lists, &mut rec);
        bar_wipes += rec
            .wipe
            .iter()
            .filter(|w| w.y == gate.y() && w.x > gate.x())
            .count();
    }
    assert!(bar_wipes > 0);
}
