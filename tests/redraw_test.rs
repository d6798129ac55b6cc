use tui_palace::core::{Blueprint, Engine, EngineConfig, RedrawBufferSet, ScreenLinks, VisibleScreen};
use tui_palace::types::{BlockAddr, RedrawChannel};

#[test]
fn counter_of_one_is_reported_once() {
    let mut r = RedrawBufferSet::new();
    r.mark(RedrawChannel::General, 5, 1);

    let dirty = r.consume_and_decrement();
    assert!(dirty.get(RedrawChannel::General).contains(5));
    assert_eq!(dirty.get(RedrawChannel::General).len(), 1);
    assert_eq!(r.get(RedrawChannel::General, 5), 0);

    let dirty = r.consume_and_decrement();
    assert!(dirty.is_empty());
    assert!(r.is_clean());
}

#[test]
fn general_hides_movable_and_foreground_but_they_still_count_down() {
    let mut r = RedrawBufferSet::new();
    r.mark(RedrawChannel::General, 7, 1);
    r.mark(RedrawChannel::Movable, 7, 2);
    r.mark(RedrawChannel::Foreground, 7, 1);
    r.mark(RedrawChannel::Movable, 8, 1);

    let dirty = r.consume_and_decrement();
    assert!(!dirty.get(RedrawChannel::Movable).contains(7));
    assert!(dirty.get(RedrawChannel::Movable).contains(8));
    assert!(dirty.get(RedrawChannel::Foreground).is_empty());
    assert_eq!(r.get(RedrawChannel::Movable, 7), 1);

    // General is clean now, so the remaining Movable pass shows through.
    let dirty = r.consume_and_decrement();
    assert!(dirty.get(RedrawChannel::Movable).contains(7));
    assert!(r.is_clean());
}

#[test]
fn floor_mask_hides_half_floor_mask() {
    let mut r = RedrawBufferSet::new();
    r.mark(RedrawChannel::FloorMask, 12, 1);
    r.mark(RedrawChannel::HalfFloorMask, 12, 1);
    r.mark(RedrawChannel::HalfFloorMask, 13, 1);

    let dirty = r.consume_and_decrement();
    assert!(dirty.get(RedrawChannel::FloorMask).contains(12));
    assert!(!dirty.get(RedrawChannel::HalfFloorMask).contains(12));
    assert!(dirty.get(RedrawChannel::HalfFloorMask).contains(13));
}

#[test]
fn marking_never_lowers_a_counter() {
    let mut r = RedrawBufferSet::new();
    r.mark(RedrawChannel::Object, 3, 2);
    r.mark(RedrawChannel::Object, 3, 1);
    assert_eq!(r.get(RedrawChannel::Object, 3), 2);
}

#[test]
fn bottom_row_of_screen_above_goes_to_top_channel() {
    let mut bp = Blueprint::empty();
    bp.set_screen_links(2, ScreenLinks::new(0, 0, 1, 0));
    let view = VisibleScreen::new(&bp, 2);
    assert_eq!(view.above, Some(1));

    let above_bottom = BlockAddr::new(1, 24).unwrap();
    assert_eq!(
        view.slot_for(above_bottom, RedrawChannel::General),
        Some((RedrawChannel::Top, 4))
    );
    assert_eq!(view.slot_for(BlockAddr::new(1, 4).unwrap(), RedrawChannel::General), None);
    assert_eq!(view.slot_for(BlockAddr::new(3, 4).unwrap(), RedrawChannel::General), None);
    assert_eq!(
        view.slot_for(BlockAddr::new(2, 4).unwrap(), RedrawChannel::Wipe),
        Some((RedrawChannel::Wipe, 4))
    );
}

#[test]
fn engine_requests_last_for_the_configured_passes() {
    let config = EngineConfig::default();
    let mut engine = Engine::new(Blueprint::empty(), config);
    for _ in 0..config.render.redraw_passes {
        assert!(!engine.step().is_empty());
    }
    assert!(engine.redraw().is_clean());

    let addr = BlockAddr::new(engine.visible_screen().screen, 5).unwrap();
    engine.request_redraw(addr, RedrawChannel::General);
    for _ in 0..config.render.redraw_passes {
        assert!(engine.step().get(RedrawChannel::General).contains(5));
    }
    assert!(engine.step().is_empty());
}

#[test]
fn off_screen_requests_are_ignored() {
    let mut engine = Engine::new(Blueprint::empty(), EngineConfig::default());
    engine.step();
    engine.step();
    let elsewhere = BlockAddr::new(engine.visible_screen().screen + 1, 5).unwrap();
    engine.request_redraw(elsewhere, RedrawChannel::General);
    assert!(engine.redraw().is_clean());
}
