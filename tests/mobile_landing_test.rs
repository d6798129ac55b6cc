use tui_palace::core::{Blueprint, Engine, EngineConfig};
use tui_palace::demo::{self, demo_level};
use tui_palace::types::{BlockAddr, ObjectId, BLOCK_BOTTOM};

fn addr(screen: u8, block: u8) -> BlockAddr {
    BlockAddr::new(screen, block).unwrap()
}

/// Step until no MOB is left, returning the number of steps taken.
fn run_until_landed(engine: &mut Engine, limit: usize) -> usize {
    let mut seen = false;
    for n in 0..limit {
        engine.step();
        if !engine.mobs().is_empty() {
            seen = true;
        } else if seen {
            return n;
        }
    }
    panic!("no landing within {limit} steps");
}

#[test]
fn falling_floor_becomes_rubble_on_the_tick_it_lands() {
    let top = addr(1, 3);
    let landing = addr(1, 13);
    let mut bp = Blueprint::empty();
    bp.place(top, ObjectId::LooseFloor, 0);
    bp.place(landing, ObjectId::Floor, 0);
    let mut engine = Engine::new(bp, EngineConfig::default());

    engine.loose_floor_trigger(top).unwrap();
    let mut seen = false;
    for _ in 0..60 {
        let before = engine.mobs().len();
        engine.step();
        if before == 1 {
            seen = true;
        }
        if seen && engine.mobs().is_empty() {
            // Removed and mutated within the same step.
            assert_eq!(engine.blueprint().object(landing), ObjectId::Rubble);
            assert_eq!(engine.blueprint().object(top), ObjectId::Space);
            return;
        }
        assert_eq!(engine.blueprint().object(landing), ObjectId::Floor);
    }
    panic!("falling floor never landed");
}

#[test]
fn falling_floor_crosses_into_the_screen_below() {
    let mut engine = Engine::new(demo_level(), EngineConfig::default());
    engine.loose_floor_trigger(demo::LOOSE_DROP).unwrap();

    let mut visited_lower_screen = false;
    for _ in 0..80 {
        engine.step();
        if engine.mobs().iter().any(|m| m.screen == demo::DROP_LANDING.screen()) {
            visited_lower_screen = true;
        }
    }
    assert!(visited_lower_screen);
    assert!(engine.mobs().is_empty());
    assert_eq!(engine.blueprint().object(demo::DROP_LANDING), ObjectId::Rubble);
}

#[test]
fn falling_off_the_bottom_of_the_level_changes_nothing() {
    let drop = addr(5, 27);
    let mut bp = Blueprint::empty();
    bp.place(drop, ObjectId::LooseFloor, 0);
    let mut engine = Engine::new(bp, EngineConfig::default());

    engine.loose_floor_trigger(drop).unwrap();
    let before = engine.blueprint().clone();
    run_until_landed(&mut engine, 80);

    // Only the loose floor itself vanished.
    for screen in 1..=24u8 {
        for a in Blueprint::screen_blocks(screen) {
            if a != drop {
                assert_eq!(engine.blueprint().blue_type(a), before.blue_type(a));
            }
        }
    }
}

#[test]
fn landing_on_a_plate_jams_it() {
    let top = addr(2, 4);
    let plate = addr(2, 14);
    let mut bp = Blueprint::empty();
    bp.place(top, ObjectId::LooseFloor, 0);
    bp.place(plate, ObjectId::PressPlate, 0);
    let mut engine = Engine::new(bp, EngineConfig::default());

    engine.loose_floor_trigger(top).unwrap();
    run_until_landed(&mut engine, 60);
    assert_eq!(engine.blueprint().object(plate), ObjectId::StuckPlate);
}

#[test]
fn landing_on_masonry_shatters() {
    let top = addr(2, 5);
    let wall = addr(2, 15);
    let mut bp = Blueprint::empty();
    bp.place(top, ObjectId::LooseFloor, 0);
    bp.place(wall, ObjectId::Pillar, 0);
    let mut engine = Engine::new(bp, EngineConfig::default());

    engine.loose_floor_trigger(top).unwrap();
    run_until_landed(&mut engine, 60);
    assert_eq!(engine.blueprint().object(wall), ObjectId::Pillar);
}

#[test]
fn fall_speed_never_exceeds_terminal_velocity() {
    let top = addr(6, 7);
    let mut bp = Blueprint::empty();
    bp.place(top, ObjectId::LooseFloor, 0);
    let config = EngineConfig::default();
    let mut engine = Engine::new(bp, config);

    engine.loose_floor_trigger(top).unwrap();
    let mut fastest = 0;
    for _ in 0..60 {
        engine.step();
        for mob in engine.mobs().iter() {
            assert!(mob.velocity <= config.anim.mob_terminal_velocity);
            assert!(mob.y <= BLOCK_BOTTOM[2] + config.anim.mob_terminal_velocity);
            fastest = fastest.max(mob.velocity);
        }
    }
    assert!(fastest > 0);
    assert!(engine.mobs().is_empty());
}
