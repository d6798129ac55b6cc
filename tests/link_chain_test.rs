use tui_palace::core::{
    Blueprint, Engine, EngineConfig, EngineError, GatePhase, LevelError, LinkEntry, LinkResolver,
    Motion, TriggerOutcome,
};
use tui_palace::types::{BlockAddr, ObjectId, LINK_TABLE_LEN};

fn addr(screen: u8, block: u8) -> BlockAddr {
    BlockAddr::new(screen, block).unwrap()
}

const GATES: [(u8, u8); 3] = [(1, 5), (2, 17), (9, 29)];

/// Plate chain at 10..=12, terminal bit on 12, then more valid-looking entries.
fn level_with_chain() -> Blueprint {
    let mut bp = Blueprint::empty();
    for (i, &(s, b)) in GATES.iter().enumerate() {
        let last = i == GATES.len() - 1;
        bp.set_link(10 + i as u8, LinkEntry::to_gate(addr(s, b), 4, last));
        bp.place(addr(s, b), ObjectId::Gate, 0);
    }
    for i in 13..40u8 {
        bp.set_link(i, LinkEntry::to_gate(addr(3, i % 30), 9, false));
    }
    bp.place(addr(1, 24), ObjectId::PressPlate, 10);
    bp
}

#[test]
fn three_entry_chain_resolves_to_three_gates() {
    let bp = level_with_chain();
    let resolver = LinkResolver::new(bp.links(), LINK_TABLE_LEN);

    let targets: Vec<_> = resolver
        .resolve(10)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(targets.len(), 3);
    for (t, &(s, b)) in targets.iter().zip(GATES.iter()) {
        assert_eq!(t.addr, addr(s, b));
        assert_eq!(t.timer, 4);
    }
}

#[test]
fn plate_drives_every_gate_in_its_chain() {
    let mut engine = Engine::new(level_with_chain(), EngineConfig::default());
    let outcome = engine.plate_trigger(addr(1, 24)).unwrap();
    assert_eq!(outcome, TriggerOutcome::Gates(3));

    for &(s, b) in GATES.iter() {
        assert!(matches!(
            engine.trans().active_motion(addr(s, b)),
            Some(Motion::Gate(GatePhase::Opening { hold: 4, .. }))
        ));
    }
    // Three gates plus the depressed plate itself.
    assert_eq!(engine.trans().len(), 4);
}

#[test]
fn gate_opens_holds_and_closes() {
    let mut engine = Engine::new(level_with_chain(), EngineConfig::default());
    let gate = addr(1, 5);
    engine.plate_trigger(addr(1, 24)).unwrap();

    let mut max_open = 0;
    for _ in 0..60 {
        engine.step();
        max_open = max_open.max(engine.blueprint().spec(gate));
    }
    assert_eq!(max_open, engine.config().anim.gate_frames);
    assert_eq!(engine.blueprint().spec(gate), 0);
    assert!(engine.trans().get(gate).is_none());
}

#[test]
fn retriggering_a_closing_gate_reopens_it() {
    let mut engine = Engine::new(level_with_chain(), EngineConfig::default());
    let gate = addr(1, 5);
    engine.plate_trigger(addr(1, 24)).unwrap();

    // Wait until the gate starts closing.
    let mut guard = 0;
    while !matches!(
        engine.trans().active_motion(gate),
        Some(Motion::Gate(GatePhase::Closing { .. }))
    ) {
        engine.step();
        guard += 1;
        assert!(guard < 100, "gate never started closing");
    }
    engine.step();
    let before = engine.blueprint().spec(gate);

    engine.plate_trigger(addr(1, 24)).unwrap();
    assert!(matches!(
        engine.trans().active_motion(gate),
        Some(Motion::Gate(GatePhase::Opening { .. }))
    ));
    engine.step();
    engine.step();
    assert!(engine.blueprint().spec(gate) > before);
}

#[test]
fn chain_without_terminal_bit_is_reported() {
    let mut bp = Blueprint::empty();
    for i in 0..=255u8 {
        bp.set_link(i, LinkEntry::to_gate(addr(4, 0), 1, false));
    }
    bp.place(addr(4, 0), ObjectId::Gate, 0);
    bp.place(addr(4, 20), ObjectId::PressPlate, 0);

    let mut config = EngineConfig::default();
    config.capacity.link_traversal_cap = 16;
    let mut engine = Engine::new(bp, config);

    let err = engine.plate_trigger(addr(4, 20)).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Level(LevelError::CorruptLinkChain { start: 0, steps: 16 })
    ));
}
