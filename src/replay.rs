//! Trigger replay scripts.
//!
//! A script is a JSON list of triggers stamped with the cycle they fire in:
//!
//! ```json
//! { "events": [ { "cycle": 3, "kind": "plate", "screen": 1, "block": 24 } ] }
//! ```
//!
//! Replaying a script against the same level always produces the same per-cycle
//! fingerprints; the runner records them so two runs can be compared.

use std::hash::Hasher;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::image_list::{LayerImage, MidImage, Peel, WipeRect};
use crate::core::{
    Engine, Fnv1aHasher, ImageListBuilder, LayerRenderer, SequenceInterpreter, TriggerEvent,
    TriggerKind,
};
use crate::types::BlockAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    Spike,
    Plate,
    LooseFloor,
    Auto,
}

impl From<ScriptKind> for TriggerKind {
    fn from(kind: ScriptKind) -> Self {
        match kind {
            ScriptKind::Spike => TriggerKind::Spike,
            ScriptKind::Plate => TriggerKind::Plate,
            ScriptKind::LooseFloor => TriggerKind::LooseFloor,
            ScriptKind::Auto => TriggerKind::Auto,
        }
    }
}

impl From<TriggerKind> for ScriptKind {
    fn from(kind: TriggerKind) -> Self {
        match kind {
            TriggerKind::Spike => ScriptKind::Spike,
            TriggerKind::Plate => ScriptKind::Plate,
            TriggerKind::LooseFloor => ScriptKind::LooseFloor,
            TriggerKind::Auto => ScriptKind::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub cycle: u64,
    pub kind: ScriptKind,
    pub screen: u8,
    pub block: u8,
}

impl ScriptEvent {
    pub fn new(cycle: u64, event: TriggerEvent) -> Self {
        Self {
            cycle,
            kind: event.kind.into(),
            screen: event.addr.screen(),
            block: event.addr.block(),
        }
    }

    pub fn to_trigger(&self) -> Result<TriggerEvent> {
        let addr = BlockAddr::new(self.screen, self.block).ok_or_else(|| {
            anyhow!(
                "event at cycle {} targets screen {} block {}, which is out of range",
                self.cycle,
                self.screen,
                self.block
            )
        })?;
        Ok(TriggerEvent::new(self.kind.into(), addr))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub events: Vec<ScriptEvent>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing replay script")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing replay script")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading replay script {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("writing replay script {}", path.display()))
    }

    /// Append a trigger fired in `cycle` (used by `--record`).
    pub fn record(&mut self, cycle: u64, event: TriggerEvent) {
        self.events.push(ScriptEvent::new(cycle, event));
    }

    /// Cycle after the last scripted event.
    pub fn end_cycle(&self) -> u64 {
        self.events.iter().map(|e| e.cycle + 1).max().unwrap_or(0)
    }
}

/// Script events validated and ordered by cycle, ready to feed `Engine::run_cycle`.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    cycles: Vec<u64>,
    events: Vec<TriggerEvent>,
}

impl Schedule {
    pub fn new(script: &ReplayScript) -> Result<Self> {
        let mut pairs = script
            .events
            .iter()
            .map(|e| Ok((e.cycle, e.to_trigger()?)))
            .collect::<Result<Vec<_>>>()?;
        // Stable: events of one cycle keep script order.
        pairs.sort_by_key(|(cycle, _)| *cycle);
        let (cycles, events) = pairs.into_iter().unzip();
        Ok(Self { cycles, events })
    }

    /// Events scheduled for `cycle`, in script order.
    pub fn events_for(&self, cycle: u64) -> &[TriggerEvent] {
        let start = self.cycles.partition_point(|&c| c < cycle);
        let end = self.cycles.partition_point(|&c| c <= cycle);
        &self.events[start..end]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A `LayerRenderer` that only hashes what it is asked to draw.
#[derive(Debug, Default)]
pub struct DrawListHasher {
    hasher: Fnv1aHasher,
}

impl DrawListHasher {
    /// Hash of everything drawn since the last call.
    pub fn take(&mut self) -> u64 {
        let value = self.hasher.finish();
        self.hasher = Fnv1aHasher::default();
        value
    }
}

fn hash_slice<T: std::hash::Hash>(hasher: &mut Fnv1aHasher, tag: u8, items: &[T]) {
    use std::hash::Hash;
    hasher.write_u8(tag);
    items.hash(hasher);
}

impl LayerRenderer for DrawListHasher {
    fn draw_general(&mut self, peels: &[Peel]) {
        hash_slice(&mut self.hasher, 0, peels);
    }

    fn draw_wipe(&mut self, rects: &[WipeRect]) {
        hash_slice(&mut self.hasher, 1, rects);
    }

    fn draw_back(&mut self, images: &[LayerImage]) {
        hash_slice(&mut self.hasher, 2, images);
    }

    fn draw_mid(&mut self, images: &[MidImage]) {
        hash_slice(&mut self.hasher, 3, images);
    }

    fn draw_fore(&mut self, images: &[LayerImage]) {
        hash_slice(&mut self.hasher, 4, images);
    }

    fn draw_message(&mut self, images: &[LayerImage]) {
        hash_slice(&mut self.hasher, 5, images);
    }
}

/// Fingerprints of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u64,
    /// Engine state after the cycle.
    pub state: u64,
    /// Everything the compositor handed to the renderer.
    pub draws: u64,
    pub rejected: usize,
}

/// Run `cycles` cycles of `engine`, feeding scheduled triggers, and record each one.
pub fn replay<S>(engine: &mut Engine, schedule: &Schedule, seq: &S, cycles: u64) -> Vec<CycleRecord>
where
    S: SequenceInterpreter + ?Sized,
{
    let mut lists = ImageListBuilder::new();
    let mut draws = DrawListHasher::default();
    let mut records = Vec::new();

    for _ in 0..cycles {
        let events = schedule.events_for(engine.cycle());
        let report = engine.run_cycle(events, seq, &mut lists, &mut draws);
        records.push(CycleRecord {
            cycle: report.cycle,
            state: engine.fingerprint(),
            draws: draws.take(),
            rejected: report.rejected,
        });
    }
    log::debug!(
        "replayed {} cycle(s), {} scheduled trigger(s)",
        records.len(),
        schedule.len()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Blueprint, EngineConfig, NoCharacters};

    #[test]
    fn parses_script_json() {
        let script = ReplayScript::from_json(
            r#"{ "events": [
                { "cycle": 2, "kind": "loose_floor", "screen": 1, "block": 3 },
                { "cycle": 0, "kind": "plate", "screen": 1, "block": 24 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(script.events.len(), 2);
        assert_eq!(script.events[0].kind, ScriptKind::LooseFloor);
        assert_eq!(script.end_cycle(), 3);
    }

    #[test]
    fn schedule_groups_events_by_cycle() {
        let mut script = ReplayScript::default();
        let a = BlockAddr::new(1, 3).unwrap();
        let b = BlockAddr::new(1, 24).unwrap();
        script.record(5, TriggerEvent::new(TriggerKind::LooseFloor, a));
        script.record(1, TriggerEvent::new(TriggerKind::Plate, b));
        script.record(5, TriggerEvent::new(TriggerKind::Auto, b));

        let schedule = Schedule::new(&script).unwrap();
        assert_eq!(schedule.events_for(1).len(), 1);
        assert!(schedule.events_for(2).is_empty());
        let five = schedule.events_for(5);
        assert_eq!(five.len(), 2);
        assert_eq!(five[0].kind, TriggerKind::LooseFloor);
        assert_eq!(five[1].kind, TriggerKind::Auto);
    }

    #[test]
    fn out_of_range_event_is_rejected() {
        let script = ReplayScript {
            events: vec![ScriptEvent {
                cycle: 0,
                kind: ScriptKind::Spike,
                screen: 25,
                block: 0,
            }],
        };
        assert!(Schedule::new(&script).is_err());
    }

    #[test]
    fn one_record_per_cycle_run() {
        let schedule = Schedule::new(&ReplayScript::default()).unwrap();
        let mut engine = Engine::new(Blueprint::empty(), EngineConfig::default());
        assert!(replay(&mut engine, &schedule, &NoCharacters, 0).is_empty());

        let records = replay(&mut engine, &schedule, &NoCharacters, 7);
        assert_eq!(records.len(), 7);
    }
}
