//! Engine context - owns the level and every registry
//!
//! One [`Engine`] holds the mutable blueprint, both object registries, the redraw
//! buffers and the configuration, and is passed explicitly to every operation. A
//! cycle runs triggers, AnimTrans, AnimMobs, the image list builder and the
//! compositor, in that order, and produces exactly one frame.

use crate::blueprint::Blueprint;
use crate::compositor::{Compositor, LayerRenderer};
use crate::config::EngineConfig;
use crate::image_list::ImageListBuilder;
use crate::mobile::MobileRegistry;
use crate::redraw::{DirtyBlocks, RedrawBufferSet, VisibleScreen};
use crate::sequence::SequenceInterpreter;
use crate::trans::{AnimContext, TransitionalRegistry};
use crate::triggers::{TriggerEvent, TriggerOutcome};
use crate::types::{BlockAddr, RedrawChannel, SCREEN_COUNT};

/// Summary of one [`Engine::run_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    /// Triggers that changed something.
    pub applied: usize,
    /// Triggers rejected with an error (list full, corrupt links).
    pub rejected: usize,
    pub dirty: DirtyBlocks,
}

#[derive(Debug, Clone)]
pub struct Engine {
    /// The level as loaded; `reset` restores it.
    level: Blueprint,
    blueprint: Blueprint,
    trans: TransitionalRegistry,
    mobs: MobileRegistry,
    redraw: RedrawBufferSet,
    config: EngineConfig,
    view: VisibleScreen,
    cycle: u64,
}

impl Engine {
    pub fn new(blueprint: Blueprint, config: EngineConfig) -> Self {
        let screen = start_screen(&blueprint);
        let view = VisibleScreen::new(&blueprint, screen);
        let mut engine = Self {
            level: blueprint.clone(),
            blueprint,
            trans: TransitionalRegistry::new(config.capacity.transitional),
            mobs: MobileRegistry::new(config.capacity.mobile),
            redraw: RedrawBufferSet::new(),
            config,
            view,
            cycle: 0,
        };
        engine.redraw.mark_all(engine.config.render.redraw_passes);
        engine
    }

    /// Replace the level and start over.
    pub fn load(&mut self, blueprint: Blueprint) {
        self.level = blueprint;
        self.reset();
    }

    /// Restore the loaded level and discard every registry.
    pub fn reset(&mut self) {
        self.blueprint = self.level.clone();
        self.trans.clear();
        self.mobs.clear();
        self.cycle = 0;
        let screen = start_screen(&self.blueprint);
        self.show(screen);
        log::debug!("engine reset; showing screen {}", screen);
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn trans(&self) -> &TransitionalRegistry {
        &self.trans
    }

    pub(crate) fn trans_mut(&mut self) -> &mut TransitionalRegistry {
        &mut self.trans
    }

    pub(crate) fn blueprint_and_trans_mut(&mut self) -> (&Blueprint, &mut TransitionalRegistry) {
        (&self.blueprint, &mut self.trans)
    }

    pub fn mobs(&self) -> &MobileRegistry {
        &self.mobs
    }

    pub fn redraw(&self) -> &RedrawBufferSet {
        &self.redraw
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn visible_screen(&self) -> VisibleScreen {
        self.view
    }

    /// Current cycle number; triggers fired now belong to this cycle.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Show another screen. Returns `false` (and changes nothing) for an invalid number.
    pub fn set_visible_screen(&mut self, screen: u8) -> bool {
        if screen == 0 || screen as usize > SCREEN_COUNT {
            log::warn!("cannot show screen {}", screen);
            return false;
        }
        self.show(screen);
        true
    }

    fn show(&mut self, screen: u8) {
        self.view = VisibleScreen::new(&self.blueprint, screen);
        self.redraw.clear();
        self.redraw.mark_all(self.config.render.redraw_passes);
    }

    /// Ask for `channel` to be redrawn at `addr` (relative to the visible screen).
    pub fn request_redraw(&mut self, addr: BlockAddr, channel: RedrawChannel) {
        let passes = self.config.render.redraw_passes;
        self.redraw.mark_block(&self.view, addr, channel, passes);
    }

    /// Advance both registries by one cycle: AnimTrans, then AnimMobs.
    pub fn animate(&mut self) {
        let mut ctx = AnimContext {
            blueprint: &mut self.blueprint,
            redraw: &mut self.redraw,
            view: self.view,
            config: &self.config,
            cycle: self.cycle,
        };
        self.trans.advance_all(&mut self.mobs, &mut ctx);
        self.mobs.advance_all(&mut ctx);
    }

    /// Animate, consume the redraw buffers and move to the next cycle, without drawing.
    pub fn step(&mut self) -> DirtyBlocks {
        self.animate();
        let dirty = self.redraw.consume_and_decrement();
        self.cycle += 1;
        dirty
    }

    /// Run one full cycle and draw its frame.
    ///
    /// Trigger errors are logged and counted; they never abort the cycle.
    pub fn run_cycle<S, R>(
        &mut self,
        events: &[TriggerEvent],
        seq: &S,
        lists: &mut ImageListBuilder,
        renderer: &mut R,
    ) -> CycleReport
    where
        S: SequenceInterpreter + ?Sized,
        R: LayerRenderer + ?Sized,
    {
        let mut applied = 0;
        let mut rejected = 0;
        for &event in events {
            match self.fire(event) {
                Ok(TriggerOutcome::NotApplicable) | Ok(TriggerOutcome::AlreadyActive) => {}
                Ok(_) => applied += 1,
                Err(err) => {
                    rejected += 1;
                    log::warn!("trigger {:?} rejected: {}", event, err);
                }
            }
        }

        self.animate();

        lists.clear_frame();
        lists.collect_objects(self, seq);
        let dirty = self.redraw.consume_and_decrement();
        Compositor::compose(self, &dirty, lists);
        Compositor::flush(lists, renderer);

        let report = CycleReport {
            cycle: self.cycle,
            applied,
            rejected,
            dirty,
        };
        self.cycle += 1;
        report
    }
}

fn start_screen(blueprint: &Blueprint) -> u8 {
    blueprint
        .info()
        .kid_start()
        .map(|(addr, _)| addr.screen())
        .unwrap_or(1)
}
