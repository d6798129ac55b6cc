//! Engine configuration.
//!
//! Capacities and the animation constants that have to be calibrated against
//! reference behaviour live here instead of being baked into the state machines.
//! Every field has a default, so a config file only needs the values it changes:
//!
//! ```toml
//! [capacity]
//! transitional = 40
//!
//! [anim]
//! wiggle_ticks = 12
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{LINK_TABLE_LEN, REDRAW_PASSES, TICK_MS};

/// Registry and traversal limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    /// Maximum number of active transitional objects.
    pub transitional: usize,
    /// Maximum number of active mobile objects.
    pub mobile: usize,
    /// Maximum link-table entries visited while resolving one plate.
    pub link_traversal_cap: usize,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            transitional: 30,
            mobile: 15,
            link_traversal_cap: LINK_TABLE_LEN,
        }
    }
}

/// Phase lengths and motion constants, in cycles unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimConfig {
    /// Distinct gate openness steps between closed and fully open.
    pub gate_frames: u8,
    /// Cycles a gate stays open per unit of plate timer.
    pub gate_hold_scale: u8,
    /// Distinct spike extension steps.
    pub spike_frames: u8,
    /// Cycles spikes stay fully extended.
    pub spike_hold_ticks: u8,
    /// Loose-floor wiggle length before it falls.
    pub wiggle_ticks: u8,
    /// Cycles a plate shows its depressed image after a trigger.
    pub plate_down_ticks: u8,
    /// Lines per cycle added to a falling object's velocity.
    pub mob_gravity: i16,
    /// Velocity cap in lines per cycle.
    pub mob_terminal_velocity: i16,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            gate_frames: 8,
            gate_hold_scale: 1,
            spike_frames: 5,
            spike_hold_ticks: 15,
            wiggle_ticks: 10,
            plate_down_ticks: 3,
            mob_gravity: 3,
            mob_terminal_velocity: 29,
        }
    }
}

/// Redraw bookkeeping and frame pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Value a redraw counter is raised to when a block is marked.
    pub redraw_passes: u8,
    /// Cycle length in milliseconds.
    pub tick_ms: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            redraw_passes: REDRAW_PASSES,
            tick_ms: TICK_MS,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub capacity: CapacityConfig,
    pub anim: AnimConfig,
    pub render: RenderConfig,
}

impl EngineConfig {
    /// Load a configuration from a `.toml` file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        if !path.ends_with(".toml") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save the configuration as TOML.
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        if !path.ends_with(".toml") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }
        let contents = self.to_toml_string()?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = EngineConfig::from_toml_str("[anim]\nwiggle_ticks = 12\n").unwrap();
        assert_eq!(cfg.anim.wiggle_ticks, 12);
        assert_eq!(cfg.anim.gate_frames, AnimConfig::default().gate_frames);
        assert_eq!(cfg.capacity, CapacityConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = EngineConfig::default();
        cfg.capacity.mobile = 4;
        cfg.render.redraw_passes = 1;
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = EngineConfig::load_from_file("engine.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
