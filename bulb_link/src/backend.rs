//! Lighting backend abstraction — real bulbs or a recording fake.
//!
//! `BulbCollection` talks to bulbs only through [`LightBackend`], so the
//! whole pipeline runs (and is tested) against [`SimLight`] without any
//! hardware, mirroring how the LIFX backend is swapped in behind the
//! `lifx` feature.

use thiserror::Error;
use tracing::debug;

use crate::state::RawBulbState;

// ════════════════════════════════════════════════════════════════════════════
// LightError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum LightError {
    /// Discovery finished without a single bulb answering.
    #[error("no bulbs discovered on the network")]
    NoBulbs,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),
}

// ════════════════════════════════════════════════════════════════════════════
// LightBackend trait
// ════════════════════════════════════════════════════════════════════════════

/// A set of bulbs reachable through one transport.
///
/// `Handle` is opaque to callers; the collection only stores the handles
/// discovery returned and hands them back on every push.
pub trait LightBackend {
    type Handle;

    /// Find bulbs.  May legitimately return an empty set.
    fn discover(&mut self) -> Result<Vec<Self::Handle>, LightError>;

    /// Read back the raw state of each bulb, in handle order.
    fn get_state(&mut self, bulbs: &[Self::Handle]) -> Result<Vec<RawBulbState>, LightError>;

    /// Push only the power flag.
    fn set_power(&mut self, bulbs: &[Self::Handle], on: bool) -> Result<(), LightError>;

    /// Push a full color state with a transition time.
    fn set_state(
        &mut self,
        bulbs: &[Self::Handle],
        hue: f32,
        saturation: f32,
        brightness: f32,
        kelvin: u16,
        transition_ms: u32,
    ) -> Result<(), LightError>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimLight — in-memory backend (default mode and unit tests)
// ════════════════════════════════════════════════════════════════════════════

/// One push as seen by the simulated backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Push {
    Power(bool),
    State {
        hue:           f32,
        saturation:    f32,
        brightness:    f32,
        kelvin:        u16,
        transition_ms: u32,
    },
}

/// Simulated bulbs: discovery yields one handle per configured bulb and
/// every push is appended to [`SimLight::pushes`].
pub struct SimLight {
    bulbs:      Vec<RawBulbState>,
    pub pushes: Vec<Push>,
}

impl SimLight {
    pub fn new(bulbs: Vec<RawBulbState>) -> Self {
        SimLight { bulbs, pushes: Vec::new() }
    }

    /// A backend with no bulbs at all, for exercising discovery failure.
    pub fn empty() -> Self {
        SimLight::new(Vec::new())
    }
}

impl Default for SimLight {
    /// One warm white bulb, powered on at full brightness.
    fn default() -> Self {
        SimLight::new(vec![RawBulbState {
            hue:        0,
            saturation: 65535,
            brightness: 65535,
            kelvin:     2700,
            power:      65535,
        }])
    }
}

impl LightBackend for SimLight {
    type Handle = usize;

    fn discover(&mut self) -> Result<Vec<usize>, LightError> {
        Ok((0..self.bulbs.len()).collect())
    }

    fn get_state(&mut self, bulbs: &[usize]) -> Result<Vec<RawBulbState>, LightError> {
        Ok(bulbs.iter().filter_map(|&i| self.bulbs.get(i).copied()).collect())
    }

    fn set_power(&mut self, bulbs: &[usize], on: bool) -> Result<(), LightError> {
        debug!(count = bulbs.len(), on, "sim power push");
        self.pushes.push(Push::Power(on));
        Ok(())
    }

    fn set_state(
        &mut self,
        bulbs: &[usize],
        hue: f32,
        saturation: f32,
        brightness: f32,
        kelvin: u16,
        transition_ms: u32,
    ) -> Result<(), LightError> {
        debug!(count = bulbs.len(), hue, saturation, brightness, kelvin, "sim state push");
        self.pushes.push(Push::State { hue, saturation, brightness, kelvin, transition_ms });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_discovers_configured_bulbs() {
        let mut sim = SimLight::default();
        let handles = sim.discover().unwrap();
        assert_eq!(handles, vec![0]);
        let states = sim.get_state(&handles).unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].kelvin, 2700);
    }

    #[test]
    fn sim_empty_discovers_nothing() {
        let mut sim = SimLight::empty();
        assert!(sim.discover().unwrap().is_empty());
    }

    #[test]
    fn sim_records_pushes_in_order() {
        let mut sim = SimLight::default();
        let handles = sim.discover().unwrap();
        sim.set_power(&handles, true).unwrap();
        sim.set_state(&handles, 120.0, 1.0, 0.5, 2700, 0).unwrap();
        assert_eq!(sim.pushes.len(), 2);
        assert_eq!(sim.pushes[0], Push::Power(true));
        assert!(matches!(sim.pushes[1], Push::State { hue, .. } if hue == 120.0));
    }
}
