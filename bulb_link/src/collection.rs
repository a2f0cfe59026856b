//! The bulb collection: one shared target state for every bulb found.

use tracing::{info, warn};

use crate::backend::{LightBackend, LightError};
use crate::state::BulbState;

// ════════════════════════════════════════════════════════════════════════════
// BulbCollection
// ════════════════════════════════════════════════════════════════════════════

/// Owns the discovered bulb handles, the state captured at startup and the
/// state currently being steered.  Every bulb always receives the same
/// target state; there is no per-bulb differentiation.
///
/// Pushes are fire-and-forget: a failed network write is logged at `warn`
/// and dropped.  Only [`BulbCollection::discover`] reports errors.
pub struct BulbCollection<B: LightBackend> {
    backend:       B,
    bulbs:         Vec<B::Handle>,
    initial_state: BulbState,
    current_state: BulbState,
}

impl<B: LightBackend> BulbCollection<B> {
    /// Discover bulbs and seed both states from the first bulb's report.
    ///
    /// Fails with [`LightError::NoBulbs`] when nothing answers, so a
    /// misconfigured setup is caught at startup instead of leaving the
    /// collection half-initialized.
    pub fn discover(mut backend: B) -> Result<Self, LightError> {
        let bulbs = backend.discover()?;
        let states = backend.get_state(&bulbs)?;
        // First bulb speaks for the group.
        let initial_state = match states.first() {
            Some(raw) => BulbState::from_raw(raw),
            None => return Err(LightError::NoBulbs),
        };
        info!(count = bulbs.len(), "bulbs discovered");
        Ok(BulbCollection {
            backend,
            bulbs,
            initial_state,
            current_state: initial_state,
        })
    }

    // ── power ────────────────────────────────────────────────────────────

    /// Flip the power flag and push it immediately.
    pub fn toggle_power(&mut self) {
        self.current_state.is_on = !self.current_state.is_on;
        if let Err(e) = self.backend.set_power(&self.bulbs, self.current_state.is_on) {
            warn!("power push dropped: {e}");
        }
    }

    // ── stepped mutation (push per call) ─────────────────────────────────

    pub fn change_brightness(&mut self, up: bool) {
        self.current_state.step_brightness(up);
        self.update_bulbs();
    }

    pub fn change_hue(&mut self, up: bool) {
        self.current_state.step_hue(up);
        self.update_bulbs();
    }

    // ── direct field writes (no push; caller batches via update_bulbs) ───

    /// No clamping here: callers hand over whatever they derived.
    pub fn set_brightness(&mut self, brightness: f32) {
        self.current_state.brightness = brightness;
    }

    pub fn set_hue(&mut self, hue: f32) {
        self.current_state.hue = hue;
    }

    pub fn set_saturation(&mut self, saturation: f32) {
        self.current_state.saturation = saturation;
    }

    // ── synchronization ──────────────────────────────────────────────────

    /// Push the full current state to every bulb, transition time zero.
    /// Bulbs that are off are left alone entirely.
    pub fn update_bulbs(&mut self) {
        if !self.current_state.is_on {
            return;
        }
        let s = self.current_state;
        if let Err(e) = self
            .backend
            .set_state(&self.bulbs, s.hue, s.saturation, s.brightness, s.kelvin, 0)
        {
            warn!("state push dropped: {e}");
        }
    }

    /// Shutdown reset: forget the steered state and put the bulbs back the
    /// way they were found.  Best effort — failures are logged only.
    pub fn restore_initial(&mut self) {
        self.current_state = self.initial_state;
        if let Err(e) = self.backend.set_power(&self.bulbs, self.current_state.is_on) {
            warn!("restore power push dropped: {e}");
        }
        self.update_bulbs();
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn current(&self) -> &BulbState {
        &self.current_state
    }

    pub fn initial(&self) -> &BulbState {
        &self.initial_state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
