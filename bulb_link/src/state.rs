//! Normalized bulb state and its two bounded step operations.

/// Top of the wire protocol's unsigned 16-bit domain for hue, saturation,
/// brightness and power.
pub const MAX_RAW_VALUE: f32 = 65535.0;
/// Hue domain in degrees.  360 itself is excluded; it wraps to 0.
pub const MAX_HUE_DEGREES: f32 = 360.0;

const BRIGHTNESS_STEP: f32 = 0.01;
const HUE_STEP: f32 = 5.0;

// ════════════════════════════════════════════════════════════════════════════
// RawBulbState — what a bulb reports on the wire
// ════════════════════════════════════════════════════════════════════════════

/// A bulb's state in the protocol's native units.
///
/// Power is a 16-bit level of which only the extremes are meaningful here:
/// a bulb is "on" iff it reports the maximum level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawBulbState {
    pub hue:        u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin:     u16,
    pub power:      u16,
}

// ════════════════════════════════════════════════════════════════════════════
// BulbState — normalized state with clamped / wrapped mutation
// ════════════════════════════════════════════════════════════════════════════

/// One lighting configuration in normalized units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulbState {
    pub is_on:      bool,
    /// Degrees, [0, 360).  0 = red.
    pub hue:        f32,
    /// Unit interval.
    pub saturation: f32,
    /// Unit interval.
    pub brightness: f32,
    /// Color temperature, 2000 warmest to 8000 coolest.  Never derived.
    pub kelvin:     u16,
}

impl BulbState {
    /// Build from a live bulb's reported state.
    pub fn from_raw(raw: &RawBulbState) -> Self {
        BulbState {
            hue:        f32::from(raw.hue) / MAX_RAW_VALUE * MAX_HUE_DEGREES,
            saturation: f32::from(raw.saturation) / MAX_RAW_VALUE,
            brightness: f32::from(raw.brightness) / MAX_RAW_VALUE,
            kelvin:     raw.kelvin,
            is_on:      raw.power == u16::MAX,
        }
    }

    /// Step brightness by 0.01, clamped to [0, 1].  At a bound the step in
    /// that direction is a silent no-op.
    pub fn step_brightness(&mut self, up: bool) {
        if up && self.brightness < 1.0 {
            self.brightness = (self.brightness + BRIGHTNESS_STEP).min(1.0);
        } else if !up && self.brightness > 0.0 {
            self.brightness = (self.brightness - BRIGHTNESS_STEP).max(0.0);
        }
    }

    /// Step hue by 5°, wrapping modulo 360.  The fixed step size means a
    /// single correction is always enough.
    pub fn step_hue(&mut self, up: bool) {
        if up {
            self.hue += HUE_STEP;
            if self.hue >= MAX_HUE_DEGREES {
                self.hue -= MAX_HUE_DEGREES;
            }
        } else {
            self.hue -= HUE_STEP;
            if self.hue < 0.0 {
                self.hue += MAX_HUE_DEGREES;
            }
        }
    }
}

// ── raw-domain conversions (backend boundary) ───────────────────────────────

/// Unit interval → raw 16-bit, saturating at both ends.
pub fn unit_to_raw(v: f32) -> u16 {
    (v * MAX_RAW_VALUE) as u16
}

/// Degrees → raw 16-bit hue, saturating at both ends.
pub fn degrees_to_raw(deg: f32) -> u16 {
    (deg / MAX_HUE_DEGREES * MAX_RAW_VALUE) as u16
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
