//! # bulb_link
//!
//! Bulb state model and lighting backends for a collection of LIFX bulbs.
//!
//! The state model is normalized: hue in degrees [0, 360), saturation and
//! brightness on the unit interval, kelvin passed through untouched.  The
//! wire protocol's raw 16-bit domain only appears at the backend boundary.
//!
//! ## Feature flags
//!
//! * (default) — **Simulated backend**: pushes are recorded and logged,
//!   no network traffic.  Used for tests and hardware-free runs.
//! * `lifx` — **Real bulbs**: discovery and state pushes over the LIFX
//!   LAN protocol via `lifx-core` framing.
//!
//! All pushes are fire-and-forget: failures are logged and dropped, never
//! retried and never surfaced to the caller.  Only discovery at startup
//! reports errors.

pub mod backend;
pub mod collection;
pub mod state;

#[cfg(feature = "lifx")]
pub mod lifx;

pub use backend::{LightBackend, LightError, Push, SimLight};
pub use collection::BulbCollection;
pub use state::{BulbState, RawBulbState};
