//! # palm_light
//!
//! Steer a roomful of LIFX bulbs with your hands.
//!
//! ## Hand → light mapping
//!
//! | Input | Hand | Effect |
//! |---|---|---|
//! | Palm height (50–350 mm) | Left | Brightness 0–1 |
//! | Palm height (50–350 mm) | Right | Saturation 0–1 |
//! | Palm direction in the horizontal plane | Right | Hue 0–360° (forward = 180°) |
//! | Swipe | Either | Toggle power |
//!
//! Both hands in the same frame land in one network push, so brightness
//! and color always change together from the bulbs' point of view.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: type frame commands on stdin.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller.
//! * `lifx` — push to real bulbs instead of the recording fake.
//!
//! ### Simulation commands
//!
//! | Command | Meaning |
//! |---|---|
//! | `l <y>` | Left hand at palm height `y` |
//! | `r <y> <x> <z>` | Right hand at height `y`, horizontal `x`, depth `z` |
//! | `s` | One swipe report |
//! | `ss` | One swipe reported across start/update/end |
//! | empty line | Quit and restore the bulbs |

pub mod app;
pub mod listener;
pub mod sensor;
