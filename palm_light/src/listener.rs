//! Per-frame mapping from hand poses to bulb parameters.

use bulb_link::{BulbCollection, LightBackend};
use tracing::{debug, info};

use crate::sensor::{Frame, GestureKind, HandSide};

/// Palm-height window (sensor mm) that spans the whole 0–1 range.
pub const MIN_Y_BRIGHTNESS: f32 = 50.0;
pub const MAX_Y_BRIGHTNESS: f32 = 350.0;
const Y_BRIGHTNESS_SPAN: f32 = MAX_Y_BRIGHTNESS - MIN_Y_BRIGHTNESS;

// ════════════════════════════════════════════════════════════════════════════
// FrameListener trait
// ════════════════════════════════════════════════════════════════════════════

/// The recognized sensor callback set.  Lifecycle callbacks are
/// informational and default to no-ops; only `on_frame` must be provided.
pub trait FrameListener {
    fn on_init(&mut self) {}
    fn on_connect(&mut self) {}
    fn on_disconnect(&mut self) {}
    fn on_exit(&mut self) {}
    fn on_frame(&mut self, frame: &Frame);
}

// ════════════════════════════════════════════════════════════════════════════
// LightListener
// ════════════════════════════════════════════════════════════════════════════

/// Drives a [`BulbCollection`] from tracking frames.
///
/// Left palm height → brightness, right palm height → saturation, right
/// palm direction in the horizontal plane → hue.  Any swipe report
/// toggles power; with `dedup_swipes` a gesture id toggles at most once
/// no matter how many phase reports arrive.
pub struct LightListener<B: LightBackend> {
    bulbs:        BulbCollection<B>,
    dedup_swipes: bool,
    last_swipe:   Option<u32>,
}

impl<B: LightBackend> LightListener<B> {
    pub fn new(bulbs: BulbCollection<B>, dedup_swipes: bool) -> Self {
        LightListener { bulbs, dedup_swipes, last_swipe: None }
    }

    pub fn bulbs(&self) -> &BulbCollection<B> {
        &self.bulbs
    }

    pub fn bulbs_mut(&mut self) -> &mut BulbCollection<B> {
        &mut self.bulbs
    }
}

/// Linear map of palm height onto the unit interval.  Clamped above only:
/// palms below the window pass through as negative values.
fn vertical_to_unit(y: f32) -> f32 {
    let v = (y - MIN_Y_BRIGHTNESS) / Y_BRIGHTNESS_SPAN;
    if v > 1.0 { 1.0 } else { v }
}

/// Hue angle from the palm's horizontal-plane direction, truncated to a
/// whole degree.  Forward-center is 180°.
fn palm_hue(x: f32, z: f32) -> f32 {
    (x.atan2(z).to_degrees() + 180.0).trunc()
}

impl<B: LightBackend> FrameListener for LightListener<B> {
    fn on_init(&mut self) {
        info!("sensor initialized");
    }

    fn on_connect(&mut self) {
        info!("sensor connected");
    }

    fn on_disconnect(&mut self) {
        // Informational only; mutation keeps running on whatever frames
        // still arrive.
        info!("sensor disconnected");
    }

    fn on_exit(&mut self) {
        info!("sensor exited");
    }

    fn on_frame(&mut self, frame: &Frame) {
        for hand in &frame.hands {
            match hand.side {
                HandSide::Left => {
                    self.bulbs.set_brightness(vertical_to_unit(hand.palm.y));
                }
                HandSide::Right => {
                    self.bulbs.set_saturation(vertical_to_unit(hand.palm.y));
                    let hue = palm_hue(hand.palm.x, hand.palm.z);
                    debug!(hue, "right palm");
                    self.bulbs.set_hue(hue);
                }
                HandSide::Unknown => {}
            }
        }

        // One push per frame: left- and right-hand changes land together.
        self.bulbs.update_bulbs();

        for gesture in &frame.gestures {
            if gesture.kind != GestureKind::Swipe {
                continue;
            }
            if self.dedup_swipes && self.last_swipe == Some(gesture.id) {
                continue;
            }
            self.last_swipe = Some(gesture.id);
            self.bulbs.toggle_power();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{Gesture, GesturePhase, HandPose, Palm};
    use bulb_link::{Push, SimLight};

    fn listener(dedup: bool) -> LightListener<SimLight> {
        let bulbs = BulbCollection::discover(SimLight::default()).unwrap();
        LightListener::new(bulbs, dedup)
    }

    fn left_hand(y: f32) -> HandPose {
        HandPose { side: HandSide::Left, palm: Palm { x: 0.0, y, z: 0.0 } }
    }

    fn right_hand(y: f32, x: f32, z: f32) -> HandPose {
        HandPose { side: HandSide::Right, palm: Palm { x, y, z } }
    }

    fn swipe(id: u32, phase: GesturePhase) -> Gesture {
        Gesture { id, kind: GestureKind::Swipe, phase }
    }

    fn hand_frame(hands: Vec<HandPose>) -> Frame {
        Frame { hands, gestures: Vec::new() }
    }

    fn gesture_frame(gestures: Vec<Gesture>) -> Frame {
        Frame { hands: Vec::new(), gestures }
    }

    #[test]
    fn left_palm_window_maps_to_brightness() {
        let mut l = listener(false);
        l.on_frame(&hand_frame(vec![left_hand(50.0)]));
        assert_eq!(l.bulbs().current().brightness, 0.0);
        l.on_frame(&hand_frame(vec![left_hand(350.0)]));
        assert_eq!(l.bulbs().current().brightness, 1.0);
        l.on_frame(&hand_frame(vec![left_hand(200.0)]));
        assert!((l.bulbs().current().brightness - 0.5).abs() < 1e-6);
    }

    #[test]
    fn left_palm_above_window_clamps_to_one() {
        let mut l = listener(false);
        l.on_frame(&hand_frame(vec![left_hand(500.0)]));
        assert_eq!(l.bulbs().current().brightness, 1.0);
    }

    #[test]
    fn left_palm_below_window_goes_negative() {
        // The lower bound is deliberately unclamped.
        let mut l = listener(false);
        l.on_frame(&hand_frame(vec![left_hand(0.0)]));
        let b = l.bulbs().current().brightness;
        assert!((b - (-50.0 / 300.0)).abs() < 1e-6, "got {b}");
    }

    #[test]
    fn right_palm_sets_saturation_and_hue() {
        let mut l = listener(false);
        l.on_frame(&hand_frame(vec![right_hand(350.0, 0.0, 1.0)]));
        let s = l.bulbs().current();
        assert_eq!(s.saturation, 1.0);
        // atan2(0, 1) = 0 → forward-center 180°.
        assert_eq!(s.hue, 180.0);
    }

    #[test]
    fn right_palm_to_the_side_shifts_hue() {
        let mut l = listener(false);
        l.on_frame(&hand_frame(vec![right_hand(200.0, 1.0, 0.0)]));
        // atan2(1, 0) = 90° → 270, truncated.
        assert_eq!(l.bulbs().current().hue, 270.0);
    }

    #[test]
    fn unknown_hand_changes_nothing() {
        let mut l = listener(false);
        let before = *l.bulbs().current();
        l.on_frame(&hand_frame(vec![HandPose {
            side: HandSide::Unknown,
            palm: Palm { x: 1.0, y: 999.0, z: 1.0 },
        }]));
        assert_eq!(*l.bulbs().current(), before);
    }

    #[test]
    fn both_hands_land_in_one_push() {
        let mut l = listener(false);
        l.on_frame(&hand_frame(vec![left_hand(350.0), right_hand(50.0, 0.0, 1.0)]));
        let pushes = &l.bulbs().backend().pushes;
        assert_eq!(pushes.len(), 1);
        match pushes[0] {
            Push::State { brightness, saturation, hue, .. } => {
                assert_eq!(brightness, 1.0);
                assert_eq!(saturation, 0.0);
                assert_eq!(hue, 180.0);
            }
            Push::Power(_) => panic!("expected a state push"),
        }
    }

    #[test]
    fn frame_without_hands_still_pushes_once_when_on() {
        let mut l = listener(false);
        l.on_frame(&Frame::default());
        assert_eq!(l.bulbs().backend().pushes.len(), 1);
    }

    #[test]
    fn no_push_while_powered_off() {
        let mut l = listener(false);
        l.on_frame(&gesture_frame(vec![swipe(0, GesturePhase::Start)])); // off
        let pushes_after_toggle = l.bulbs().backend().pushes.len();
        l.on_frame(&hand_frame(vec![left_hand(200.0)]));
        // Only the power toggle went out; the off bulbs saw no state push.
        assert_eq!(l.bulbs().backend().pushes.len(), pushes_after_toggle);
    }

    #[test]
    fn one_swipe_report_toggles_once() {
        let mut l = listener(false);
        assert!(l.bulbs().current().is_on);
        l.on_frame(&gesture_frame(vec![swipe(0, GesturePhase::Start)]));
        assert!(!l.bulbs().current().is_on);
    }

    #[test]
    fn two_swipe_reports_toggle_twice() {
        // Literal behavior: phase reports are not deduplicated by default,
        // so a double report is a net no-op.
        let mut l = listener(false);
        l.on_frame(&gesture_frame(vec![
            swipe(0, GesturePhase::Start),
            swipe(0, GesturePhase::Update),
        ]));
        assert!(l.bulbs().current().is_on);
        let power_pushes = l
            .bulbs()
            .backend()
            .pushes
            .iter()
            .filter(|p| matches!(p, Push::Power(_)))
            .count();
        assert_eq!(power_pushes, 2);
    }

    #[test]
    fn dedup_collapses_phase_reports() {
        let mut l = listener(true);
        l.on_frame(&gesture_frame(vec![
            swipe(0, GesturePhase::Start),
            swipe(0, GesturePhase::Update),
            swipe(0, GesturePhase::End),
        ]));
        assert!(!l.bulbs().current().is_on);
    }

    #[test]
    fn dedup_still_honors_distinct_swipes() {
        let mut l = listener(true);
        l.on_frame(&gesture_frame(vec![swipe(0, GesturePhase::Start)]));
        l.on_frame(&gesture_frame(vec![swipe(0, GesturePhase::End)]));
        assert!(!l.bulbs().current().is_on);
        l.on_frame(&gesture_frame(vec![swipe(1, GesturePhase::Start)]));
        assert!(l.bulbs().current().is_on);
    }

    #[test]
    fn non_swipe_gestures_are_ignored() {
        let mut l = listener(false);
        l.on_frame(&gesture_frame(vec![Gesture {
            id:    0,
            kind:  GestureKind::Circle,
            phase: GesturePhase::Start,
        }]));
        assert!(l.bulbs().current().is_on);
    }
}
