//! Sensor events — from LeapMotion hardware or a stdin simulator.
//!
//! The public interface is [`SensorEvent`] delivered over a `mpsc`
//! channel.  Consumers don't need to know whether frames came from real
//! hardware or typed commands.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

#[cfg(feature = "leap")]
use tracing::warn;

// ════════════════════════════════════════════════════════════════════════════
// Frame model
// ════════════════════════════════════════════════════════════════════════════

/// Palm position in sensor units (millimeters above/around the device).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Palm {
    pub x: f32, // horizontal, + right
    pub y: f32, // vertical, + up
    pub z: f32, // depth, + toward the user
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandSide {
    Left,
    Right,
    /// Reported by the sensor but not flagged either way; ignored downstream.
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPose {
    pub side: HandSide,
    pub palm: Palm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Swipe,
    Circle,
    KeyTap,
    ScreenTap,
}

/// Phase of an ongoing gesture.  The sensor may report the *same* gesture
/// id once per phase, and a consumer sees every report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    Update,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gesture {
    pub id:    u32,
    pub kind:  GestureKind,
    pub phase: GesturePhase,
}

/// One snapshot of tracked hands and gesture reports.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub hands:    Vec<HandPose>,
    pub gestures: Vec<Gesture>,
}

// ════════════════════════════════════════════════════════════════════════════
// SensorEvent + FrameSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Everything a frame source can tell the application.
#[derive(Clone, Debug, PartialEq)]
pub enum SensorEvent {
    Init,
    Connect,
    Disconnect,
    Exit,
    Frame(Frame),
    /// Operator asked to quit (Enter, or end of stdin).
    Quit,
}

/// Anything that can deliver [`SensorEvent`]s over a channel.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SensorEvent>);
}

/// Spawn a frame source on its own thread.  Returns the receiving end and
/// a sender clone, so the caller can inject [`SensorEvent::Quit`] from a
/// stdin watcher.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> (Sender<SensorEvent>, Receiver<SensorEvent>) {
    let (tx, rx) = mpsc::channel();
    let source_tx = tx.clone();
    thread::spawn(move || Box::new(source).run(source_tx));
    (tx, rx)
}

// ════════════════════════════════════════════════════════════════════════════
// Swipe tracking — shared by the hardware source
// ════════════════════════════════════════════════════════════════════════════

/// Turns a per-frame "palm is moving fast sideways" flag into phased swipe
/// reports with a stable id, the way the sensor SDK phrases gestures:
/// Start on the first fast frame, Update while sustained, End once the
/// palm slows down.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    active:  Option<u32>,
    next_id: u32,
}

impl SwipeTracker {
    pub fn observe(&mut self, fast: bool) -> Option<Gesture> {
        match (fast, self.active) {
            (true, None) => {
                let id = self.next_id;
                self.next_id = self.next_id.wrapping_add(1);
                self.active = Some(id);
                Some(Gesture { id, kind: GestureKind::Swipe, phase: GesturePhase::Start })
            }
            (true, Some(id)) => {
                Some(Gesture { id, kind: GestureKind::Swipe, phase: GesturePhase::Update })
            }
            (false, Some(id)) => {
                self.active = None;
                Some(Gesture { id, kind: GestureKind::Swipe, phase: GesturePhase::End })
            }
            (false, None) => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Frame source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library.
/// Connection lifecycle events are forwarded as
/// `Init`/`Connect`/`Disconnect`/`Exit`; swipes are derived from palm
/// velocity along the X axis and reported once per tracking frame for as
/// long as they last.
#[cfg(feature = "leap")]
pub struct LeapFrameSource;

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<SensorEvent>) {
        use leaprs::*;

        // Minimum sideways palm speed that counts as a swipe (mm/s).
        const SWIPE_VX_MIN: f32 = 400.0;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                warn!("LeapC connection failed: {e:?}");
                let _ = tx.send(SensorEvent::Exit);
                return;
            }
        };
        if let Err(e) = connection.open() {
            warn!("LeapMotion device open failed: {e:?}");
            let _ = tx.send(SensorEvent::Exit);
            return;
        }
        let _ = tx.send(SensorEvent::Init);

        let mut swipes = SwipeTracker::default();

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            match msg.event() {
                Event::Connection(_) => {
                    let _ = tx.send(SensorEvent::Connect);
                }
                Event::ConnectionLost(_) => {
                    let _ = tx.send(SensorEvent::Disconnect);
                }
                Event::Tracking(frame) => {
                    let mut hands = Vec::new();
                    let mut fast = false;
                    for h in frame.hands() {
                        let side = match h.hand_type() {
                            HandType::Left  => HandSide::Left,
                            HandType::Right => HandSide::Right,
                        };
                        let p = h.palm().position();
                        hands.push(HandPose {
                            side,
                            palm: Palm { x: p.x, y: p.y, z: p.z },
                        });
                        if h.palm().velocity().x.abs() > SWIPE_VX_MIN {
                            fast = true;
                        }
                    }
                    let gestures = swipes.observe(fast).into_iter().collect();
                    if tx.send(SensorEvent::Frame(Frame { hands, gestures })).is_err() {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource — stdin command simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Line-oriented frame simulator: each stdin line becomes one frame, an
/// empty line (plain Enter) quits.  Lets the whole pipeline run with no
/// sensor attached, and doubles as a poor man's remote control.
pub struct SimFrameSource;

enum SimCommand {
    Frame(Frame),
    Quit,
    Unknown,
}

fn parse_line(line: &str, next_id: u32) -> SimCommand {
    let mut parts = line.split_whitespace();
    let head = match parts.next() {
        Some(h) => h,
        None => return SimCommand::Quit,
    };
    let mut num = |default: f32| parts.next().and_then(|s| s.parse().ok()).unwrap_or(default);

    match head {
        "l" => {
            let y = num(0.0);
            SimCommand::Frame(Frame {
                hands: vec![HandPose { side: HandSide::Left, palm: Palm { x: 0.0, y, z: 0.0 } }],
                gestures: Vec::new(),
            })
        }
        "r" => {
            let y = num(0.0);
            let x = num(0.0);
            let z = num(0.0);
            SimCommand::Frame(Frame {
                hands: vec![HandPose { side: HandSide::Right, palm: Palm { x, y, z } }],
                gestures: Vec::new(),
            })
        }
        "s" => SimCommand::Frame(Frame {
            hands: Vec::new(),
            gestures: vec![Gesture {
                id:    next_id,
                kind:  GestureKind::Swipe,
                phase: GesturePhase::Start,
            }],
        }),
        // The same swipe reported across all three phases, as hardware may
        // deliver it.  Without dedup this toggles power three times.
        "ss" => SimCommand::Frame(Frame {
            hands: Vec::new(),
            gestures: [GesturePhase::Start, GesturePhase::Update, GesturePhase::End]
                .into_iter()
                .map(|phase| Gesture { id: next_id, kind: GestureKind::Swipe, phase })
                .collect(),
        }),
        _ => SimCommand::Unknown,
    }
}

impl FrameSource for SimFrameSource {
    fn run(self: Box<Self>, tx: Sender<SensorEvent>) {
        use std::io::BufRead;

        let _ = tx.send(SensorEvent::Init);
        let _ = tx.send(SensorEvent::Connect);
        eprintln!("  commands: l <y> | r <y> <x> <z> | s | ss | empty line quits");

        let stdin = std::io::stdin();
        let mut next_id = 0u32;
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l)  => l,
                Err(_) => break,
            };
            match parse_line(&line, next_id) {
                SimCommand::Frame(frame) => {
                    if !frame.gestures.is_empty() {
                        next_id += 1;
                    }
                    if tx.send(SensorEvent::Frame(frame)).is_err() {
                        return;
                    }
                }
                SimCommand::Quit => break,
                SimCommand::Unknown => {
                    eprintln!("  ? commands: l <y> | r <y> <x> <z> | s | ss | empty line quits");
                }
            }
        }
        let _ = tx.send(SensorEvent::Exit);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipe_tracker_phases_share_one_id() {
        let mut t = SwipeTracker::default();
        let start = t.observe(true).unwrap();
        assert_eq!(start.phase, GesturePhase::Start);
        let update = t.observe(true).unwrap();
        assert_eq!(update.phase, GesturePhase::Update);
        assert_eq!(update.id, start.id);
        let end = t.observe(false).unwrap();
        assert_eq!(end.phase, GesturePhase::End);
        assert_eq!(end.id, start.id);
        assert_eq!(t.observe(false), None);
    }

    #[test]
    fn swipe_tracker_new_swipe_gets_new_id() {
        let mut t = SwipeTracker::default();
        let first = t.observe(true).unwrap();
        t.observe(false);
        let second = t.observe(true).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.phase, GesturePhase::Start);
    }

    #[test]
    fn parse_left_hand() {
        match parse_line("l 200", 0) {
            SimCommand::Frame(f) => {
                assert_eq!(f.hands.len(), 1);
                assert_eq!(f.hands[0].side, HandSide::Left);
                assert_eq!(f.hands[0].palm.y, 200.0);
            }
            _ => panic!("expected frame"),
        }
    }

    #[test]
    fn parse_right_hand_with_position() {
        match parse_line("r 350 0 1", 0) {
            SimCommand::Frame(f) => {
                assert_eq!(f.hands[0].side, HandSide::Right);
                assert_eq!(f.hands[0].palm, Palm { x: 0.0, y: 350.0, z: 1.0 });
            }
            _ => panic!("expected frame"),
        }
    }

    #[test]
    fn parse_swipe_triple_report() {
        match parse_line("ss", 7) {
            SimCommand::Frame(f) => {
                assert_eq!(f.gestures.len(), 3);
                assert!(f.gestures.iter().all(|g| g.id == 7 && g.kind == GestureKind::Swipe));
            }
            _ => panic!("expected frame"),
        }
    }

    #[test]
    fn empty_line_quits() {
        assert!(matches!(parse_line("", 0), SimCommand::Quit));
        assert!(matches!(parse_line("   ", 0), SimCommand::Quit));
    }

    #[test]
    fn garbage_is_unknown() {
        assert!(matches!(parse_line("wave", 0), SimCommand::Unknown));
    }
}
