//! Application wiring: backend, collection, listener, event loop.

use std::net::SocketAddr;
use std::time::Duration;

use bulb_link::{BulbCollection, LightError};
use tracing::info;

use crate::listener::{FrameListener, LightListener};
use crate::sensor::{spawn_frame_source, SensorEvent};

#[cfg(not(feature = "leap"))]
use crate::sensor::SimFrameSource;
#[cfg(feature = "leap")]
use crate::sensor::LeapFrameSource;

#[cfg(not(feature = "lifx"))]
use bulb_link::SimLight;
#[cfg(feature = "lifx")]
use bulb_link::lifx::LifxLight;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

pub struct AppConfig {
    /// Toggle power at most once per swipe id instead of once per report.
    pub dedup_swipes: bool,
    /// Where bulb discovery broadcasts go (LIFX port 56700).
    pub broadcast: SocketAddr,
    /// How long discovery waits for bulbs to answer.
    pub discovery_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            dedup_swipes:      false,
            broadcast:         "255.255.255.255:56700".parse().unwrap(),
            discovery_timeout: Duration::from_millis(1000),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main event loop
// ════════════════════════════════════════════════════════════════════════════

/// Run until the operator quits, then put the bulbs back the way they
/// were found.
///
/// The main thread is the only owner of the bulb collection; frame
/// sources just send [`SensorEvent`]s over the channel, so no locking is
/// needed between the per-frame path and the shutdown restore.
pub fn run(cfg: AppConfig) -> Result<(), LightError> {
    let bulbs = BulbCollection::discover(make_backend(&cfg)?)?;
    let mut listener = LightListener::new(bulbs, cfg.dedup_swipes);

    #[cfg(feature = "leap")]
    let rx = {
        let (tx, rx) = spawn_frame_source(LeapFrameSource);
        spawn_stdin_quit(tx);
        println!("Press Enter to quit...");
        rx
    };
    #[cfg(not(feature = "leap"))]
    let rx = {
        // The simulator owns stdin; an empty line quits.
        let (_tx, rx) = spawn_frame_source(SimFrameSource);
        rx
    };

    loop {
        match rx.recv() {
            Ok(SensorEvent::Init) => listener.on_init(),
            Ok(SensorEvent::Connect) => listener.on_connect(),
            Ok(SensorEvent::Disconnect) => listener.on_disconnect(),
            Ok(SensorEvent::Frame(frame)) => listener.on_frame(&frame),
            Ok(SensorEvent::Exit) => {
                listener.on_exit();
                break;
            }
            Ok(SensorEvent::Quit) | Err(_) => break,
        }
    }

    listener.bulbs_mut().restore_initial();
    info!("initial bulb state restored");
    Ok(())
}

#[cfg(feature = "lifx")]
fn make_backend(cfg: &AppConfig) -> Result<LifxLight, LightError> {
    LifxLight::new(cfg.broadcast, cfg.discovery_timeout)
}

#[cfg(not(feature = "lifx"))]
fn make_backend(_cfg: &AppConfig) -> Result<SimLight, LightError> {
    Ok(SimLight::default())
}

/// Hardware mode keeps stdin for the quit prompt: one line (or EOF) sends
/// [`SensorEvent::Quit`].
#[cfg(feature = "leap")]
fn spawn_stdin_quit(tx: std::sync::mpsc::Sender<SensorEvent>) {
    std::thread::spawn(move || {
        let mut buf = String::new();
        let _ = std::io::stdin().read_line(&mut buf);
        let _ = tx.send(SensorEvent::Quit);
    });
}
