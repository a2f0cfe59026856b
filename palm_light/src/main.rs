//! palm_light — interactive entry point.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use palm_light::app::{run, AppConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "palm_light", about = "Control LIFX bulbs with hand tracking")]
struct Cli {
    /// Toggle power once per swipe instead of once per phase report
    #[arg(long)]
    dedup_swipes: bool,

    /// Broadcast address for bulb discovery
    #[arg(long, default_value = "255.255.255.255:56700")]
    broadcast: SocketAddr,

    /// How long to wait for discovery replies, in milliseconds
    #[arg(long, default_value_t = 1000)]
    discovery_timeout_ms: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!();
    println!("  palm_light — hand-tracked bulb control");
    #[cfg(feature = "leap")]
    println!("  Sensor: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Sensor: stdin simulation  (use --features leap for hardware)");
    #[cfg(feature = "lifx")]
    println!("  Bulbs:  LIFX over LAN");
    #[cfg(not(feature = "lifx"))]
    println!("  Bulbs:  simulated  (use --features lifx for real bulbs)");
    println!();

    let cfg = AppConfig {
        dedup_swipes:      cli.dedup_swipes,
        broadcast:         cli.broadcast,
        discovery_timeout: Duration::from_millis(cli.discovery_timeout_ms),
    };

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
