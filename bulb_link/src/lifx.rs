//! Real-bulb backend over the LIFX LAN protocol (feature `lifx`).
//!
//! Framing is delegated to `lifx-core`; this module only does the UDP
//! plumbing: broadcast discovery, per-bulb state readback, and
//! fire-and-forget writes.

use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use lifx_core::{BuildOptions, Message, RawMessage, Service, HSBK};
use tracing::debug;

use crate::backend::{LightBackend, LightError};
use crate::state::{degrees_to_raw, unit_to_raw, RawBulbState};

impl From<lifx_core::Error> for LightError {
    fn from(e: lifx_core::Error) -> Self {
        LightError::Protocol(e.to_string())
    }
}

/// One discovered bulb: its protocol target id and unicast address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifxHandle {
    pub target: u64,
    pub addr:   SocketAddr,
}

// ════════════════════════════════════════════════════════════════════════════
// LifxLight
// ════════════════════════════════════════════════════════════════════════════

pub struct LifxLight {
    sock:      UdpSocket,
    broadcast: SocketAddr,
    timeout:   Duration,
    source:    u32,
    sequence:  u8,
}

impl LifxLight {
    /// Bind an ephemeral UDP socket set up for broadcast discovery.
    /// `timeout` bounds how long discovery and readback wait for replies.
    pub fn new(broadcast: SocketAddr, timeout: Duration) -> Result<Self, LightError> {
        let sock = UdpSocket::bind(("0.0.0.0", 0))?;
        sock.set_broadcast(true)?;
        sock.set_read_timeout(Some(timeout))?;
        Ok(LifxLight {
            sock,
            broadcast,
            timeout,
            source: 0x1ea7_b01b,
            sequence: 0,
        })
    }

    fn send(&mut self, target: Option<u64>, addr: SocketAddr, msg: Message) -> Result<(), LightError> {
        self.sequence = self.sequence.wrapping_add(1);
        let opts = BuildOptions {
            target,
            res_required: matches!(msg, Message::GetService | Message::LightGet),
            source: self.source,
            sequence: self.sequence,
            ..BuildOptions::default()
        };
        let raw = RawMessage::build(&opts, msg)?;
        self.sock.send_to(&raw.pack()?, addr)?;
        Ok(())
    }

    /// Receive one datagram, or `None` once the read timeout expires.
    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, LightError> {
        match self.sock.recv_from(buf) {
            Ok(x) => Ok(Some(x)),
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl LightBackend for LifxLight {
    type Handle = LifxHandle;

    fn discover(&mut self) -> Result<Vec<LifxHandle>, LightError> {
        self.send(None, self.broadcast, Message::GetService)?;

        let mut found = Vec::new();
        let mut buf = [0u8; 1024];
        let deadline = Instant::now() + self.timeout;
        while Instant::now() < deadline {
            let Some((n, from)) = self.recv(&mut buf)? else { break };
            let Ok(raw) = RawMessage::unpack(&buf[..n]) else { continue };
            if let Ok(Message::StateService { port, service }) = Message::from_raw(&raw) {
                if matches!(service, Service::UDP) {
                    let handle = LifxHandle {
                        target: raw.frame_addr.target,
                        addr:   SocketAddr::new(from.ip(), port as u16),
                    };
                    if !found.contains(&handle) {
                        debug!(target = handle.target, addr = %handle.addr, "bulb answered");
                        found.push(handle);
                    }
                }
            }
        }
        Ok(found)
    }

    fn get_state(&mut self, bulbs: &[LifxHandle]) -> Result<Vec<RawBulbState>, LightError> {
        let mut states = Vec::with_capacity(bulbs.len());
        let mut buf = [0u8; 1024];
        for bulb in bulbs {
            self.send(Some(bulb.target), bulb.addr, Message::LightGet)?;
            let deadline = Instant::now() + self.timeout;
            while Instant::now() < deadline {
                let Some((n, _)) = self.recv(&mut buf)? else { break };
                let Ok(raw) = RawMessage::unpack(&buf[..n]) else { continue };
                if raw.frame_addr.target != bulb.target {
                    continue;
                }
                if let Ok(Message::LightState { color, power, .. }) = Message::from_raw(&raw) {
                    states.push(RawBulbState {
                        hue:        color.hue,
                        saturation: color.saturation,
                        brightness: color.brightness,
                        kelvin:     color.kelvin,
                        power,
                    });
                    break;
                }
            }
        }
        Ok(states)
    }

    fn set_power(&mut self, bulbs: &[LifxHandle], on: bool) -> Result<(), LightError> {
        let level = if on { u16::MAX } else { 0 };
        for bulb in bulbs {
            self.send(
                Some(bulb.target),
                bulb.addr,
                Message::LightSetPower { level, duration: 0 },
            )?;
        }
        Ok(())
    }

    fn set_state(
        &mut self,
        bulbs: &[LifxHandle],
        hue: f32,
        saturation: f32,
        brightness: f32,
        kelvin: u16,
        transition_ms: u32,
    ) -> Result<(), LightError> {
        let color = HSBK {
            hue:        degrees_to_raw(hue),
            saturation: unit_to_raw(saturation),
            brightness: unit_to_raw(brightness),
            kelvin,
        };
        for bulb in bulbs {
            self.send(
                Some(bulb.target),
                bulb.addr,
                Message::LightSetColor { reserved: 0, color, duration: transition_ms },
            )?;
        }
        Ok(())
    }
}
