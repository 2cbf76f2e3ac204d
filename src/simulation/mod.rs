//! Simulation engine.
//!
//! Drives ping and packet-send sessions against the topology graph. Each
//! session reads a consistent snapshot of the path and device positions at
//! submission time, then runs on its own thread so a multi-hundred-
//! millisecond animation never blocks the interaction loop. Sessions emit
//! timed `SimulationStep` events and one terminal `SimulationResult`; they
//! never mutate the topology. Cancellation drops all subsequent steps
//! silently, with no error reported: deletion wins.

pub mod report;

pub use report::{PacketReport, PingReport, PingSample, SimulationReport};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;

use crate::error::CoreError;
use crate::events::{CoreEvent, EventBus};
use crate::path;
use crate::topology::{Point, Topology};

/// Echo requests per ping session
pub const PING_SAMPLE_COUNT: usize = 4;

/// Nominal echo payload size reported in the ping text
pub const PING_PAYLOAD_BYTES: u32 = 32;

/// Interpolated positions emitted per hop (t = 0..=20 over the segment)
pub const HOP_ANIMATION_STEPS: usize = 21;

/// Delay between animation steps
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(50);

/// Fixed round-trip figure reported for TCP sessions
pub const TCP_ROUND_TRIP_MS: u32 = 60;

/// Payload used when the caller does not supply one
pub const DEFAULT_PAYLOAD: &str = "Hello, Network!";

/// Delivery style of a packet-send session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// One forward animation pass, no acknowledgment
    Udp,
    /// Forward pass, then an identical reverse pass for the acknowledgment
    Tcp,
}

/// Handle to a running simulation task.
///
/// Dropping the handle detaches the task (fire-and-forget); [`cancel`]
/// stops it at the next step boundary without emitting anything further.
///
/// [`cancel`]: SimulationHandle::cancel
#[derive(Debug)]
pub struct SimulationHandle {
    session: u64,
    cancel: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SimulationHandle {
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Request cancellation. Remaining steps and the final result are
    /// dropped silently.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Block until the task finishes. Intended for headless callers; an
    /// interactive UI just drains events instead.
    pub fn join(self) {
        if self.task.join().is_err() {
            log::error!("Simulation task for session {} panicked", self.session);
        }
    }
}

/// Factory for simulation sessions. Each session owns its own task and
/// timing state; the only shared piece is the cloned event bus.
#[derive(Debug)]
pub struct Simulator {
    bus: EventBus,
    step_delay: Duration,
    next_session: u64,
}

impl Simulator {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            step_delay: DEFAULT_STEP_DELAY,
            next_session: 1,
        }
    }

    /// Override the per-step delay (tests run with zero)
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    fn next_session(&mut self) -> u64 {
        let session = self.next_session;
        self.next_session += 1;
        session
    }

    /// Start a ping session between two devices.
    ///
    /// Unknown device ids fail immediately, before path resolution. All
    /// later outcomes, including an unreachable target, arrive as a
    /// `SimulationResult` event.
    pub fn ping(
        &mut self,
        topology: &Topology,
        from: &str,
        to: &str,
    ) -> Result<SimulationHandle, CoreError> {
        validate_endpoints(topology, from, to)?;
        let session = self.next_session();
        let target_ip = topology
            .device(to)
            .map(|d| d.ip.clone())
            .expect("endpoint validated above");
        let route = path::shortest_path(topology, from, to);
        let (from, to) = (from.to_string(), to.to_string());
        log::info!("Session {}: ping {} -> {}", session, from, to);

        let bus = self.bus.clone();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);
        let task = thread::spawn(move || {
            if cancel_flag.load(Ordering::Relaxed) {
                return;
            }
            let result = match route {
                None => Err(CoreError::NoPath { from, to }),
                Some(_) => {
                    let mut rng = rand::thread_rng();
                    let samples = (0..PING_SAMPLE_COUNT)
                        .map(|_| PingSample {
                            time_ms: rng.gen_range(1..=100),
                            ttl: rng.gen_range(50..=128),
                        })
                        .collect();
                    Ok(SimulationReport::Ping(PingReport::from_samples(
                        &to, &target_ip, samples,
                    )))
                }
            };
            bus.emit(CoreEvent::SimulationResult { session, result });
        });

        Ok(SimulationHandle { session, cancel, task })
    }

    /// Start a packet-send session between two devices.
    ///
    /// UDP runs one forward animation pass over the shortest path; TCP
    /// follows it with an identical reverse pass for the acknowledgment.
    /// Unknown device ids fail immediately; an unreachable pair is
    /// reported through the result event with the pair named.
    pub fn send_packet(
        &mut self,
        topology: &Topology,
        from: &str,
        to: &str,
        payload: Option<&str>,
        mode: TransportMode,
    ) -> Result<SimulationHandle, CoreError> {
        validate_endpoints(topology, from, to)?;
        let session = self.next_session();
        // Snapshot the route geometry now; the live topology may change
        // while the animation plays out
        let waypoints: Option<Vec<Point>> = path::shortest_path(topology, from, to).map(|route| {
            route
                .iter()
                .filter_map(|id| topology.device(id).map(|d| d.position))
                .collect()
        });
        let report = PacketReport {
            from: from.to_string(),
            to: to.to_string(),
            payload: payload.unwrap_or(DEFAULT_PAYLOAD).to_string(),
            mode,
        };
        log::info!(
            "Session {}: send {:?} packet {} -> {}",
            session,
            mode,
            from,
            to
        );

        let bus = self.bus.clone();
        let step_delay = self.step_delay;
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);
        let task = thread::spawn(move || {
            let Some(waypoints) = waypoints else {
                bus.emit(CoreEvent::SimulationResult {
                    session,
                    result: Err(CoreError::NoPath {
                        from: report.from,
                        to: report.to,
                    }),
                });
                return;
            };

            for hop in waypoints.windows(2) {
                if !animate_hop(&bus, session, hop[0], hop[1], step_delay, &cancel_flag) {
                    return;
                }
            }
            if mode == TransportMode::Tcp {
                for hop in waypoints.windows(2).rev() {
                    if !animate_hop(&bus, session, hop[1], hop[0], step_delay, &cancel_flag) {
                        return;
                    }
                }
            }
            bus.emit(CoreEvent::SimulationResult {
                session,
                result: Ok(SimulationReport::Packet(report)),
            });
        });

        Ok(SimulationHandle { session, cancel, task })
    }
}

fn validate_endpoints(topology: &Topology, from: &str, to: &str) -> Result<(), CoreError> {
    for id in [from, to] {
        if topology.device(id).is_none() {
            return Err(CoreError::InvalidDevice(id.to_string()));
        }
    }
    Ok(())
}

/// Emit the interpolated steps for one hop. Returns false when the
/// session was cancelled mid-hop.
fn animate_hop(
    bus: &EventBus,
    session: u64,
    start: Point,
    end: Point,
    step_delay: Duration,
    cancel: &AtomicBool,
) -> bool {
    for step in 0..HOP_ANIMATION_STEPS {
        if cancel.load(Ordering::Relaxed) {
            log::debug!("Session {} cancelled; dropping remaining steps", session);
            return false;
        }
        let t = step as f64 / (HOP_ANIMATION_STEPS - 1) as f64;
        bus.emit(CoreEvent::SimulationStep {
            session,
            position: Point::lerp(start, end, t),
        });
        if !step_delay.is_zero() {
            thread::sleep(step_delay);
        }
    }
    true
}

/// Mock per-device latency figures for the latency chart, one sample in
/// [1, 100] ms per device, keyed by display name and sorted for a stable
/// chart order.
pub fn mock_latency_samples(topology: &Topology) -> Vec<(String, u32)> {
    let mut rng = rand::thread_rng();
    let mut samples: Vec<(String, u32)> = topology
        .devices()
        .map(|d| (d.display_name.clone(), rng.gen_range(1..=100)))
        .collect();
    samples.sort();
    samples
}
