//! The fixed-cadence polling loop that ties two transports together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::frame::{Event, Frame, Id, Payload};
use crate::transport::{HealthSnapshot, Transport};

/// Default heartbeat frame, sent on transport A once per cycle.
pub const PING: Frame = Frame {
    id: Id::Standard(0xf6),
    data: Payload::from_static(b"ping"),
};

/// Default response frame, sent on transport B for every data frame
/// received on A.
pub const PONG: Frame = Frame {
    id: Id::Standard(0xf7),
    data: Payload::from_static(b"pong"),
};

/// Configuration for a [`Bridge`].
///
/// The response frames carry a fixed identifier per direction, never copied
/// from the source frame, and the defaults use standard identifiers. The
/// bridge answers traffic, it does not echo it.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Pause between polling cycles.
    pub cycle_period: Duration,
    /// Upper bound on each transport's polling session per cycle.
    pub poll_timeout: Duration,
    /// Frame sent unconditionally on transport A once per cycle.
    pub heartbeat: Frame,
    /// Frame sent on transport B for every data frame received on A.
    pub forward_a_to_b: Frame,
    /// Frame sent on transport A for every data frame received on B.
    ///
    /// `None` leaves the bridge one-directional: traffic on B is still
    /// reported, but not answered.
    pub forward_b_to_a: Option<Frame>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            cycle_period: Duration::from_secs(1),
            poll_timeout: Duration::from_secs(1),
            heartbeat: PING,
            forward_a_to_b: PONG,
            forward_b_to_a: None,
        }
    }
}

/// What one polling cycle observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Health of transport A at the start of the cycle.
    pub health_a: HealthSnapshot,
    /// Health of transport B at the start of the cycle.
    pub health_b: HealthSnapshot,
    /// Events drained from transport A.
    pub events_a: usize,
    /// Events drained from transport B.
    pub events_b: usize,
    /// Frames forwarded onto transport B.
    pub forwarded_to_b: usize,
    /// Frames forwarded onto transport A.
    pub forwarded_to_a: usize,
    /// Whether the heartbeat send on transport A succeeded.
    pub heartbeat_sent: bool,
}

/// Cooperative cancellation flag for [`Bridge::run`].
///
/// Checked between cycles only: a polling session in progress runs to
/// completion or its own timeout before the loop exits.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the bridge to stop after the cycle in progress.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A bridge between two CAN transports.
///
/// Owns both transports for its entire lifetime and drives them from a
/// single thread: health reporting, sequential polling of A then B,
/// cross-bus forwarding, and a per-cycle heartbeat on A. No failure is
/// fatal; everything is logged and retried no sooner than the next cycle.
pub struct Bridge<A, B>
where
    A: Transport,
    B: Transport,
{
    a: A,
    b: B,
    config: BridgeConfig,
}

impl<A, B> Bridge<A, B>
where
    A: Transport,
    B: Transport,
{
    /// Creates a bridge owning both transports.
    pub fn new(a: A, b: B, config: BridgeConfig) -> Self {
        Self { a, b, config }
    }

    /// Transport A.
    pub fn transport_a(&self) -> &A {
        &self.a
    }

    /// Transport B.
    pub fn transport_b(&self) -> &B {
        &self.b
    }

    /// Releases both transports.
    pub fn into_transports(self) -> (A, B) {
        (self.a, self.b)
    }

    /// Runs one polling cycle without sleeping.
    ///
    /// In order: report health of both transports, drain A's listener
    /// (answering data frames on B), drain B's listener (answering on A only
    /// when configured), then send the heartbeat on A exactly once.
    pub fn run_cycle(&mut self) -> CycleReport {
        let Bridge { a, b, config } = self;

        let health_a = a.health();
        let health_b = b.health();
        report_health("CAN1", &health_a);
        report_health("CAN2", &health_b);

        let (events_a, forwarded_to_b) = drain_side(
            "CAN1",
            a,
            b,
            Some(&config.forward_a_to_b),
            config.poll_timeout,
        );
        let (events_b, forwarded_to_a) = drain_side(
            "CAN2",
            b,
            a,
            config.forward_b_to_a.as_ref(),
            config.poll_timeout,
        );

        let heartbeat_sent = match a.send(&config.heartbeat) {
            Ok(true) => {
                log::info!("CAN1: sent heartbeat {}", config.heartbeat.id);
                true
            }
            Ok(false) => {
                log::warn!("CAN1: heartbeat {} not sent", config.heartbeat.id);
                false
            }
            Err(err) => {
                log::warn!("CAN1: heartbeat send error: {err}");
                false
            }
        };

        CycleReport {
            health_a,
            health_b,
            events_a,
            events_b,
            forwarded_to_b,
            forwarded_to_a,
            heartbeat_sent,
        }
    }

    /// Runs cycles until `cancel` is set, sleeping `cycle_period` between
    /// them. Cancellation is checked between cycles.
    pub fn run(&mut self, cancel: &CancelToken) {
        while !cancel.is_cancelled() {
            let report = self.run_cycle();
            log::debug!("cycle complete: {report:?}");
            if cancel.is_cancelled() {
                break;
            }
            std::thread::sleep(self.config.cycle_period);
        }
        log::info!("bridge stopped");
    }
}

fn report_health(label: &str, health: &HealthSnapshot) {
    log::info!(
        "{label}: tx errors {} rx errors {} state {}",
        health.tx_error_count,
        health.rx_error_count,
        health.state
    );
    if health.is_degraded() {
        log::warn!("{label}: bus degraded ({})", health.state);
    }
}

/// Drains one polling session on `rx`, reporting every event and answering
/// data frames on `tx` with `reply` when forwarding is configured. Returns
/// (events seen, frames forwarded).
fn drain_side<R, T>(
    label: &str,
    rx: &mut R,
    tx: &mut T,
    reply: Option<&Frame>,
    timeout: Duration,
) -> (usize, usize)
where
    R: Transport,
    T: Transport,
{
    let listener = match rx.listen(timeout) {
        Ok(listener) => listener,
        Err(err) => {
            log::warn!("{label}: poll error: {err}");
            return (0, 0);
        }
    };

    let mut events = 0;
    let mut forwarded = 0;
    for event in listener {
        events += 1;
        match event {
            Event::Frame(frame) => {
                log::info!(
                    "{label}: received {} from {}",
                    hex::encode(&frame.data),
                    frame.id
                );
                if let Some(reply) = reply {
                    match tx.send(reply) {
                        Ok(true) => forwarded += 1,
                        Ok(false) => log::warn!("{label}: forward of {} failed", reply.id),
                        Err(err) => log::warn!("{label}: forward error: {err}"),
                    }
                }
            }
            Event::RemoteRequest(req) => {
                log::info!(
                    "{label}: RTR request length {} from {}",
                    req.length,
                    req.id
                );
            }
        }
    }
    (events, forwarded)
}
