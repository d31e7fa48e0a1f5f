//! An in-memory transport for tests and demos.

use std::collections::VecDeque;
use std::time::Duration;

use super::{BusState, HealthSnapshot, LinkConfig, Transport};
use crate::error::Error;
use crate::frame::{Event, Frame};

/// A scriptable in-memory CAN transport.
///
/// Inbound events and send results are queued ahead of time; every frame
/// passed to [`Transport::send`] is recorded in order.
#[derive(Debug)]
pub struct MockTransport {
    config: LinkConfig,
    inbound: Vec<Event>,
    sent: Vec<Frame>,
    send_results: VecDeque<bool>,
    health: HealthSnapshot,
    listening: bool,
    last_poll_timeout: Option<Duration>,
}

impl MockTransport {
    /// Opens a mock link. A zero baudrate is rejected, as a real driver
    /// would reject it.
    pub fn open(config: LinkConfig) -> Result<Self, Error> {
        if config.baudrate == 0 {
            return Err(Error::Config("baudrate must be non-zero".to_owned()));
        }
        Ok(Self {
            config,
            inbound: Vec::new(),
            sent: Vec::new(),
            send_results: VecDeque::new(),
            health: HealthSnapshot::default(),
            listening: false,
            last_poll_timeout: None,
        })
    }

    /// Queues an event for the next polling session.
    pub fn push_event(&mut self, event: Event) {
        self.inbound.push(event);
    }

    /// Queues the result of a future send. Unscripted sends succeed.
    pub fn script_send_result(&mut self, ok: bool) {
        self.send_results.push_back(ok);
    }

    /// Overrides the reported bus state.
    pub fn set_bus_state(&mut self, state: BusState) {
        self.health.state = state;
    }

    /// Overrides the reported error counters.
    pub fn set_error_counts(&mut self, tx: u32, rx: u32) {
        self.health.tx_error_count = tx;
        self.health.rx_error_count = rx;
    }

    /// Every frame sent through this transport, in order.
    pub fn sent(&self) -> &[Frame] {
        &self.sent
    }

    /// Whether a polling session is currently open.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// The timeout passed to the most recent polling session.
    pub fn last_poll_timeout(&self) -> Option<Duration> {
        self.last_poll_timeout
    }
}

impl Transport for MockTransport {
    type Error = std::convert::Infallible;

    type Listener<'a>
        = MockListener<'a>
    where
        Self: 'a;

    fn send(&mut self, frame: &Frame) -> Result<bool, Self::Error> {
        self.sent.push(*frame);
        Ok(self.send_results.pop_front().unwrap_or(true))
    }

    fn listen(&mut self, timeout: Duration) -> Result<MockListener<'_>, Self::Error> {
        self.last_poll_timeout = Some(timeout);
        if self.config.auto_restart && self.health.state == BusState::BusOff {
            self.health.state = BusState::ErrorActive;
        }
        self.listening = true;
        let events = std::mem::take(&mut self.inbound);
        Ok(MockListener {
            events: events.into_iter(),
            open: &mut self.listening,
        })
    }

    fn health(&self) -> HealthSnapshot {
        self.health
    }
}

/// A polling session over a [`MockTransport`].
///
/// Yields the events queued before the session opened. Dropping the listener
/// releases the session; events left unconsumed are discarded, the sequence
/// is not restartable.
#[derive(Debug)]
pub struct MockListener<'a> {
    events: std::vec::IntoIter<Event>,
    open: &'a mut bool,
}

impl Iterator for MockListener<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.events.next()
    }
}

impl Drop for MockListener<'_> {
    fn drop(&mut self) {
        *self.open = false;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::frame::{Id, RemoteRequest};

    fn link() -> MockTransport {
        MockTransport::open(LinkConfig::default()).unwrap()
    }

    #[test]
    fn zero_baudrate_is_rejected() {
        assert!(MockTransport::open(LinkConfig {
            baudrate: 0,
            auto_restart: true,
        })
        .is_err());
    }

    #[test]
    fn listen_drains_queued_events_once() {
        let mut t = link();
        let frame = Frame::new(Id::Standard(0x123), b"hi").unwrap();
        t.push_event(Event::Frame(frame));
        let events: Vec<_> = t.listen(Duration::from_secs(1)).unwrap().collect();
        assert_eq!(events, vec![Event::Frame(frame)]);
        assert_eq!(t.listen(Duration::from_secs(1)).unwrap().count(), 0);
    }

    #[test]
    fn empty_poll_yields_no_events_and_closes() {
        let mut t = link();
        assert_eq!(t.listen(Duration::from_millis(10)).unwrap().count(), 0);
        assert_eq!(t.last_poll_timeout(), Some(Duration::from_millis(10)));
        assert!(!t.is_listening());
    }

    #[test]
    fn dropping_a_listener_releases_the_session() {
        let mut t = link();
        t.push_event(Event::Frame(Frame::new(Id::Standard(1), b"a").unwrap()));
        t.push_event(Event::RemoteRequest(
            RemoteRequest::new(Id::Standard(2), 4).unwrap(),
        ));
        {
            let mut listener = t.listen(Duration::from_secs(1)).unwrap();
            let _ = listener.next();
            // dropped here with one event unconsumed
        }
        assert!(!t.is_listening());
        assert_eq!(t.listen(Duration::from_secs(1)).unwrap().count(), 0);
    }

    #[test]
    fn send_records_frames_and_honors_scripts() {
        let mut t = link();
        t.script_send_result(false);
        let frame = Frame::new(Id::Standard(0xf6), b"ping").unwrap();
        assert_eq!(t.send(&frame), Ok(false));
        assert_eq!(t.send(&frame), Ok(true));
        assert_eq!(t.sent(), [frame, frame]);
    }

    #[test]
    fn auto_restart_recovers_from_bus_off() {
        let mut t = link();
        t.set_bus_state(BusState::BusOff);
        assert!(t.health().is_degraded());
        let _ = t.listen(Duration::from_secs(1)).unwrap();
        assert_eq!(t.health().state, BusState::ErrorActive);
    }

    #[test]
    fn bus_off_sticks_without_auto_restart() {
        let mut t = MockTransport::open(LinkConfig {
            auto_restart: false,
            ..LinkConfig::default()
        })
        .unwrap();
        t.set_bus_state(BusState::BusOff);
        let _ = t.listen(Duration::from_secs(1)).unwrap();
        assert_eq!(t.health().state, BusState::BusOff);
    }
}
