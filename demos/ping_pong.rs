//! A self-contained ping-pong bridge over two in-memory transports.
//!
//! Seeds a little traffic on both buses, runs the bridge for a couple of
//! seconds, then reports what each side transmitted. Run with
//! `RUST_LOG=info` to watch the per-cycle health and traffic reports.
use std::time::Duration;

use canbridge::transport::MockTransport;
use canbridge::{Bridge, BridgeConfig, CancelToken, Event, Frame, Id, LinkConfig, RemoteRequest};

fn main() -> Result<(), canbridge::Error> {
    env_logger::Builder::from_default_env().init();

    let mut can1 = MockTransport::open(LinkConfig::default())?;
    let mut can2 = MockTransport::open(LinkConfig::default())?;

    // Seed some traffic so the first cycles have something to report.
    can1.push_event(Event::Frame(Frame::new(Id::Standard(0x123), b"hi")?));
    can1.push_event(Event::RemoteRequest(RemoteRequest::new(
        Id::Standard(0x50),
        4,
    )?));
    can2.push_event(Event::Frame(Frame::new(Id::Standard(0x321), b"yo")?));

    let config = BridgeConfig {
        cycle_period: Duration::from_millis(200),
        poll_timeout: Duration::from_millis(200),
        ..BridgeConfig::default()
    };
    let mut bridge = Bridge::new(can1, can2, config);

    let cancel = CancelToken::new();
    let stopper = cancel.clone();
    let timer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_secs(2));
        stopper.cancel();
    });

    bridge.run(&cancel);
    timer.join().expect("timer thread panicked");

    let (can1, can2) = bridge.into_transports();
    log::info!(
        "CAN1 sent {} frames, CAN2 sent {} frames",
        can1.sent().len(),
        can2.sent().len()
    );
    Ok(())
}
