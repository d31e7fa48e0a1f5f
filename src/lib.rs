//! A dual-transport CAN bridge core. Polls two independently-typed CAN
//! controllers on a fixed cadence, classifies inbound traffic (data frames
//! vs. remote transmission requests), answers data frames across the bus
//! boundary with a fixed per-direction frame, and reports transport health
//! counters every cycle.
//!
//! Concrete bus drivers live outside this crate and plug in through the
//! [`Transport`] trait. An in-memory driver ([`transport::MockTransport`],
//! behind the default `mock` feature) is provided for tests and demos.
//!
//! No failure is fatal to the bridge: failed sends, driver errors and
//! degraded bus states are logged and the loop carries on with the next
//! cycle.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true
)]
#![deny(
// missing_debug_implementations,
missing_docs,
trivial_casts,
trivial_numeric_casts,
unused_extern_crates,
unused_import_braces,
unused_qualifications,
// unused_results
)]
#![warn(clippy::unwrap_used)]

mod bridge;
mod error;
pub mod frame;
pub mod transport;

pub use bridge::{Bridge, BridgeConfig, CancelToken, CycleReport, PING, PONG};
pub use error::*;
pub use frame::{Event, Frame, Id, Payload, RemoteRequest};
pub use transport::{BusState, HealthSnapshot, LinkConfig, Transport};
