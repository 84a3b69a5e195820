//! Ports for the relay subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::{RelayApi, RequestOutcome, ResponseOutcome};
pub use outbound::{ClientLink, DeliveryError, NodeLink};
