//! # qe-01-relay-proxy
//!
//! Speedbump: a forwarding relay that puts one extra network hop between
//! clients and a single consensus node.
//!
//! ## Overview
//!
//! - **Client side**: accepts client connections and `ReqCmd` requests,
//!   remembers which client sent which command hash, forwards upstream.
//! - **Node side**: one persistent connection to the node; each `RespCmd`
//!   is routed back to the client that submitted its command.
//!
//! The two sides run separate event loops on separate threads and share
//! only the [`CorrelationTable`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use qe_01_relay_proxy::{RelayApi, RelayService};
//!
//! let relay = Arc::new(RelayService::new(node_link, client_link));
//!
//! // client-side loop
//! relay.handle_client_request(cmd, client_addr)?;
//!
//! // node-side loop
//! relay.handle_node_response(finality);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{CorrelationTable, RelayStats, RelayStatsSnapshot};
pub use error::{RelayError, RelayResult};
pub use ports::{ClientLink, DeliveryError, NodeLink, RelayApi, RequestOutcome, ResponseOutcome};
pub use service::RelayService;
