//! # Port Adapters
//!
//! Implementations of the subsystems' outbound ports over `shared-net`.
//!
//! | Port | Adapter | Backed by |
//! |------|---------|-----------|
//! | `NodeLink` | [`NodeConnectionLink`] | the relay's one node connection |
//! | `ClientLink` | [`ClientNetworkLink`] | the relay's client network, by peer address |
//! | `ReplicaFanout` | [`ConnectionSets`] | per-path replica connections |

pub mod fanout;
pub mod relay_links;

pub use fanout::ConnectionSets;
pub use relay_links::{ClientNetworkLink, NodeConnectionLink};
