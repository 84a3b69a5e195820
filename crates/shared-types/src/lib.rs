//! # Shared Types Crate
//!
//! Types exchanged between clients, the relay, the benchmark driver and the
//! consensus nodes.
//!
//! ## Design Principles
//!
//! - **Content addressing**: a [`Command`] is identified by its
//!   [`CommandHash`]; every correlation in the workspace is keyed on it.
//! - **Opaque engine**: the consensus engine is only seen through the
//!   [`ReqCmd`] / [`RespCmd`] wire messages and the [`Finality`] record.
//! - **One opcode per message**: the network substrate dispatches on
//!   [`WireMessage::OPCODE`].

pub mod entities;
pub mod errors;
pub mod ipc;
pub mod replica;

pub use entities::*;
pub use errors::*;
pub use ipc::*;
pub use replica::ReplicaSpec;
