//! # Shared Net - Message Network Substrate
//!
//! Connect / listen / send / receive over TCP with a registered handler per
//! message opcode.
//!
//! ## Event Loop
//!
//! ```text
//!  ┌────────────┐  frames   ┌──────────────┐  &mut S   ┌──────────────┐
//!  │ reader task│ ────────→ │ inbound queue│ ────────→ │ handler[op]  │
//!  │ (per conn) │           │ (bounded)    │  run()    │ FnMut(S,M,c) │
//!  └────────────┘           └──────────────┘           └──────┬───────┘
//!                                                             │ send_msg
//!  ┌────────────┐  bytes                                      │
//!  │ writer task│ ←───────────────────────────────────────────┘
//!  └────────────┘
//! ```
//!
//! Socket I/O happens on per-connection tasks. Handlers only ever run inside
//! [`MsgNetwork::run`], one at a time, against the state object the caller
//! passes in, so handler state needs no locking.
//!
//! ## Wire Format
//!
//! `[opcode: u8][len: u32-le][payload: len bytes]`, see [`frame`].

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod network;
pub mod registry;

pub use config::NetConfig;
pub use connection::{ConnId, Connection};
pub use error::NetError;
pub use frame::Frame;
pub use network::{LoopExit, MsgNetwork, NetHandle};
pub use registry::HandlerRegistry;
