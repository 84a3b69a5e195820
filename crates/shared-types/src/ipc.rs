//! # Wire Messages
//!
//! Messages exchanged with consensus nodes. Every message type owns exactly
//! one opcode; the network substrate registers one handler per opcode.
//!
//! | Opcode | Message | Direction |
//! |--------|---------|-----------|
//! | `0x04` | [`ReqCmd`] | client → node |
//! | `0x05` | [`RespCmd`] | node → client |

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::entities::{Command, Finality};
use crate::errors::CodecError;

/// Dispatch key of a wire message.
pub type Opcode = u8;

/// A message that can travel over the network substrate.
pub trait WireMessage: Serialize + DeserializeOwned + Send + 'static {
    /// Opcode carried in the frame header.
    const OPCODE: Opcode;

    /// Human-readable tag for logging.
    const NAME: &'static str;

    /// Serialize the message body.
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a message body.
    fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        Ok(bincode::deserialize(payload)?)
    }

    /// Deserialize a message body tagged with `opcode`, refusing bodies
    /// that belong to another message type.
    fn decode_tagged(opcode: Opcode, payload: &[u8]) -> Result<Self, CodecError> {
        if opcode != Self::OPCODE {
            return Err(CodecError::OpcodeMismatch {
                expected: Self::OPCODE,
                actual: opcode,
            });
        }
        Self::decode(payload)
    }
}

/// Request carrying one command for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReqCmd {
    pub cmd: Command,
}

impl ReqCmd {
    #[must_use]
    pub fn new(cmd: Command) -> Self {
        Self { cmd }
    }
}

impl WireMessage for ReqCmd {
    const OPCODE: Opcode = 0x04;
    const NAME: &'static str = "req_cmd";
}

/// Response carrying the finality record of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespCmd {
    pub fin: Finality,
}

impl RespCmd {
    #[must_use]
    pub fn new(fin: Finality) -> Self {
        Self { fin }
    }
}

impl WireMessage for RespCmd {
    const OPCODE: Opcode = 0x05;
    const NAME: &'static str = "resp_cmd";
}
