//! Opcode → handler registry.

use shared_types::{CodecError, Opcode, WireMessage};
use std::collections::HashMap;
use std::ops::ControlFlow;

use crate::connection::Connection;
use crate::error::NetError;
use crate::frame::Frame;

type Handler<S> =
    Box<dyn FnMut(&mut S, &Frame, &Connection) -> Result<ControlFlow<()>, CodecError> + Send>;

/// Result of routing one frame.
#[derive(Debug)]
pub enum Dispatch {
    /// A handler ran and returned this flow.
    Handled(ControlFlow<()>),
    /// No handler is registered for the frame's opcode.
    UnknownOpcode(Opcode),
    /// The handler's message type could not decode the payload.
    Malformed(CodecError),
}

/// At most one handler per opcode, each taking the loop's state by reference.
pub struct HandlerRegistry<S> {
    handlers: HashMap<Opcode, (&'static str, Handler<S>)>,
}

impl<S> Default for HandlerRegistry<S> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<S> HandlerRegistry<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `M::OPCODE`.
    pub fn register<M, F>(&mut self, mut handler: F) -> Result<(), NetError>
    where
        M: WireMessage,
        F: FnMut(&mut S, M, &Connection) -> ControlFlow<()> + Send + 'static,
    {
        if let Some((name, _)) = self.handlers.get(&M::OPCODE) {
            return Err(NetError::DuplicateHandler {
                opcode: M::OPCODE,
                name: *name,
            });
        }
        let erased: Handler<S> = Box::new(move |state, frame, conn| {
            let msg = frame.decode::<M>()?;
            Ok(handler(state, msg, conn))
        });
        self.handlers.insert(M::OPCODE, (M::NAME, erased));
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, opcode: Opcode) -> bool {
        self.handlers.contains_key(&opcode)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Route `frame` to its handler.
    pub fn dispatch(&mut self, state: &mut S, frame: &Frame, conn: &Connection) -> Dispatch {
        match self.handlers.get_mut(&frame.opcode) {
            Some((_, handler)) => match handler(state, frame, conn) {
                Ok(flow) => Dispatch::Handled(flow),
                Err(e) => Dispatch::Malformed(e),
            },
            None => Dispatch::UnknownOpcode(frame.opcode),
        }
    }
}
