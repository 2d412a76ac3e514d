//! Ports for the correlation engine.
//!
//! - `outbound`: the transport the engine submits envelopes to
//! - `inbound`: how received messages reach the engine

pub mod inbound;
pub mod outbound;

pub use inbound::{InboundMessage, InboundSink, InboundSource};
pub use outbound::TransportPort;
