//! Adapters for the engine's ports.
//!
//! - `channel`: in-process transport over bounded tokio channels
//! - `listener`: drains an [`InboundSource`](crate::ports::InboundSource) into an engine

pub mod channel;
pub mod listener;

pub use channel::{channel_transport, inbound_channel, ChannelSource, ChannelTransport};
pub use listener::ResponseListener;
