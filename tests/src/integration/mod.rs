//! # Integration Tests
//!
//! End-to-end behaviour of the correlation engine over the channel
//! transport, with the test acting as the executor.

pub mod lifecycle;
pub mod ordering;
pub mod routing;
