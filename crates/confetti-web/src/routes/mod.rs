//! Route handlers.

pub mod trigger;
pub mod webhook;
