//! Outbound messaging: the port the bot talks through, its keyboards and callback codec.

pub mod callbacks;
pub mod keyboards;
pub mod port;
pub mod throttled;
pub mod types;
