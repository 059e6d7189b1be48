//! Terminal rendering and the event loop.

pub mod main;
pub mod runtime;
pub mod theme;
