//! HTTP route handlers.

pub mod channels;
pub mod health;
pub mod metrics;
