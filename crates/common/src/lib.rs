//! Shared vocabulary for the keyword notification system.
//!
//! This crate provides the types every other layer speaks:
//! - Opaque identifier newtypes for channels, users, keywords and text
//! - The `Message` / `Command` / `Event` traits the bus dispatches on

pub mod message;
pub mod types;

pub use message::{Command, Event, Message, MessageKind};
pub use types::{ChannelName, Keyword, Text, User};
