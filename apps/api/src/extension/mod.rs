//! The two endpoints the browser extension (and the `clip` CLI) talk to,
//! plus the client side of that conversation.

pub mod client;
pub mod handlers;

pub use client::{ClientError, ExtensionClient, ExtensionConfig};
