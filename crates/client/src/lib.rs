//! An abstraction layer for agent runtimes.
//!
//! This crate establishes the protocol between a host program and the
//! agent runtime that drives a conversation for it: the configuration a
//! session is created with, the message events a session streams back,
//! and the tools the runtime may invoke on the host's behalf.
//!
//! The runtime itself is an external collaborator. Types in this crate
//! don't define its behavior, instead they are the constraints that the
//! implementors should adhere to. The one exception is [`ToolServer`],
//! which owns the host-side half of the contract: it bundles tools under
//! a server name and dispatches invocation requests to them.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod message;
mod options;
mod server;
mod session;
pub mod tool;

pub use error::*;
pub use message::*;
pub use options::*;
pub use server::*;
pub use session::*;
