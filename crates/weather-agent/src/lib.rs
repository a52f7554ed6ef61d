//! A demonstration weather agent.
//!
//! The agent registers one dummy tool (a hardcoded weather responder)
//! with an agent client, submits natural-language queries, and reports
//! the assistant's text responses line by line. The included binary
//! drives two example queries against a scripted in-process runtime.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

pub mod config;
mod runner;
pub mod tools;

pub use runner::{
    LineKind, agent_options, run_weather_agent, weather_tool_server,
};
