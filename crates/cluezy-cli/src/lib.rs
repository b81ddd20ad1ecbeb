//! # Cluezy CLI
//!
//! The `cluezy` binary: `serve` runs the HTTP API, `chat` is a terminal
//! client that drives a [`cluezy_core::ChatSession`] against a running
//! server through [`remote::RemoteApi`].

pub mod cli;
pub mod commands;
pub mod remote;
