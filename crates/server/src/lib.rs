// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scribe daemon library.
//!
//! Exposes the listener and configuration so integration tests can run an
//! in-process daemon against a real socket.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod listener;

pub use config::{ConfigError, ServerConfig};
pub use listener::{ListenCtx, Listener, PROTOCOL_VERSION};
