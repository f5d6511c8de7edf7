// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol between the scribe daemon and its clients.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod types;
mod wire;

pub use request::Request;
pub use response::{ErrorKind, Response};
pub use types::JobTicket;
pub use wire::{decode, encode, read_message, write_message, ProtocolError};
pub use wire::{read_request, read_response, write_request, write_response};
