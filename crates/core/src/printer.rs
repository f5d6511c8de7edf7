// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Printer record and its bearer credential.

use crate::id::HouseholdId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a physical printer.
    pub struct PrinterId("prn-");
}

/// Long-lived bearer secret flashed into the printer firmware.
///
/// Compared by equality on every dispatch request; it is the sole
/// authentication factor for the consumer device. The `Debug` impl
/// redacts the value so the key never lands in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(smol_str::SmolStr);

impl ApiKey {
    /// Generate a fresh random key (32 url-safe characters).
    pub fn generate() -> Self {
        Self(smol_str::SmolStr::new(&nanoid::nanoid!(32)))
    }

    pub fn from_string(key: impl Into<smol_str::SmolStr>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

/// A registered consumer device. At most one per household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Printer {
    pub id: PrinterId,
    pub household_id: HouseholdId,
    pub name: String,
    pub api_key: ApiKey,
    /// Epoch ms of the last authenticated poll, if any.
    pub last_seen_ms: Option<u64>,
}

impl Printer {
    /// Register a new printer with a generated id and API key.
    pub fn new(household_id: HouseholdId, name: impl Into<String>) -> Self {
        Self {
            id: PrinterId::new(),
            household_id,
            name: name.into(),
            api_key: ApiKey::generate(),
            last_seen_ms: None,
        }
    }

    /// Check a presented credential against this printer's key.
    pub fn authenticate(&self, key: &ApiKey) -> bool {
        self.api_key == *key
    }

    pub fn mark_seen(&mut self, at_ms: u64) {
        self.last_seen_ms = Some(at_ms);
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
