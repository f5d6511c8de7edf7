// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log of store events.
//!
//! One JSON object per line: `{"seq": N, "event": {...}}`. Appends are
//! synced to disk before returning, so an acknowledged write survives a
//! crash immediately after.

use scribe_core::Event;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("WAL I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt WAL entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode WAL entry: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct WalEntry {
    seq: u64,
    event: Event,
}

/// Append handle over the log file.
pub struct Wal {
    file: File,
    write_seq: u64,
}

impl Wal {
    /// Open (or create) the log at `path`, replaying any existing entries.
    ///
    /// Returns the handle positioned after the last entry, plus the replayed
    /// events in append order.
    pub fn open(path: &Path) -> Result<(Self, Vec<Event>), WalError> {
        let mut events = Vec::new();
        let mut write_seq = 0;

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for (i, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let entry: WalEntry = serde_json::from_str(&line)
                    .map_err(|source| WalError::Corrupt { line: i + 1, source })?;
                write_seq = entry.seq;
                events.push(entry.event);
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok((Self { file, write_seq }, events))
    }

    /// Append a single event. Durable once this returns.
    pub fn append(&mut self, event: &Event) -> Result<u64, WalError> {
        self.append_batch(std::slice::from_ref(event))?;
        Ok(self.write_seq)
    }

    /// Append several events as one logical transaction: all lines are
    /// written in a single buffer and synced once, so a crash cannot leave
    /// the status flip without its cascade.
    pub fn append_batch(&mut self, events: &[Event]) -> Result<(), WalError> {
        if events.is_empty() {
            return Ok(());
        }
        let mut buf = Vec::new();
        for event in events {
            self.write_seq += 1;
            let entry = WalEntry { seq: self.write_seq, event: event.clone() };
            serde_json::to_writer(&mut buf, &entry).map_err(WalError::Encode)?;
            buf.push(b'\n');
        }
        self.file.write_all(&buf)?;
        self.file.sync_data()?;
        Ok(())
    }

    /// Sequence number of the most recently appended entry.
    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
