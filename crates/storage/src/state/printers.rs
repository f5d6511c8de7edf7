// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Printer event handlers.

use scribe_core::Event;

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::PrinterRegistered { printer } => {
            if !state.printers.contains_key(printer.id.as_str()) {
                state.printers.insert(printer.id.as_str().to_string(), printer.clone());
            }
        }

        Event::PrinterSeen { id, at_ms } => {
            if let Some(printer) = state.printers.get_mut(id.as_str()) {
                printer.mark_seen(*at_ms);
            }
        }

        _ => {}
    }
}
