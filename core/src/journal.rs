use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use sim_types::{handler, Event, Handler};

/// The fixed, non-wildcard event-type set the journal subscribes to (spec
/// §4.11): every variant in the closed [`sim_types::EventKind`] set.
const JOURNALED_EVENT_TYPES: &[&str] = &[
    "system.run_started",
    "system.run_stopped",
    "system.engine_tick",
    "system.engine_error",
    "market.order_book_level",
    "market.best_bid_ask",
    "market.trade",
    "order.submitted",
    "order.cancel_requested",
    "order.accepted",
    "order.rejected",
    "order.canceled",
    "order.fill",
];

/// Append-only JSONL writer for `events.jsonl` (spec §4.11). One compact,
/// sorted-key JSON object per line; flushed and fsynced after every record
/// when `durable` is set, matching the sole synchronous blocking call spec
/// §5 permits inside the simulation loop.
pub struct EventJournal {
    file: File,
    durable: bool,
    records_written: u64,
}

impl std::fmt::Debug for EventJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventJournal")
            .field("records_written", &self.records_written)
            .field("durable", &self.durable)
            .finish()
    }
}

impl EventJournal {
    pub fn create(path: impl AsRef<Path>, durable: bool) -> std::io::Result<Rc<RefCell<Self>>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Rc::new(RefCell::new(Self {
            file,
            durable,
            records_written: 0,
        })))
    }

    pub fn subscriptions(this: &Rc<RefCell<Self>>) -> Vec<(&'static str, Handler)> {
        JOURNALED_EVENT_TYPES
            .iter()
            .map(|event_type| {
                let journal = Rc::clone(this);
                (*event_type, handler(move |event: &Event| journal.borrow_mut().on_event(event)))
            })
            .collect()
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Writes `event` as a single JSON line. Panics on I/O failure: a
    /// journal write failure is an engine-fatal condition (spec §7), and
    /// the bus never swallows a handler's fatal error.
    fn on_event(&mut self, event: &Event) {
        let line = serde_json::to_string(&event.to_journal_value())
            .expect("Event::to_journal_value always serializes");
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.write_all(b"\n"))
            .unwrap_or_else(|err| panic!("event journal write failed: {err}"));
        if self.durable {
            self.file
                .flush()
                .and_then(|_| self.file.sync_all())
                .unwrap_or_else(|err| panic!("event journal fsync failed: {err}"));
        }
        self.records_written += 1;
    }
}
