//! Change events and observers for editing sessions.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::property::PropertyField;

/// Table-level fields an editor can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableField {
    ActionName,
    Description,
}

impl fmt::Display for TableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActionName => write!(f, "ActionName"),
            Self::Description => write!(f, "Description"),
        }
    }
}

/// A mutation applied through an [`EditSession`](super::EditSession).
///
/// Events are only emitted for mutations that changed something.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    TableFieldChanged {
        field: TableField,
        value: String,
    },
    PropertyFieldChanged {
        index: usize,
        field: PropertyField,
        value: String,
    },
    PropertyAdded {
        index: usize,
        name: String,
    },
    PropertyRemoved {
        index: usize,
        name: String,
    },
    SelectionChanged {
        size: usize,
    },
    RefsChanged,
    Saved {
        fingerprint: String,
    },
}

/// Receives change events synchronously, in mutation order.
pub trait ChangeObserver {
    /// Called once per effective mutation.
    fn on_change(&self, event: &ChangeEvent);
}

impl<F> ChangeObserver for F
where
    F: Fn(&ChangeEvent),
{
    fn on_change(&self, event: &ChangeEvent) {
        self(event);
    }
}

/// Forwards events into a bounded or unbounded channel.
///
/// Sending never blocks: when the channel is full the event is dropped and
/// counted. A disconnected receiver is reported once.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<ChangeEvent>,
    dropped: AtomicU64,
    disconnected: AtomicBool,
}

impl ChannelObserver {
    #[must_use]
    pub fn new(tx: Sender<ChangeEvent>) -> Self {
        Self {
            tx,
            dropped: AtomicU64::new(0),
            disconnected: AtomicBool::new(false),
        }
    }

    /// Number of events dropped because the channel was full or closed.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ChangeObserver for ChannelObserver {
    fn on_change(&self, event: &ChangeEvent) {
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                if !self.disconnected.swap(true, Ordering::AcqRel) {
                    tracing::warn!("change observer channel disconnected; dropping events");
                }
            }
        }
    }
}
