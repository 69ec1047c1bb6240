use crate::account::AccountId;
use serde::{Deserialize, Serialize};

/// Position of an event in the log; the first event is 0.
pub type EventSeq = u64;

/// Committed state transition. Mint has no source account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Mint {
        to: AccountId,
        amount: u64,
    },
    Burn {
        from: AccountId,
        amount: u64,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: u64,
    },
    AdminChanged {
        previous: Option<AccountId>,
        new: Option<AccountId>,
    },
}

impl EventKind {
    /// Stable lowercase label, used for logs and metric labels.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Mint { .. } => "mint",
            EventKind::Burn { .. } => "burn",
            EventKind::Transfer { .. } => "transfer",
            EventKind::AdminChanged { .. } => "admin_changed",
        }
    }

    /// Token amount moved, if the event moves any.
    pub fn amount(&self) -> Option<u64> {
        match self {
            EventKind::Mint { amount, .. }
            | EventKind::Burn { amount, .. }
            | EventKind::Transfer { amount, .. } => Some(*amount),
            EventKind::AdminChanged { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub seq: EventSeq,
    /// Logical time supplied by the host (block height, slot, ...).
    pub height: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Append-only event record. Sequence numbers are gap-free and follow
/// commit order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, height: u64, kind: EventKind) -> EventSeq {
        let seq = self.next_seq();
        self.events.push(Event { seq, height, kind });
        seq
    }

    /// Events from `from_seq` onwards, in order. Each call starts a fresh
    /// pass over the stored events.
    pub fn iterate(&self, from_seq: EventSeq) -> Events<'_> {
        let start = usize::try_from(from_seq)
            .unwrap_or(usize::MAX)
            .min(self.events.len());
        Events {
            inner: self.events[start..].iter(),
        }
    }

    pub fn get(&self, seq: EventSeq) -> Option<&Event> {
        usize::try_from(seq).ok().and_then(|i| self.events.get(i))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn next_seq(&self) -> EventSeq {
        self.events.len() as EventSeq
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }
}

/// Lazy view over a slice of the log.
#[derive(Clone, Debug)]
pub struct Events<'a> {
    inner: std::slice::Iter<'a, Event>,
}

impl<'a> Iterator for Events<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Events<'_> {}
