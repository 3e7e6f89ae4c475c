//! Per-key ordering of responses
//!
//! Each request takes a ticket when it is issued. When its response lands it
//! is admitted only if no later ticket for the same key has been applied, so
//! an older response that arrives late cannot overwrite a newer one.

use std::collections::HashMap;
use std::hash::Hash;

/// Issued sequence number for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    seq: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
struct Slot {
    issued: u64,
    applied: u64,
    in_flight: usize,
}

#[derive(Debug)]
pub struct SequenceGuard<K> {
    slots: HashMap<K, Slot>,
}

impl<K> Default for SequenceGuard<K> {
    fn default() -> Self {
        Self { slots: HashMap::new() }
    }
}

impl<K: Eq + Hash + Clone> SequenceGuard<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, key: &K) -> Ticket<K> {
        let slot = self.slots.entry(key.clone()).or_default();
        slot.issued += 1;
        slot.in_flight += 1;
        Ticket {
            key: key.clone(),
            seq: slot.issued,
        }
    }

    /// Mark the request as finished. Returns `true` when `apply` is set and
    /// the response is newer than anything applied so far for its key.
    pub fn complete(&mut self, ticket: &Ticket<K>, apply: bool) -> bool {
        let slot = self.slots.entry(ticket.key.clone()).or_default();
        slot.in_flight = slot.in_flight.saturating_sub(1);
        if apply && ticket.seq > slot.applied {
            slot.applied = ticket.seq;
            true
        } else {
            false
        }
    }

    /// Whether no request for the key was issued after this one
    pub fn is_latest(&self, ticket: &Ticket<K>) -> bool {
        self.slots.get(&ticket.key).is_none_or(|slot| slot.issued == ticket.seq)
    }

    /// Whether a request for the key issued after this one has been applied
    pub fn is_superseded(&self, ticket: &Ticket<K>) -> bool {
        self.slots.get(&ticket.key).is_some_and(|slot| slot.applied > ticket.seq)
    }

    /// Forget keys with nothing in flight
    pub fn prune_settled(&mut self) {
        self.slots.retain(|_, slot| slot.in_flight > 0);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
