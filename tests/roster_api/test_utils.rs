//! Shared helpers for the roster API suite

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rosterdb::{Roster, SubscriptionId};
use tempfile::TempDir;

/// Roster in a fresh temp directory; keep the `TempDir` alive
pub fn on_disk() -> (Roster, TempDir) {
    let temp = TempDir::new().unwrap();
    let roster = Roster::open(temp.path()).unwrap();
    (roster, temp)
}

/// Counter bumped on every change signal of `roster`
pub fn change_counter(roster: &Roster) -> (Arc<AtomicUsize>, SubscriptionId) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let id = roster.subscribe(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (count, id)
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
