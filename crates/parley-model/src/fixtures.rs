//! Hand-built items and logs for tests.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // parley-model = { path = "../parley-model", features = ["test-fixtures"] }
//!
//! use parley_model::fixtures::{LogBuilder, single};
//!
//! let slots = LogBuilder::new()
//!     .say(0, single(1, 3, 0.4))
//!     .pause()
//!     .build();
//! ```

use crate::item::{Item, ItemId};
use crate::log::{ConversationLog, Slot};
use crate::player::{PlayerId, PreferenceRanking};
use crate::subject::{Subject, SubjectSet};

/// A single-subject item with identity `id`, owned by player 0.
pub fn single(id: u128, subject: u32, importance: f64) -> Item {
    Item::new(
        ItemId::from_u128(id),
        PlayerId(0),
        importance,
        SubjectSet::One(Subject(subject)),
    )
}

/// A two-subject item with identity `id`, owned by player 0.
///
/// Panics if `a == b`.
pub fn pair(id: u128, a: u32, b: u32, importance: f64) -> Item {
    let subjects = SubjectSet::pair(Subject(a), Subject(b))
        .unwrap_or_else(|e| panic!("bad fixture pair ({}, {}): {}", a, b, e));
    Item::new(ItemId::from_u128(id), PlayerId(0), importance, subjects)
}

/// Returns `item` re-owned by `owner`.
pub fn owned_by(item: Item, owner: u32) -> Item {
    Item {
        owner: PlayerId(owner),
        ..item
    }
}

/// Identity ranking over `subjects_count` subjects: subject `s` has rank `s + 1`.
pub fn identity_ranking(subjects_count: u32) -> PreferenceRanking {
    PreferenceRanking::from_order((0..subjects_count).map(Subject).collect())
        .unwrap_or_else(|| panic!("identity ranking over {} subjects", subjects_count))
}

/// Fluent builder for hand-written slot sequences.
#[derive(Debug, Default)]
pub struct LogBuilder {
    slots: Vec<Slot>,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a contribution by `speaker`.
    pub fn say(mut self, speaker: u32, item: Item) -> Self {
        self.slots.push(Slot::spoken(PlayerId(speaker), item));
        self
    }

    pub fn pause(mut self) -> Self {
        self.slots.push(Slot::Pause);
        self
    }

    pub fn pauses(mut self, count: usize) -> Self {
        self.slots.extend(std::iter::repeat(Slot::Pause).take(count));
        self
    }

    pub fn build(self) -> Vec<Slot> {
        self.slots
    }

    pub fn build_log(self) -> ConversationLog {
        ConversationLog::from_slots(self.slots)
    }
}
