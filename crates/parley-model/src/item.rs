//! Items and Memory Banks
//!
//! An [`Item`] is the unit a player contributes to the conversation. Items are
//! generated once at setup into each player's [`MemoryBank`] and never change.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{Builder, Uuid};

use crate::player::PlayerId;
use crate::subject::{Subject, SubjectSet};

/// Unique identity of an item.
///
/// Identities are built from bytes drawn from the conversation's seeded
/// generator, so they are reproducible from the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Draws a fresh identity from the given generator.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bytes: [u8; 16] = rng.gen();
        ItemId(Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Builds an identity from a plain number. Handy for hand-written logs.
    pub fn from_u128(value: u128) -> Self {
        ItemId(Uuid::from_u128(value))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable contributable unit: one or two subjects and an importance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Player whose memory bank holds this item
    pub owner: PlayerId,
    /// Importance in `[0, 1)`
    pub importance: f64,
    pub subjects: SubjectSet,
}

impl Item {
    pub fn new(id: ItemId, owner: PlayerId, importance: f64, subjects: SubjectSet) -> Self {
        Self {
            id,
            owner,
            importance,
            subjects,
        }
    }

    /// True if this is the same item (same identity).
    pub fn same_as(&self, other: &Item) -> bool {
        self.id == other.id
    }

    pub fn mentions(&self, subject: Subject) -> bool {
        self.subjects.contains(subject)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.subjects, self.importance)
    }
}

/// A player's private, fixed-size, ordered collection of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryBank {
    items: Vec<Item>,
}

impl MemoryBank {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Generates a memory bank of `size` items for `owner`.
    ///
    /// The first `size / 2` items carry two distinct subjects and the rest a
    /// single subject. With a universe of one subject every item is single-subject.
    /// Per item the generator is drawn for importance, then subjects, then identity.
    pub fn generate<R: Rng + ?Sized>(
        owner: PlayerId,
        subjects_count: usize,
        size: usize,
        rng: &mut R,
    ) -> Self {
        let items = (0..size)
            .map(|i| {
                let wanted = if i < size / 2 && subjects_count >= 2 { 2 } else { 1 };
                let importance: f64 = rng.gen();
                let picked = index::sample(rng, subjects_count, wanted);
                let subjects = match picked.len() {
                    2 => SubjectSet::Two(
                        Subject(picked.index(0) as u32),
                        Subject(picked.index(1) as u32),
                    ),
                    _ => SubjectSet::One(Subject(picked.index(0) as u32)),
                };
                let id = ItemId::generate(rng);
                Item::new(id, owner, importance, subjects)
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// True if the bank holds exactly this item (identity and content).
    pub fn holds(&self, item: &Item) -> bool {
        self.get(item.id).is_some_and(|own| own == item)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a MemoryBank {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
