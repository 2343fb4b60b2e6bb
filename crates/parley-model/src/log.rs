//! Conversation Log
//!
//! The log is an ordered sequence of slots, one per resolved turn. A slot is
//! either a finalized contribution or a pause. Only the engine appends to it;
//! everything else reads it through `&ConversationLog` or `&[Slot]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::item::{Item, ItemId};
use crate::player::PlayerId;

/// One resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    /// Nobody proposed anything this turn
    Pause,
    /// The scheduler's winner and the item they finalized
    Spoken { speaker: PlayerId, item: Item },
}

impl Slot {
    pub fn spoken(speaker: PlayerId, item: Item) -> Self {
        Slot::Spoken { speaker, item }
    }

    pub fn is_pause(&self) -> bool {
        matches!(self, Slot::Pause)
    }

    pub fn item(&self) -> Option<&Item> {
        match self {
            Slot::Pause => None,
            Slot::Spoken { item, .. } => Some(item),
        }
    }

    pub fn speaker(&self) -> Option<PlayerId> {
        match self {
            Slot::Pause => None,
            Slot::Spoken { speaker, .. } => Some(*speaker),
        }
    }
}

/// The ordered record of every resolved turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog {
    slots: Vec<Slot>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    /// Appends a resolved turn.
    pub fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Speaker of the most recent non-pause slot, looking past any pauses.
    pub fn current_speaker(&self) -> Option<PlayerId> {
        current_speaker(&self.slots)
    }

    pub fn pause_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_pause()).count()
    }

    /// True if any slot already finalized this item identity.
    pub fn has_said(&self, id: ItemId) -> bool {
        self.items().any(|item| item.id == id)
    }

    /// Iterates finalized items in order, skipping pauses.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().filter_map(Slot::item)
    }
}

/// Speaker of the most recent non-pause slot in `slots`.
pub fn current_speaker(slots: &[Slot]) -> Option<PlayerId> {
    slots.iter().rev().find_map(Slot::speaker)
}

/// Number of non-pause slots won by each speaker in `slots`.
pub fn contributions(slots: &[Slot]) -> BTreeMap<PlayerId, usize> {
    let mut counts = BTreeMap::new();
    for speaker in slots.iter().filter_map(Slot::speaker) {
        *counts.entry(speaker).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{Subject, SubjectSet};

    fn item(n: u128, owner: u32) -> Item {
        Item::new(
            ItemId::from_u128(n),
            PlayerId(owner),
            0.5,
            SubjectSet::One(Subject(n as u32)),
        )
    }

    #[test]
    fn test_current_speaker_skips_pauses() {
        let mut log = ConversationLog::new();
        assert_eq!(log.current_speaker(), None);

        log.push(Slot::spoken(PlayerId(2), item(1, 2)));
        log.push(Slot::Pause);
        log.push(Slot::Pause);
        assert_eq!(log.current_speaker(), Some(PlayerId(2)));
        assert_eq!(log.pause_count(), 2);
    }

    #[test]
    fn test_contributions_and_has_said() {
        let log = ConversationLog::from_slots(vec![
            Slot::spoken(PlayerId(0), item(1, 0)),
            Slot::Pause,
            Slot::spoken(PlayerId(1), item(2, 1)),
            Slot::spoken(PlayerId(0), item(3, 0)),
        ]);

        let counts = contributions(log.slots());
        assert_eq!(counts.get(&PlayerId(0)), Some(&2));
        assert_eq!(counts.get(&PlayerId(1)), Some(&1));
        assert!(log.has_said(ItemId::from_u128(2)));
        assert!(!log.has_said(ItemId::from_u128(9)));
    }

    #[test]
    fn test_slot_json_shape() {
        let json = serde_json::to_string(&Slot::Pause).unwrap();
        assert_eq!(json, r#"{"kind":"pause"}"#);

        let spoken = Slot::spoken(PlayerId(3), item(4, 3));
        let json = serde_json::to_string(&spoken).unwrap();
        assert!(json.starts_with(r#"{"kind":"spoken","speaker":3"#));
        let back: Slot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spoken);
    }
}
