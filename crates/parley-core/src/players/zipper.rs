//! Zipper strategy
//!
//! Opens on a favourite subject after a pause, then keeps answering the
//! subject that was raised two slots back, so two zipper players interleave
//! on the same thread.

use rand::RngCore;
use std::collections::BTreeMap;

use parley_model::{Item, MemoryBank, PreferenceRanking, Slot, Subject};

use super::{Player, TurnView};

/// Items at or below this importance are never offered.
pub const ZIPPER_MIN_IMPORTANCE: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct ZipperPlayer {
    /// Indexed single-subject items by subject, most important first
    blocks: BTreeMap<Subject, Vec<Item>>,
    /// Indexed items whose subject is in the top half of the ranking
    starters: Vec<Item>,
}

impl ZipperPlayer {
    pub fn new(memory: &MemoryBank, ranking: &PreferenceRanking) -> Self {
        let favourites = ranking.top(ranking.len() / 2);

        let mut blocks: BTreeMap<Subject, Vec<Item>> = BTreeMap::new();
        let mut starters = Vec::new();
        for item in memory {
            if item.subjects.len() != 1 || item.importance <= ZIPPER_MIN_IMPORTANCE {
                continue;
            }
            let subject = item.subjects.first();
            blocks.entry(subject).or_default().push(*item);
            if favourites.contains(&subject) {
                starters.push(*item);
            }
        }

        for block in blocks.values_mut() {
            sort_by_importance(block);
        }
        sort_by_importance(&mut starters);

        Self { blocks, starters }
    }
}

fn sort_by_importance(items: &mut [Item]) {
    items.sort_by(|a, b| b.importance.total_cmp(&a.importance).then(a.id.cmp(&b.id)));
}

impl Player for ZipperPlayer {
    fn label(&self) -> &str {
        "zipper"
    }

    fn propose(&mut self, turn: &TurnView<'_>, _rng: &mut dyn RngCore) -> Option<Item> {
        let slots = turn.slots();
        let unsaid = |items: &[Item]| items.iter().find(|i| !turn.log.has_said(i.id)).copied();

        let (second_last, last) = match slots {
            [.., a, b] => (a, b),
            _ => return unsaid(self.starters.as_slice()),
        };
        match (second_last, last) {
            (Slot::Spoken { item, .. }, Slot::Spoken { .. }) => {
                let block = self.blocks.get(&item.subjects.first())?;
                unsaid(block.as_slice())
            }
            _ => unsaid(self.starters.as_slice()),
        }
    }
}
