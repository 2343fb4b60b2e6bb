//! Player Identity and Preferences
//!
//! Each seat in a conversation has a [`PlayerId`] and a private
//! [`PreferenceRanking`] over all subjects.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::subject::Subject;

/// Identity of a player seat, unique within one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player_{:03}", self.0)
    }
}

/// A private permutation of all `S` subjects, most preferred first.
///
/// Ranks are 1-based: the first subject in `order` has rank 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Subject>", try_from = "Vec<Subject>")]
pub struct PreferenceRanking {
    order: Vec<Subject>,
    /// `rank_of[s]` is the 1-based rank of subject `s`.
    rank_of: Vec<usize>,
}

/// Error raised when a subject order is not a permutation of `0..S`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("preference order is not a permutation of 0..{0}")]
pub struct InvalidRanking(pub usize);

impl PreferenceRanking {
    /// Builds a ranking from an explicit order. Returns `None` unless `order`
    /// is a permutation of `0..order.len()`.
    pub fn from_order(order: Vec<Subject>) -> Option<Self> {
        let mut rank_of = vec![0usize; order.len()];
        for (position, subject) in order.iter().enumerate() {
            let slot = rank_of.get_mut(subject.index())?;
            if *slot != 0 {
                return None;
            }
            *slot = position + 1;
        }
        Some(Self { order, rank_of })
    }

    /// Draws a uniformly random ranking over `subjects_count` subjects.
    pub fn generate<R: Rng + ?Sized>(subjects_count: usize, rng: &mut R) -> Self {
        let mut order: Vec<Subject> = (0..subjects_count as u32).map(Subject).collect();
        order.shuffle(rng);
        let mut rank_of = vec![0usize; subjects_count];
        for (position, subject) in order.iter().enumerate() {
            rank_of[subject.index()] = position + 1;
        }
        Self { order, rank_of }
    }

    /// Number of subjects ranked (S).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The 1-based rank of a subject, or `None` for a subject outside the universe.
    pub fn rank(&self, subject: Subject) -> Option<usize> {
        self.rank_of.get(subject.index()).copied()
    }

    /// Subjects ordered from most to least preferred.
    pub fn order(&self) -> &[Subject] {
        &self.order
    }

    /// The `count` most preferred subjects.
    pub fn top(&self, count: usize) -> &[Subject] {
        &self.order[..count.min(self.order.len())]
    }
}

impl From<PreferenceRanking> for Vec<Subject> {
    fn from(ranking: PreferenceRanking) -> Self {
        ranking.order
    }
}

impl TryFrom<Vec<Subject>> for PreferenceRanking {
    type Error = InvalidRanking;

    fn try_from(order: Vec<Subject>) -> Result<Self, Self::Error> {
        let len = order.len();
        Self::from_order(order).ok_or(InvalidRanking(len))
    }
}
