//! Subject Types
//!
//! Subjects are opaque topic identifiers drawn from a fixed universe `0..S`.
//! Every item talks about one subject or two distinct subjects.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A topic identifier from the fixed universe `0..S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(pub u32);

impl Subject {
    /// Returns the subject as a zero-based index into `0..S`.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks whether the subject lies inside a universe of `subjects_count` subjects.
    pub fn in_universe(self, subjects_count: usize) -> bool {
        self.index() < subjects_count
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl From<u32> for Subject {
    fn from(value: u32) -> Self {
        Subject(value)
    }
}

/// Error raised when a list of subjects cannot form a [`SubjectSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectSetError {
    #[error("an item needs at least one subject")]
    Empty,
    #[error("an item carries at most two subjects, got {0}")]
    TooMany(usize),
    #[error("subject {0} appears twice")]
    Duplicate(Subject),
}

/// The ordered set of one or two distinct subjects an item talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Subject>", try_from = "Vec<Subject>")]
pub enum SubjectSet {
    One(Subject),
    Two(Subject, Subject),
}

impl SubjectSet {
    /// Builds a two-subject set, rejecting a repeated subject.
    pub fn pair(first: Subject, second: Subject) -> Result<Self, SubjectSetError> {
        if first == second {
            return Err(SubjectSetError::Duplicate(first));
        }
        Ok(SubjectSet::Two(first, second))
    }

    /// Number of subjects (1 or 2).
    pub fn len(&self) -> usize {
        match self {
            SubjectSet::One(_) => 1,
            SubjectSet::Two(_, _) => 2,
        }
    }

    /// A subject set is never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The first subject in order.
    pub fn first(&self) -> Subject {
        match *self {
            SubjectSet::One(s) | SubjectSet::Two(s, _) => s,
        }
    }

    /// Iterates the subjects in order.
    pub fn iter(&self) -> impl Iterator<Item = Subject> {
        let (a, b) = match *self {
            SubjectSet::One(s) => (s, None),
            SubjectSet::Two(s, t) => (s, Some(t)),
        };
        std::iter::once(a).chain(b)
    }

    pub fn contains(&self, subject: Subject) -> bool {
        self.iter().any(|s| s == subject)
    }

    /// Returns the first subject outside `0..subjects_count`, if any.
    pub fn out_of_range(&self, subjects_count: usize) -> Option<Subject> {
        self.iter().find(|s| !s.in_universe(subjects_count))
    }
}

impl From<SubjectSet> for Vec<Subject> {
    fn from(set: SubjectSet) -> Self {
        set.iter().collect()
    }
}

impl TryFrom<Vec<Subject>> for SubjectSet {
    type Error = SubjectSetError;

    fn try_from(subjects: Vec<Subject>) -> Result<Self, Self::Error> {
        match subjects.as_slice() {
            [] => Err(SubjectSetError::Empty),
            [s] => Ok(SubjectSet::One(*s)),
            [s, t] => SubjectSet::pair(*s, *t),
            more => Err(SubjectSetError::TooMany(more.len())),
        }
    }
}

impl fmt::Display for SubjectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectSet::One(s) => write!(f, "{{{}}}", s),
            SubjectSet::Two(s, t) => write!(f, "{{{}, {}}}", s, t),
        }
    }
}
