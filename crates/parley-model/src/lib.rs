//! Shared data types for the conversation simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod item;
pub mod log;
pub mod player;
pub mod report;
pub mod subject;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use item::{Item, ItemId, MemoryBank};
pub use log::{contributions, current_speaker, ConversationLog, Slot};
pub use player::{InvalidRanking, PlayerId, PreferenceRanking};
pub use report::{FinalReport, PlayerTotals, ScoreBreakdown};
pub use subject::{Subject, SubjectSet, SubjectSetError};
