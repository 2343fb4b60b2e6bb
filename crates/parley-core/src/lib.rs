//! Turn-based multi-agent conversation simulator.
//!
//! A conversation is a sequence of slots. Every turn each player may propose
//! one item from its private memory; the scheduler picks one winner or
//! records a pause. The log is scored for the group (importance, coherence,
//! freshness, nonmonotonousness) and per player (preference bonus).
//!
//! ```no_run
//! use parley_core::{initialize, run, ConversationConfig, PlayerKind, RosterEntry};
//! use parley_model::PlayerId;
//!
//! let roster = vec![
//!     RosterEntry::new(PlayerId(0), PlayerKind::Random),
//!     RosterEntry::new(PlayerId(1), PlayerKind::BstLow),
//! ];
//! let conversation = initialize(&ConversationConfig::default(), roster)?;
//! let report = run(conversation)?;
//! println!("{}", report.to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod planner;
pub mod players;
pub mod scheduler;
pub mod scoring;
pub mod summary;

pub use config::{default_config_toml, ConfigError, SimConfig};
pub use engine::{initialize, run, ConversationConfig, ConversationRun, TurnOutcome};
pub use error::{ConfigurationError, ContractBreach, EngineError};
pub use planner::{PlanOutcome, Planner, PlannerConfig};
pub use players::{
    factory_fn, GameContext, Player, PlayerFactory, PlayerKind, PlayerSetup, RosterEntry, TurnView,
};
pub use scheduler::ContributionCounters;
pub use summary::{summarize, StrategySummary};
