//! Conversation Engine
//!
//! Owns the log, the contribution counters, the score ledger and the one
//! seeded generator of a conversation. Each [`ConversationRun::step`] runs a
//! single turn: collect proposals in roster order, validate them, resolve a
//! winner (or a pause) and fold the new slot into the running scores.
//!
//! The run ends when the log reaches the configured length or after
//! [`MAX_CONSECUTIVE_PAUSES`] pauses in a row.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use parley_model::{
    ConversationLog, FinalReport, Item, MemoryBank, PlayerId, PlayerTotals, PreferenceRanking,
    Slot, SubjectSet, SubjectSetError,
};

use crate::error::{ConfigurationError, ContractBreach, EngineError};
use crate::players::{GameContext, Player, PlayerSetup, RosterEntry, TurnView};
use crate::scheduler::{resolve, ContributionCounters, Proposal};
use crate::scoring::{contributed_by_speaker, individual_bonus, ScoreLedger};

/// Consecutive pauses that end a conversation.
pub const MAX_CONSECUTIVE_PAUSES: usize = 3;

/// Size and seed of one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Subject universe size S
    pub subjects: usize,
    /// Items per memory bank B
    pub memory_size: usize,
    /// Maximum number of slots L
    pub length: usize,
    pub seed: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            subjects: 20,
            memory_size: 10,
            length: 10,
            seed: 91,
        }
    }
}

impl ConversationConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.subjects == 0 {
            return Err(ConfigurationError::NoSubjects);
        }
        if self.memory_size == 0 {
            return Err(ConfigurationError::NoMemory);
        }
        if self.length == 0 {
            return Err(ConfigurationError::ZeroLength);
        }
        Ok(())
    }
}

/// What one call to [`ConversationRun::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnOutcome {
    /// `speaker` won turn `turn` with `item`.
    Spoken {
        turn: usize,
        speaker: PlayerId,
        item: Item,
    },
    /// Nobody proposed on turn `turn`; `consecutive` pauses in a row so far.
    Paused { turn: usize, consecutive: usize },
    /// The conversation is over; no slot was appended.
    Finished,
}

struct Seat {
    id: PlayerId,
    memory: MemoryBank,
    ranking: PreferenceRanking,
    player: Box<dyn Player>,
}

/// A conversation in progress.
pub struct ConversationRun {
    config: ConversationConfig,
    context: GameContext,
    seats: Vec<Seat>,
    log: ConversationLog,
    counters: ContributionCounters,
    ledger: ScoreLedger,
    consecutive_pauses: usize,
    finished: bool,
    rng: SmallRng,
}

/// Validates the configuration, then deals every seat a ranking and a memory
/// bank (in roster order) and builds its player.
pub fn initialize(
    config: &ConversationConfig,
    roster: Vec<RosterEntry>,
) -> Result<ConversationRun, ConfigurationError> {
    config.validate()?;
    if roster.is_empty() {
        return Err(ConfigurationError::EmptyRoster);
    }
    let mut seen = BTreeSet::new();
    for entry in &roster {
        if !seen.insert(entry.id) {
            return Err(ConfigurationError::DuplicatePlayer(entry.id));
        }
    }

    let context = GameContext {
        players: roster.len(),
        length: config.length,
        subjects: config.subjects,
    };
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let mut seats = Vec::with_capacity(roster.len());
    for entry in roster {
        let ranking = PreferenceRanking::generate(config.subjects, &mut rng);
        let memory = MemoryBank::generate(entry.id, config.subjects, config.memory_size, &mut rng);
        let player = entry.factory.build(&PlayerSetup {
            id: entry.id,
            context,
            memory: &memory,
            ranking: &ranking,
        })?;
        seats.push(Seat {
            id: entry.id,
            memory,
            ranking,
            player,
        });
    }

    info!(
        players = seats.len(),
        subjects = config.subjects,
        memory_size = config.memory_size,
        length = config.length,
        seed = config.seed,
        "conversation initialized"
    );

    Ok(ConversationRun {
        config: *config,
        context,
        counters: ContributionCounters::new(seats.iter().map(|s| s.id)),
        seats,
        log: ConversationLog::new(),
        ledger: ScoreLedger::new(),
        consecutive_pauses: 0,
        finished: false,
        rng,
    })
}

/// Steps `run` to completion and returns its report.
pub fn run(mut run: ConversationRun) -> Result<FinalReport, EngineError> {
    while run.step()? != TurnOutcome::Finished {}
    Ok(run.into_report())
}

impl ConversationRun {
    /// Runs one turn.
    pub fn step(&mut self) -> Result<TurnOutcome, EngineError> {
        if self.finished {
            return Ok(TurnOutcome::Finished);
        }
        let turn = self.log.len();

        let mut proposals = Vec::new();
        for seat in self.seats.iter_mut() {
            let view = TurnView {
                me: seat.id,
                log: &self.log,
                memory: &seat.memory,
                ranking: &seat.ranking,
                context: self.context,
            };
            let Some(item) = seat.player.propose(&view, &mut self.rng) else {
                continue;
            };
            if let Err(breach) = check_proposal(seat, &item, self.config.subjects) {
                warn!(player = %seat.id, %breach, turn, "player contract violation");
                self.finished = true;
                return Err(EngineError::PlayerContractViolation {
                    player: seat.id,
                    breach,
                });
            }
            proposals.push(Proposal {
                player: seat.id,
                item,
            });
        }

        let winner = resolve(
            &proposals,
            self.log.current_speaker(),
            &self.counters,
            &mut self.rng,
        );

        let outcome = match winner.and_then(|i| proposals.get(i)) {
            Some(&Proposal { player, item }) => {
                let bonus = self
                    .seats
                    .iter()
                    .find(|s| s.id == player)
                    .map(|s| individual_bonus(&item, &s.ranking))
                    .unwrap_or(0.0);
                self.log.push(Slot::spoken(player, item));
                self.counters.increment(player);
                let delta = self.ledger.record(self.log.slots(), bonus);
                self.consecutive_pauses = 0;
                debug!(
                    turn,
                    proposers = proposals.len(),
                    speaker = %player,
                    item = %item,
                    shared_delta = delta.total(),
                    "turn resolved"
                );
                TurnOutcome::Spoken {
                    turn,
                    speaker: player,
                    item,
                }
            }
            None => {
                self.log.push(Slot::Pause);
                self.ledger.record(self.log.slots(), 0.0);
                self.consecutive_pauses += 1;
                debug!(turn, consecutive = self.consecutive_pauses, "pause");
                TurnOutcome::Paused {
                    turn,
                    consecutive: self.consecutive_pauses,
                }
            }
        };

        if self.consecutive_pauses >= MAX_CONSECUTIVE_PAUSES || self.log.len() >= self.config.length {
            self.finished = true;
            info!(
                slots = self.log.len(),
                pauses = self.log.pause_count(),
                shared = self.ledger.shared().total(),
                "conversation finished"
            );
        }
        Ok(outcome)
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn counters(&self) -> &ContributionCounters {
        &self.counters
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// Seat ids in roster order.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.seats.iter().map(|s| s.id)
    }

    pub fn memory(&self, player: PlayerId) -> Option<&MemoryBank> {
        self.seat(player).map(|s| &s.memory)
    }

    pub fn ranking(&self, player: PlayerId) -> Option<&PreferenceRanking> {
        self.seat(player).map(|s| &s.ranking)
    }

    fn seat(&self, player: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == player)
    }

    /// Builds the final report from the current state.
    pub fn into_report(self) -> FinalReport {
        let slots = self.log.slots();
        let shared = self.ledger.shared();
        let contributed = contributed_by_speaker(slots);
        let length = self.config.length;

        let players = self
            .seats
            .iter()
            .map(|seat| {
                let individual = self.ledger.individual(seat.id);
                let total = shared.total() + individual;
                PlayerTotals {
                    id: seat.id,
                    label: seat.player.label().to_string(),
                    contributions: self.counters.get(seat.id),
                    individual,
                    shared: shared.total(),
                    total,
                    quality: total / length as f64,
                    contributed: contributed.get(&seat.id).copied().unwrap_or_default(),
                }
            })
            .collect();

        FinalReport {
            seed: self.config.seed,
            length,
            actual_length: self.log.len(),
            terminated_early: self.log.len() < length,
            pauses: self.log.pause_count(),
            shared,
            players,
            log: self.log,
        }
    }
}

fn check_proposal(seat: &Seat, item: &Item, subjects: usize) -> Result<(), ContractBreach> {
    if item.owner != seat.id {
        return Err(ContractBreach::NotOwner {
            item: item.id,
            owner: item.owner,
        });
    }
    if let SubjectSet::Two(a, b) = item.subjects {
        if a == b {
            return Err(SubjectSetError::Duplicate(a).into());
        }
    }
    if let Some(subject) = item.subjects.out_of_range(subjects) {
        return Err(ContractBreach::SubjectOutOfRange { subject, subjects });
    }
    if !seat.memory.holds(item) {
        return Err(ContractBreach::NotInMemory(item.id));
    }
    Ok(())
}
