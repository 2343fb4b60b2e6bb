//! End-to-end conversation scenarios.

use parley_core::scoring::{individual_bonus, is_repeat, score_log};
use parley_core::{
    factory_fn, initialize, run, ConversationConfig, EngineError, Player, PlayerKind, RosterEntry,
    TurnOutcome, TurnView,
};
use parley_model::fixtures::{identity_ranking, single};
use parley_model::{Item, PlayerId, Slot};
use rand::RngCore;

/// Speaks its unsaid items for the first `turns` turns, then stays silent.
struct Scripted {
    turns: usize,
}

impl Player for Scripted {
    fn label(&self) -> &str {
        "scripted"
    }

    fn propose(&mut self, turn: &TurnView<'_>, _rng: &mut dyn RngCore) -> Option<Item> {
        if turn.log.len() < self.turns {
            turn.unsaid().next().copied()
        } else {
            None
        }
    }
}

fn roster(kinds: &[PlayerKind]) -> Vec<RosterEntry> {
    kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| RosterEntry::new(PlayerId(i as u32), *kind))
        .collect()
}

#[test]
fn test_reference_run() {
    let config = ConversationConfig {
        subjects: 20,
        memory_size: 10,
        length: 10,
        seed: 91,
    };
    let report = run(initialize(
        &config,
        roster(&[PlayerKind::Random, PlayerKind::Random, PlayerKind::Pause]),
    )
    .unwrap())
    .unwrap();

    assert!(report.actual_length <= 10);
    assert_eq!(report.log.len(), report.actual_length);
    assert_eq!(report.terminated_early, report.actual_length < 10);
    assert_eq!(report.players.len(), 3);

    // Random players always propose, so nobody ever pauses.
    assert_eq!(report.pauses, 0);
    assert_eq!(report.players[2].contributions, 0);
    let spoken: usize = report.players.iter().map(|p| p.contributions).sum();
    assert_eq!(spoken, report.actual_length);
}

#[test]
fn test_three_pauses_end_regardless_of_length() {
    let config = ConversationConfig {
        length: 50,
        ..ConversationConfig::default()
    };
    let roster = vec![RosterEntry::new(
        PlayerId(0),
        factory_fn(|_| Box::new(Scripted { turns: 2 }) as Box<dyn Player>),
    )];
    let mut conversation = initialize(&config, roster).unwrap();

    let mut outcomes = Vec::new();
    loop {
        let outcome = conversation.step().unwrap();
        if outcome == TurnOutcome::Finished {
            break;
        }
        outcomes.push(outcome);
    }

    assert_eq!(outcomes.len(), 5);
    assert!(matches!(outcomes[4], TurnOutcome::Paused { turn: 4, consecutive: 3 }));
    let report = conversation.into_report();
    assert_eq!(report.actual_length, 5);
    assert!(report.terminated_early);
    assert!(report.log.slots()[2..].iter().all(Slot::is_pause));
}

#[test]
fn test_running_totals_match_recomputation() {
    let config = ConversationConfig {
        subjects: 8,
        memory_size: 6,
        length: 40,
        seed: 17,
    };
    let mut conversation = initialize(
        &config,
        roster(&[PlayerKind::RandomPause, PlayerKind::Zipper, PlayerKind::SelfishGreedy]),
    )
    .unwrap();

    while conversation.step().unwrap() != TurnOutcome::Finished {
        let full = score_log(conversation.log().slots());
        let running = conversation.ledger().shared();
        assert!((running.total() - full.total()).abs() < 1e-9);
        assert_eq!(running.coherence, full.coherence);
        assert_eq!(running.freshness, full.freshness);
        assert_eq!(running.nonmonotonousness, full.nonmonotonousness);
    }
}

#[test]
fn test_individual_totals_match_bonuses() {
    let config = ConversationConfig {
        subjects: 10,
        memory_size: 5,
        length: 20,
        seed: 3,
    };
    let conversation = initialize(&config, roster(&[PlayerKind::Random, PlayerKind::Random])).unwrap();
    let rankings: Vec<_> = (0..2)
        .map(|i| conversation.ranking(PlayerId(i)).unwrap().clone())
        .collect();
    let report = run(conversation).unwrap();

    for (i, ranking) in rankings.iter().enumerate() {
        let expected: f64 = report
            .log
            .slots()
            .iter()
            .filter(|slot| slot.speaker() == Some(PlayerId(i as u32)))
            .filter_map(Slot::item)
            .map(|item| individual_bonus(item, ranking))
            .sum();
        let totals = report.player(PlayerId(i as u32)).unwrap();
        assert!((totals.individual - expected).abs() < 1e-9);
        assert!(totals.individual <= 0.0);
    }
}

#[test]
fn test_scheduler_fairness_stays_bounded() {
    let seeds = 100;
    let mut spread_sum = 0usize;

    for seed in 0..seeds {
        let config = ConversationConfig {
            subjects: 20,
            memory_size: 10,
            length: 400,
            seed,
        };
        let mut conversation = initialize(&config, roster(&[PlayerKind::Random; 4])).unwrap();
        while conversation.step().unwrap() != TurnOutcome::Finished {}
        assert_eq!(conversation.counters().total(), 400);
        spread_sum += conversation.counters().spread();
    }

    let mean_spread = spread_sum as f64 / seeds as f64;
    assert!(mean_spread < 8.0, "mean spread {} too large", mean_spread);
}

#[test]
fn test_every_kind_plays_without_repeating_planned_items() {
    let config = ConversationConfig {
        subjects: 20,
        memory_size: 8,
        length: 24,
        seed: 23,
    };
    let report = run(initialize(&config, roster(&PlayerKind::ALL)).unwrap()).unwrap();
    assert!(report.actual_length <= 24);

    // Only the random strategies may offer an item that was already said.
    let may_repeat = [PlayerKind::Random, PlayerKind::RandomPause];
    let slots = report.log.slots();
    for (i, slot) in slots.iter().enumerate() {
        let Some(speaker) = slot.speaker() else {
            continue;
        };
        let kind = PlayerKind::ALL[speaker.0 as usize];
        if !may_repeat.contains(&kind) {
            assert!(!is_repeat(slots, i), "{} repeated an item at slot {}", kind, i);
        }
    }
}

#[test]
fn test_items_come_from_speaker_memory() {
    let config = ConversationConfig {
        subjects: 15,
        memory_size: 8,
        length: 30,
        seed: 44,
    };
    let conversation = initialize(
        &config,
        roster(&[PlayerKind::Zipper, PlayerKind::BstLow, PlayerKind::RandomPause]),
    )
    .unwrap();
    let banks: Vec<_> = (0..3)
        .map(|i| conversation.memory(PlayerId(i)).unwrap().clone())
        .collect();
    let report = run(conversation).unwrap();

    for slot in report.log.slots() {
        if let Slot::Spoken { speaker, item } = slot {
            assert_eq!(item.owner, *speaker);
            assert!(banks[speaker.0 as usize].holds(item));
        }
    }
}

#[test]
fn test_contract_violation_names_player() {
    let roster = vec![
        RosterEntry::new(PlayerId(0), PlayerKind::Pause),
        RosterEntry::new(
            PlayerId(7),
            factory_fn(|_| Box::new(Impostor) as Box<dyn Player>),
        ),
    ];
    let err = run(initialize(&ConversationConfig::default(), roster).unwrap()).unwrap_err();

    match err {
        EngineError::PlayerContractViolation { player, .. } => assert_eq!(player, PlayerId(7)),
        other => panic!("unexpected error {:?}", other),
    }
}

/// Offers an item that is not in its memory.
struct Impostor;

impl Player for Impostor {
    fn label(&self) -> &str {
        "impostor"
    }

    fn propose(&mut self, turn: &TurnView<'_>, _rng: &mut dyn RngCore) -> Option<Item> {
        Some(Item {
            owner: turn.me,
            ..single(999, 0, 0.5)
        })
    }
}

#[test]
fn test_rank_bonus_extremes() {
    let subjects = 20;
    let ranking = identity_ranking(subjects);

    let favourite = single(1, 0, 0.5);
    let least = single(2, subjects - 1, 0.5);

    assert_eq!(individual_bonus(&favourite, &ranking), 0.0);
    let expected = (1.0 - subjects as f64) / subjects as f64;
    assert!((individual_bonus(&least, &ranking) - expected).abs() < 1e-12);
}
