//! Per-strategy averages across many conversations.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use parley_model::{FinalReport, ScoreBreakdown};

/// Mean outcome of one strategy over every seat it played.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrategySummary {
    pub label: String,
    /// Seat-conversations averaged
    pub samples: usize,
    /// Mean `total / L`
    pub quality: f64,
    /// Mean `individual / L`
    pub individual: f64,
    /// Mean `shared / L`
    pub shared: f64,
    /// Mean `contributions / L * players`; 1.0 is an even share of turns
    pub involvement: f64,
    /// Mean contributed shared components per turn
    pub contributed: ScoreBreakdown,
}

/// Averages every player of every report by strategy label.
pub fn summarize(reports: &[FinalReport]) -> Vec<StrategySummary> {
    let mut by_label: BTreeMap<&str, StrategySummary> = BTreeMap::new();

    for report in reports {
        let length = report.length.max(1) as f64;
        let seats = report.players.len() as f64;
        for player in &report.players {
            let entry = by_label.entry(player.label.as_str()).or_insert_with(|| StrategySummary {
                label: player.label.clone(),
                ..StrategySummary::default()
            });
            entry.samples += 1;
            entry.quality += player.total / length;
            entry.individual += player.individual / length;
            entry.shared += player.shared / length;
            entry.involvement += player.contributions as f64 / length * seats;
            entry.contributed += player.contributed.per_turn(report.length);
        }
    }

    by_label
        .into_values()
        .map(|mut s| {
            let n = s.samples as f64;
            s.quality /= n;
            s.individual /= n;
            s.shared /= n;
            s.involvement /= n;
            s.contributed = ScoreBreakdown {
                importance: s.contributed.importance / n,
                coherence: s.contributed.coherence / n,
                freshness: s.contributed.freshness / n,
                nonmonotonousness: s.contributed.nonmonotonousness / n,
            };
            s
        })
        .collect()
}

/// Plain-text table of `summaries`, one row per strategy.
pub fn render_table(summaries: &[StrategySummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:>7} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "strategy", "samples", "quality", "indiv", "shared", "involv", "imp", "coh", "fresh", "nonmon"
    );
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<18} {:>7} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
            s.label,
            s.samples,
            s.quality,
            s.individual,
            s.shared,
            s.involvement,
            s.contributed.importance,
            s.contributed.coherence,
            s.contributed.freshness,
            s.contributed.nonmonotonousness,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_model::{ConversationLog, PlayerId, PlayerTotals};

    fn totals(id: u32, label: &str, contributions: usize, individual: f64, shared: f64) -> PlayerTotals {
        PlayerTotals {
            id: PlayerId(id),
            label: label.to_string(),
            contributions,
            individual,
            shared,
            total: shared + individual,
            quality: (shared + individual) / 10.0,
            contributed: ScoreBreakdown {
                importance: contributions as f64,
                ..ScoreBreakdown::default()
            },
        }
    }

    fn report(players: Vec<PlayerTotals>) -> FinalReport {
        FinalReport {
            seed: 1,
            length: 10,
            actual_length: 10,
            terminated_early: false,
            pauses: 0,
            log: ConversationLog::new(),
            shared: ScoreBreakdown::default(),
            players,
        }
    }

    #[test]
    fn test_summarize_groups_by_label() {
        let reports = vec![
            report(vec![totals(0, "random", 5, -1.0, 4.0), totals(1, "pause", 0, 0.0, 4.0)]),
            report(vec![totals(0, "random", 3, -3.0, 2.0), totals(1, "pause", 0, 0.0, 2.0)]),
        ];
        let summaries = summarize(&reports);

        assert_eq!(summaries.len(), 2);
        let random = summaries.iter().find(|s| s.label == "random").unwrap();
        assert_eq!(random.samples, 2);
        // ((4 - 1) / 10 + (2 - 3) / 10) / 2
        assert!((random.quality - 0.1).abs() < 1e-12);
        // (5 / 10 * 2 + 3 / 10 * 2) / 2
        assert!((random.involvement - 0.8).abs() < 1e-12);
        assert!((random.contributed.importance - 0.4).abs() < 1e-12);

        let pause = summaries.iter().find(|s| s.label == "pause").unwrap();
        assert_eq!(pause.involvement, 0.0);
    }

    #[test]
    fn test_render_table_has_row_per_strategy() {
        let reports = vec![report(vec![totals(0, "zipper", 2, 0.0, 1.0)])];
        let table = render_table(&summarize(&reports));
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("zipper"));
    }
}
