//! Property tests for ranking, scoring and rounding invariants

use chrono::NaiveDate;
use league_ranker::league::scoring::{borrowed_points, proportional_points};
use league_ranker::league::LeagueStandingEntry;
use league_ranker::players::{is_synthetic, synthetic_id};
use league_ranker::ranking::{CategoryRanking, RankingBuilder, RankingEntry};
use league_ranker::types::{Competition, Player, RoundMarker, RoundResult, Score, Track};
use league_ranker::utils::round_half_up;
use proptest::prelude::*;

/// A single three-hole round, one open result per `(total, disqualified)`
fn competition(players: &[(i32, bool)]) -> Competition {
    let mut competition = Competition::new(
        1,
        "Property Round",
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default(),
    );
    competition.tracks = (1..=3).map(|n| Track::new(n, 3)).collect();
    competition.results = players
        .iter()
        .enumerate()
        .map(|(index, (total, dqf))| {
            let mut result = RoundResult::new(Player::new(index as i64 + 1, "P"), "Open");
            result.scores = vec![
                Score::new(3, 0),
                Score::new(3, 0),
                Score::new(total - 6, total - 9),
            ];
            if *dqf {
                result.marker = Some(RoundMarker::Disqualified);
            }
            result
        })
        .collect();
    competition
}

fn open_ranking(sums: &[i32]) -> CategoryRanking {
    let mut sums = sums.to_vec();
    sums.sort_unstable();
    CategoryRanking {
        name: "OPEN".to_string(),
        entries: sums
            .iter()
            .enumerate()
            .map(|(index, sum)| scored_entry(index as i64 + 1, 1, *sum, 0))
            .collect(),
    }
}

fn scored_entry(player: i64, competition_id: u64, sum: i32, points: u32) -> RankingEntry {
    RankingEntry {
        player: Player::new(player, "P"),
        competition_id,
        category: "OPEN".to_string(),
        sum,
        diff: 0,
        playoff: 0,
        rounds: 1,
        dqf: false,
        dns: false,
        points,
        comment: None,
        selected: false,
        place: 1,
    }
}

proptest! {
    #[test]
    fn places_are_sports_places(players in prop::collection::vec((7..20i32, prop::bool::weighted(0.2)), 1..30)) {
        let rankings = RankingBuilder::default().build(&competition(&players));
        let open = rankings.get("OPEN").unwrap();
        prop_assert_eq!(open.len(), players.len());
        prop_assert_eq!(open.entries[0].place, 1);

        for pair in open.entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.place <= b.place);
            prop_assert!(!a.dqf || b.dqf, "disqualified entries come last");
            if a.tie_break() == b.tie_break() {
                prop_assert_eq!(a.place, b.place);
            } else {
                prop_assert!(a.sum <= b.sum || b.dqf);
            }
        }
    }

    #[test]
    fn ranking_is_deterministic(players in prop::collection::vec((7..20i32, any::<bool>()), 1..20)) {
        let competition = competition(&players);
        let builder = RankingBuilder::default();
        let first = serde_json::to_value(builder.build(&competition)).unwrap();
        let second = serde_json::to_value(builder.build(&competition)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn proportional_points_fall_with_place(field in 1usize..60, place in 1u32..60) {
        prop_assume!(place as usize <= field);
        let points = proportional_points(place, field).points;
        prop_assert!(points <= 100);
        if place == 1 {
            prop_assert_eq!(points, 100);
        }
        if (place as usize) < field {
            prop_assert!(proportional_points(place + 1, field).points <= points);
        }
    }

    #[test]
    fn borrowed_points_stay_in_range(sums in prop::collection::vec(40..80i32, 0..30), sum in 30..90i32) {
        let open = open_ranking(&sums);
        let points = borrowed_points(sum, &open).points;
        prop_assert!((1..=100).contains(&points));
        prop_assert!(borrowed_points(sum + 1, &open).points <= points);
    }

    #[test]
    fn best_results_never_exceed_all_results(points in prop::collection::vec(1u32..=100, 0..15), best_n in 1usize..10) {
        let mut entry = LeagueStandingEntry::new(Player::new(1, "P"), "OPEN");
        for (index, value) in points.iter().enumerate() {
            let id = index as u64 + 1;
            entry.results.insert(id, scored_entry(1, id, 50, *value));
        }

        let total = entry.select_best(best_n);
        prop_assert!(total <= points.iter().sum::<u32>());
        prop_assert_eq!(
            entry.results.values().filter(|r| r.selected).count(),
            best_n.min(points.len())
        );

        let mut sorted = points.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(total, sorted.iter().take(best_n).sum::<u32>());
    }

    #[test]
    fn half_up_rounding_is_within_half(value in 0.0..10_000.0f64) {
        let rounded = round_half_up(value) as f64;
        prop_assert!((rounded - value).abs() <= 0.5 + 1e-9);
    }

    #[test]
    fn synthetic_ids_ignore_spacing_and_case(name in "[A-Za-z]{1,12}( [A-Za-z]{1,12})?") {
        let id = synthetic_id(&name);
        prop_assert!(is_synthetic(id));
        let noisy = format!("  {}  ", name.to_lowercase().replace(' ', "   "));
        prop_assert_eq!(synthetic_id(&noisy), id);
    }
}
