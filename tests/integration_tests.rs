//! Integration tests for the league ranker
//!
//! These tests drive whole league runs through the public API:
//! - Multi-round competitions and season aggregation
//! - Identity resolution across competitions
//! - Round rating with trusted propagators
//! - Warning collection and hole overrides
//! - Configuration and file-backed providers

mod fixtures;

use league_ranker::config::{AppConfig, HoleOverride, LeagueConfig};
use league_ranker::league::ScoringMode;
use league_ranker::normalize::RawCompetition;
use league_ranker::{
    CompetitionProvider, InMemoryRatingStore, JsonDirectoryProvider, LeagueError, LeagueRunner,
    RoundRatingEstimator, StaticCompetitionProvider, WarningKind,
};
use std::sync::Arc;

use fixtures::{holes_for_total, rating_line_round, round, CompetitionBuilder};

fn runner_for(competitions: Vec<RawCompetition>, league: LeagueConfig) -> LeagueRunner {
    let provider = StaticCompetitionProvider::with_competitions(competitions);
    LeagueRunner::new(league, Arc::new(provider))
}

fn season() -> Vec<RawCompetition> {
    let single = CompetitionBuilder::new(10, 9)
        .player(1, "Anna", "Open", 27)
        .player(2, "Bartek", "Open", 29)
        .player(3, "Cezary", "Open", 31)
        .player(4, "Dawid", "Open", 26)
        .player(5, "Ewa", "Women", 30)
        .build();

    let first_round = CompetitionBuilder::new(111, 9)
        .player(1, "Anna", "Open", 27)
        .player(2, "Bartek", "Open", 27)
        .player(3, "Cezary", "Open", 30)
        .player(4, "Dawid", "Open", 28)
        .build();
    let second_round = CompetitionBuilder::new(112, 9)
        .player(1, "Anna", "Open", 28)
        .player(2, "Bartek", "Open", 27)
        .player(3, "Cezary", "Open", 29)
        .build();
    let two_rounds = CompetitionBuilder::new(11, 0)
        .named("Spring Open")
        .sub_round(first_round)
        .sub_round(second_round)
        .build();

    vec![single, two_rounds]
}

#[test]
fn test_complete_season() {
    let league = LeagueConfig::new("Spring League", vec![10, 11]);
    let report = runner_for(season(), league).run().unwrap();

    assert_eq!(report.title, "Spring League");
    assert_eq!(report.competitions.len(), 2);
    assert!(report.competitions[1].is_multi_round());

    // Dawid skipped the second round of competition 11
    let multi = &report.rankings[1];
    let open = multi.get("OPEN").unwrap();
    let dawid = open.entries.iter().find(|e| e.player.id == 4).unwrap();
    assert!(dawid.dqf);
    assert_eq!(dawid.place, 4);
    let leader = &open.entries[0];
    assert_eq!((leader.player.id, leader.sum, leader.rounds), (2, 54, 2));

    // Recognized categories are listed first, even when empty
    let names: Vec<&str> = report
        .standings
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["OPEN", "WOMEN", "MASTERS", "JUNIOR"]);

    let open = report.standings_for("OPEN").unwrap();
    let table: Vec<(i64, u32, u32)> = open
        .entries
        .iter()
        .map(|e| (e.player.id, e.total, e.place))
        .collect();
    assert_eq!(table, vec![(1, 150, 1), (2, 150, 1), (4, 101, 3), (3, 75, 4)]);

    let women = report.standings_for("WOMEN").unwrap();
    assert_eq!(women.entries.len(), 1);
    assert_eq!(women.entries[0].total, 40);
    assert!(report.standings_for("JUNIOR").unwrap().entries.is_empty());

    assert!(report.warnings.is_empty());
}

#[test]
fn test_runs_are_idempotent() {
    let league = LeagueConfig::new("Spring League", vec![10, 11]);
    let mut runner = runner_for(season(), league);

    let first = serde_json::to_value(runner.run().unwrap()).unwrap();
    let second = serde_json::to_value(runner.run().unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_identity_merged_across_competitions() {
    let first = CompetitionBuilder::new(20, 9)
        .result(round(None, "Jan Nowak", "Open", &holes_for_total(27, 9)))
        .player(1, "Anna", "Open", 28)
        .player(2, "Bartek", "Open", 29)
        .build();
    let second = CompetitionBuilder::new(21, 9)
        .result(round(Some(77), " jan  nowak ", "Open", &holes_for_total(26, 9)))
        .player(1, "Anna", "Open", 28)
        .player(2, "Bartek", "Open", 29)
        .build();

    let league = LeagueConfig::new("Merge League", vec![20, 21]);
    let report = runner_for(vec![first, second], league).run().unwrap();

    let open = report.standings_for("OPEN").unwrap();
    assert_eq!(open.entries.len(), 3);
    assert!(open.entries.iter().all(|e| e.player.id > 0));

    let jan = &open.entries[0];
    assert_eq!(jan.player.id, 77);
    assert_eq!(jan.competitions_played(), 2);
    assert_eq!(jan.total, 200);
}

#[test]
fn test_name_only_result_after_real_id_joins_same_player() {
    let first = CompetitionBuilder::new(22, 9)
        .player(88, "Marta Wisniewska", "Open", 27)
        .player(1, "Anna", "Open", 28)
        .player(2, "Bartek", "Open", 29)
        .build();
    let second = CompetitionBuilder::new(23, 9)
        .result(round(None, "MARTA WISNIEWSKA", "Open", &holes_for_total(26, 9)))
        .player(1, "Anna", "Open", 28)
        .player(2, "Bartek", "Open", 29)
        .build();

    let league = LeagueConfig::new("Merge League", vec![22, 23]);
    let report = runner_for(vec![first, second], league).run().unwrap();

    let open = report.standings_for("OPEN").unwrap();
    assert_eq!(open.entries.len(), 3);
    let marta: Vec<_> = open
        .entries
        .iter()
        .filter(|e| e.player.name.eq_ignore_ascii_case("Marta Wisniewska"))
        .collect();
    assert_eq!(marta.len(), 1);
    assert_eq!(marta[0].player.id, 88);
    assert_eq!(marta[0].competitions_played(), 2);
    assert_eq!(marta[0].total, 200);
}

#[test]
fn test_round_rating_from_trusted_players() {
    let mut rated = rating_line_round(30, &[(1, 900), (2, 950), (3, 1000), (4, 1050)]);
    rated
        .results
        .push(round(Some(99), "Newcomer", "Open", &holes_for_total(57, 18)));

    let unrated = CompetitionBuilder::new(31, 18)
        .player(1, "Rated 1", "Open", 60)
        .player(2, "Rated 2", "Open", 55)
        .player(50, "Guest A", "Open", 58)
        .player(51, "Guest B", "Open", 62)
        .build();

    let trusted = InMemoryRatingStore::with_trusted([(1, 900), (2, 950), (3, 1000), (4, 1050)]);
    let mut runner = runner_for(vec![rated, unrated], LeagueConfig::new("Rated", vec![30, 31]))
        .with_estimator(RoundRatingEstimator::default())
        .with_ratings(trusted);
    let report = runner.run().unwrap();

    assert_eq!(report.round_ratings.len(), 1);
    let rating = &report.round_ratings[0];
    assert_eq!(rating.competition_id, 30);
    assert_eq!(rating.propagators, 4);
    assert_eq!(rating.outliers, 0);
    assert!((rating.rating_par - 960).abs() <= 1);
    assert!((rating.rating_per_stroke - 10.0).abs() < 1e-6);

    let newcomer = report.competitions[0]
        .results
        .iter()
        .find(|r| r.player.id == 99)
        .unwrap();
    assert!((newcomer.rating.unwrap() - 930).abs() <= 1);
    assert!(report.competitions[1].results.iter().all(|r| r.rating.is_none()));
    assert_eq!(report.competitions[1].rating_par, None);

    let skipped: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::InsufficientPropagators)
        .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].competition_id, Some(31));

    assert_eq!(runner.ratings().round_ratings(99).len(), 1);
    assert!(runner.ratings().round_ratings(50).is_empty());

    let top = report.top_rounds(2);
    assert_eq!(top[0].1.player.id, 4);
    assert_eq!(top[1].1.player.id, 3);
}

#[test]
fn test_warnings_follow_processing_order() {
    let no_open = CompetitionBuilder::new(40, 9)
        .player(5, "Ewa", "Women", 30)
        .player(6, "Frida", "Women", 31)
        .build();
    let mut holes = holes_for_total(27, 9);
    holes[4] = None;
    let missing_hole = CompetitionBuilder::new(41, 9)
        .result(round(Some(1), "Anna", "Open", &holes))
        .player(2, "Bartek", "Open", 29)
        .player(3, "Cezary", "Open", 30)
        .build();

    let league = LeagueConfig::new("Warnings", vec![40, 41]);
    let report = runner_for(vec![no_open, missing_hole], league).run().unwrap();

    let kinds: Vec<(Option<u64>, WarningKind)> = report
        .warnings
        .iter()
        .map(|w| (w.competition_id, w.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (Some(41), WarningKind::MissingScore),
            (Some(41), WarningKind::SumMismatch),
            (Some(40), WarningKind::MissingOpenCategory),
        ]
    );

    // Competition 40 was not scored at all
    assert!(report.standings_for("WOMEN").unwrap().entries.is_empty());

    // par+3 substituted on the missing hole: 24 recorded + 6
    let anna = report.rankings[1]
        .get("OPEN")
        .unwrap()
        .entries
        .iter()
        .find(|e| e.player.id == 1)
        .unwrap();
    assert_eq!(anna.sum, 30);
}

#[test]
fn test_hole_overrides_neutralize_holes() {
    let mut ace = vec![Some(3); 9];
    ace[1] = Some(1);
    let mut bogey = vec![Some(3); 9];
    bogey[1] = Some(5);
    let competition = CompetitionBuilder::new(50, 9)
        .result(round(Some(1), "Anna", "Open", &ace))
        .result(round(Some(2), "Bartek", "Open", &vec![Some(3); 9]))
        .result(round(Some(3), "Cezary", "Open", &bogey))
        .build();

    let mut league = LeagueConfig::new("Overrides", vec![50]);
    league.ignore_holes = vec![HoleOverride {
        competition_id: 50,
        holes: vec![2],
    }];
    let report = runner_for(vec![competition], league).run().unwrap();

    let open = report.rankings[0].get("OPEN").unwrap();
    assert!(open.entries.iter().all(|e| e.sum == 27 && e.place == 1));
    assert!(report
        .warnings
        .iter()
        .all(|w| w.kind == WarningKind::IgnoredHole));
    assert_eq!(report.warnings.len(), 3);

    let totals: Vec<u32> = report
        .standings_for("OPEN")
        .unwrap()
        .entries
        .iter()
        .map(|e| e.total)
        .collect();
    assert_eq!(totals, vec![100, 100, 100]);
}

#[test]
fn test_fixed_table_best_results() {
    let competitions: Vec<RawCompetition> = (60..63)
        .map(|id| {
            CompetitionBuilder::new(id, 9)
                .player(1, "Anna", "Open", if id == 61 { 30 } else { 26 })
                .player(2, "Bartek", "Open", 28)
                .player(3, "Cezary", "Open", 32)
                .build()
        })
        .collect();

    let mut league = LeagueConfig::new("Fixed", vec![60, 61, 62]);
    league.best_n = 2;
    league.scoring = ScoringMode::FixedTable {
        points: vec![10, 8, 6],
    };
    let report = runner_for(competitions, league).run().unwrap();

    let open = report.standings_for("OPEN").unwrap();
    let anna = &open.entries[0];
    assert_eq!((anna.player.id, anna.total), (1, 20));
    assert!(!anna.results[&61].selected);
    // Bartek: 8 + 10 + 8, best two
    assert_eq!(open.entries[1].total, 18);
}

#[test]
fn test_from_config_with_json_files() {
    let dir = std::env::temp_dir().join(format!("league-ranker-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    for competition in season() {
        let path = dir.join(format!("{}.json", competition.id));
        std::fs::write(path, serde_json::to_string(&competition).unwrap()).unwrap();
    }

    let config: AppConfig = toml::from_str(
        r#"
        [rating]
        enabled = false

        [leagues.spring]
        title = "Spring League"
        competition_ids = [10, 11]
        "#,
    )
    .unwrap();

    let provider = Arc::new(JsonDirectoryProvider::new(&dir));
    let missing = provider.fetch_competition(12);
    let report = LeagueRunner::from_config(&config, "spring", provider.clone(), InMemoryRatingStore::new())
        .and_then(|mut runner| runner.run());
    let unknown = LeagueRunner::from_config(&config, "autumn", provider, InMemoryRatingStore::new());
    std::fs::remove_dir_all(&dir).ok();

    let report = report.unwrap();
    assert_eq!(report.standings_for("OPEN").unwrap().entries.len(), 4);
    assert!(report.round_ratings.is_empty());

    assert!(matches!(
        missing.unwrap_err().downcast_ref::<LeagueError>(),
        Some(LeagueError::CompetitionNotFound { competition_id: 12 })
    ));
    assert!(matches!(
        unknown.err().and_then(|e| e.downcast::<LeagueError>().ok()),
        Some(LeagueError::LeagueNotFound { .. })
    ));
}
