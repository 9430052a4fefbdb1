//! Integration test: guess-the-emperor rounds
//!
//! Drives the controller through whole rounds: start → guesses → win, loss
//! or give-up, with a source whose answer draw is fixed.

use std::sync::Arc;

use emperor_rank::catalog::{Catalog, RecordSource, SourceError};
use emperor_rank::emperor::{EmperorRecord, ScoreField};
use emperor_rank::guess::logic::{is_playable, pick_answer};
use emperor_rank::guess::{Difficulty, GameController, GameError, SessionStore, Verdict};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Always draws `answer`; lookups go to `catalog`.
struct FixedSource {
    answer: EmperorRecord,
    catalog: Catalog,
}

impl RecordSource for FixedSource {
    fn random_record<R: Rng + ?Sized>(
        &self,
        _rng: &mut R,
    ) -> Result<Option<EmperorRecord>, SourceError> {
        Ok(Some(self.answer.clone()))
    }

    fn find_by_exact_name(&self, name: &str) -> Result<Option<EmperorRecord>, SourceError> {
        self.catalog.find_by_exact_name(name)
    }

    fn find_by_name_substring(
        &self,
        fragment: &str,
    ) -> Result<Option<EmperorRecord>, SourceError> {
        self.catalog.find_by_name_substring(fragment)
    }

    fn find_by_exact_title(&self, title: &str) -> Result<Option<EmperorRecord>, SourceError> {
        self.catalog.find_by_exact_title(title)
    }

    fn names_by_rank(&self) -> Result<Vec<String>, SourceError> {
        self.catalog.names_by_rank()
    }
}

fn emperor(rank: u32, era: &str, name: &str, score: f64) -> EmperorRecord {
    let mut record = EmperorRecord {
        overall_rank: Some(rank),
        era: Some(era.to_string()),
        title: format!("{name}帝"),
        name: name.to_string(),
        ..Default::default()
    };
    for field in ScoreField::ALL {
        record.set_score(field, Some(score));
    }
    record
}

fn game_with_answer(answer: EmperorRecord) -> GameController<FixedSource> {
    let catalog = Catalog::from_records(vec![
        emperor(1, "唐", "李世民", 90.0),
        emperor(2, "西汉", "刘彻", 85.0),
        emperor(9, "异域", "阿提拉", 60.0),
    ])
    .unwrap();
    GameController::new(Arc::new(FixedSource { answer, catalog }))
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(2024)
}

#[test]
fn test_hell_round_reveals_one_hint() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    let start = game.start("p1", Difficulty::Hell, &mut rng()).unwrap();
    assert_eq!(start.hints.len(), 1);
    assert_eq!(start.total_guesses, 3);
    assert_eq!(start.hints[0].value, 90.0);
}

#[test]
fn test_easy_round_reveals_every_valid_score() {
    let mut answer = emperor(1, "唐", "李世民", 90.0);
    answer.beauty = None;
    let game = game_with_answer(answer);
    let start = game.start("p1", Difficulty::Easy, &mut rng()).unwrap();
    assert_eq!(start.hints.len(), 15);
    assert!(start.hints.iter().all(|h| h.field != "beauty"));
    assert_eq!(start.hints[0].field, "virtue");
}

#[test]
fn test_last_guess_miss_ends_round() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    game.start("p1", Difficulty::Hell, &mut rng()).unwrap();
    let mut session = game.store().get("p1").unwrap();
    session.guesses_left = 1;
    game.store().update("p1", session);

    let outcome = game.guess("p1", "刘彻").unwrap();
    assert!(!outcome.won);
    assert_eq!(outcome.guesses_left, 0);
    assert_eq!(outcome.answer.as_ref().unwrap().name, "李世民");
    assert!(outcome.is_over());

    assert!(matches!(
        game.guess("p1", "刘彻"),
        Err(GameError::NoActiveGame)
    ));
}

#[test]
fn test_empty_guess_keeps_budget() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    game.start("p1", Difficulty::Medium, &mut rng()).unwrap();
    assert!(matches!(
        game.guess("p1", "   "),
        Err(GameError::InvalidInput(_))
    ));
    assert_eq!(game.store().get("p1").unwrap().guesses_left, 10);
}

#[test]
fn test_rank_match_wins_despite_other_fields() {
    // Catalog copy of rank 2 scores 85 everywhere; the drawn answer scores 40
    let game = game_with_answer(emperor(2, "唐", "别名", 40.0));
    game.start("p1", Difficulty::Hard, &mut rng()).unwrap();

    let outcome = game.guess("p1", "刘彻").unwrap();
    assert!(outcome.won);
    assert_eq!(outcome.guesses_left, 4);
    assert!(outcome
        .comparison
        .iter()
        .any(|row| row.result != Verdict::Correct));
    assert!(game.store().get("p1").is_none());
}

#[test]
fn test_unknown_era_compares_as_earliest() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    game.start("p1", Difficulty::Easy, &mut rng()).unwrap();

    let outcome = game.guess("p1", "阿提拉").unwrap();
    let era = outcome
        .comparison
        .iter()
        .find(|row| row.field == "era")
        .unwrap();
    assert_eq!(era.result, Verdict::Early);

    let rank = &outcome.comparison[0];
    assert_eq!(rank.field, "overall_rank");
    assert_eq!(rank.result, Verdict::Low);
    assert!(outcome
        .comparison
        .iter()
        .skip(2)
        .all(|row| row.result == Verdict::Low));
}

#[test]
fn test_guess_by_title_and_substring() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    game.start("p1", Difficulty::Easy, &mut rng()).unwrap();
    assert_eq!(game.guess("p1", "刘彻帝").unwrap().guess_rank, Some(2));
    assert_eq!(game.guess("p1", "世").unwrap().guess_rank, Some(1));
}

#[test]
fn test_give_up_reveals_then_rejects() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    game.start("p1", Difficulty::Medium, &mut rng()).unwrap();
    assert_eq!(game.give_up("p1").unwrap().answer.name, "李世民");
    assert!(matches!(game.give_up("p1"), Err(GameError::NoActiveGame)));
}

#[test]
fn test_players_do_not_share_rounds() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    game.start("p1", Difficulty::Hell, &mut rng()).unwrap();
    game.start("p2", Difficulty::Easy, &mut rng()).unwrap();
    game.guess("p1", "刘彻").unwrap();
    assert_eq!(game.store().get("p1").unwrap().guesses_left, 2);
    assert_eq!(game.store().get("p2").unwrap().guesses_left, 15);
}

#[test]
fn test_restart_replaces_round() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    game.start("p1", Difficulty::Hell, &mut rng()).unwrap();
    game.guess("p1", "刘彻").unwrap();
    game.start("p1", Difficulty::Medium, &mut rng()).unwrap();
    let session = game.store().get("p1").unwrap();
    assert_eq!(session.difficulty, Difficulty::Medium);
    assert_eq!(session.guesses_left, 10);
}

#[test]
fn test_picked_answers_are_always_playable() {
    let mut unplayable = emperor(3, "宋", "无分", 0.0);
    unplayable.overall_score = Some(0.0);
    let catalog = Catalog::from_records(vec![
        emperor(1, "唐", "李世民", 90.0),
        unplayable,
        EmperorRecord {
            overall_rank: Some(4),
            name: "空白".to_string(),
            ..Default::default()
        },
    ])
    .unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..100 {
        let answer = pick_answer(&catalog, &mut rng).unwrap();
        assert!(is_playable(&answer));
        assert_eq!(answer.overall_rank, Some(1));
    }
}

#[test]
fn test_no_playable_record_fails_start() {
    let catalog = Catalog::from_records(vec![EmperorRecord {
        overall_rank: Some(1),
        name: "空白".to_string(),
        ..Default::default()
    }])
    .unwrap();
    let game = GameController::new(Arc::new(catalog));
    assert!(matches!(
        game.start("p1", Difficulty::Easy, &mut rng()),
        Err(GameError::NoEligibleCandidate)
    ));
    assert!(game.store().get("p1").is_none());
}

#[test]
fn test_concurrent_guesses_spend_budget_once_each() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    game.start("p1", Difficulty::Hell, &mut rng()).unwrap();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..12)
            .map(|_| scope.spawn(|| game.guess("p1", "刘彻")))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut left: Vec<i32> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|outcome| outcome.guesses_left)
        .collect();
    left.sort_unstable();
    assert_eq!(left, vec![0, 1, 2]);

    let revealed = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .filter(|outcome| outcome.answer.is_some())
        .count();
    assert_eq!(revealed, 1);

    assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
        r,
        Err(GameError::NoActiveGame | GameError::GuessesExhausted)
    )));
    assert!(game.store().get("p1").is_none());
    assert_eq!(game.lock_count(), 0);
}

#[test]
fn test_finished_rounds_leave_no_player_state() {
    let game = game_with_answer(emperor(1, "唐", "李世民", 90.0));
    let mut rng = rng();
    for i in 0..1000 {
        let player = format!("visitor-{i}");
        game.start(&player, Difficulty::Hard, &mut rng).unwrap();
        if i % 2 == 0 {
            game.give_up(&player).unwrap();
        } else {
            assert!(game.guess(&player, "李世民").unwrap().won);
        }
    }
    assert!(game.store().is_empty());
    assert_eq!(game.lock_count(), 0);
}
