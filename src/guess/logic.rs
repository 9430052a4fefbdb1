//! Guess-the-emperor rules: verdicts, hints, answer selection and guess resolution.

use std::cmp::Ordering;

use log::{debug, warn};
use rand::Rng;

use super::{
    CompareField, Difficulty, FieldComparison, FieldValue, GameError, Hint, HintPolicy, Verdict,
};
use crate::catalog::RecordSource;
use crate::constants::MAX_PICK_ATTEMPTS;
use crate::emperor::{era_index, EmperorRecord, ScoreField};

/// Compare one field of a guess against the answer. Never fails: values that
/// do not fit the field's type compare as `Correct`.
pub fn compare(field: CompareField, guess: &FieldValue, answer: &FieldValue) -> Verdict {
    match (field, guess, answer) {
        (CompareField::Rank, FieldValue::Rank(g), FieldValue::Rank(a)) => compare_rank(*g, *a),
        (CompareField::Era, FieldValue::Era(g), FieldValue::Era(a)) => {
            compare_era(g.as_deref(), a.as_deref())
        }
        (CompareField::Score(_), FieldValue::Score(g), FieldValue::Score(a)) => {
            compare_score(*g, *a)
        }
        _ => {
            debug!("Mismatched value kinds for {}, treating as correct", field.key());
            Verdict::Correct
        }
    }
}

/// Smaller rank is better: a better-ranked guess is `High`. Missing ranks count as worst.
pub fn compare_rank(guess: Option<u32>, answer: Option<u32>) -> Verdict {
    match (guess, answer) {
        (None, None) => Verdict::Correct,
        (None, Some(_)) => Verdict::Low,
        (Some(_), None) => Verdict::High,
        (Some(g), Some(a)) => match g.cmp(&a) {
            Ordering::Equal => Verdict::Correct,
            Ordering::Greater => Verdict::Low,
            Ordering::Less => Verdict::High,
        },
    }
}

/// Chronological comparison. Missing or unknown eras resolve as earliest.
pub fn compare_era(guess: Option<&str>, answer: Option<&str>) -> Verdict {
    if guess == answer {
        return Verdict::Correct;
    }
    let position = |era: Option<&str>| era.and_then(era_index).map_or(-1, |i| i as i64);
    match position(guess).cmp(&position(answer)) {
        Ordering::Equal => Verdict::Correct,
        Ordering::Less => Verdict::Early,
        Ordering::Greater => Verdict::Late,
    }
}

/// Numeric comparison. A missing side counts as lowest; NaN compares as correct.
pub fn compare_score(guess: Option<f64>, answer: Option<f64>) -> Verdict {
    match (guess, answer) {
        (None, None) => Verdict::Correct,
        (None, Some(_)) => Verdict::Low,
        (Some(_), None) => Verdict::High,
        (Some(g), Some(a)) => match g.partial_cmp(&a) {
            Some(Ordering::Greater) => Verdict::High,
            Some(Ordering::Less) => Verdict::Low,
            Some(Ordering::Equal) | None => Verdict::Correct,
        },
    }
}

/// Compare every field of `guess` against `answer`, rank and era first.
pub fn compare_records(guess: &EmperorRecord, answer: &EmperorRecord) -> Vec<FieldComparison> {
    CompareField::all()
        .map(|field| {
            let value = field.value_of(guess);
            let result = compare(field, &value, &field.value_of(answer));
            FieldComparison {
                field: field.key(),
                label: field.label(),
                value,
                result,
            }
        })
        .collect()
}

/// A guess wins when its rank equals the answer's. Two unranked records also match.
pub fn is_win(guess: &EmperorRecord, answer: &EmperorRecord) -> bool {
    guess.overall_rank == answer.overall_rank
}

/// Score fields holding a usable value, in table order.
pub fn valid_score_fields(record: &EmperorRecord) -> Vec<ScoreField> {
    ScoreField::ALL
        .into_iter()
        .filter(|f| record.score(*f).is_some())
        .collect()
}

/// Whether a record can serve as an answer: something to hint, and a non-zero overall score.
pub fn is_playable(record: &EmperorRecord) -> bool {
    let overall_ok = record.overall_score.is_some_and(|s| s != 0.0);
    overall_ok && !valid_score_fields(record).is_empty()
}

/// Pick the hints a tier reveals for `record`.
///
/// Sampled tiers draw without replacement; the reveal order is the draw order.
pub fn select_hints<R: Rng + ?Sized>(
    difficulty: Difficulty,
    record: &EmperorRecord,
    rng: &mut R,
) -> Vec<Hint> {
    let mut pool = valid_score_fields(record);
    let chosen: Vec<ScoreField> = match difficulty.hint_policy() {
        HintPolicy::All => pool,
        HintPolicy::Sample(n) => {
            // Partial Fisher-Yates
            let count = n.min(pool.len());
            for i in 0..count {
                let j = rng.gen_range(i..pool.len());
                pool.swap(i, j);
            }
            pool.truncate(count);
            pool
        }
    };

    chosen
        .into_iter()
        .filter_map(|field| {
            record.score(field).map(|value| Hint {
                field: field.key(),
                label: field.label(),
                value,
            })
        })
        .collect()
}

/// Draw random records until one is playable, giving up after [`MAX_PICK_ATTEMPTS`].
pub fn pick_answer<S, R>(source: &S, rng: &mut R) -> Result<EmperorRecord, GameError>
where
    S: RecordSource + ?Sized,
    R: Rng + ?Sized,
{
    for attempt in 1..=MAX_PICK_ATTEMPTS {
        let Some(record) = source.random_record(rng)? else {
            warn!("Record source is empty, no answer to pick");
            return Err(GameError::NoEligibleCandidate);
        };
        if is_playable(&record) {
            debug!("Picked answer rank {:?} on attempt {attempt}", record.overall_rank);
            return Ok(record);
        }
    }
    warn!("No playable record after {MAX_PICK_ATTEMPTS} draws");
    Err(GameError::NoEligibleCandidate)
}

/// Find the emperor a free-text guess refers to: exact name, then name
/// substring, then exact title.
pub fn resolve_guess<S>(source: &S, input: &str) -> Result<EmperorRecord, GameError>
where
    S: RecordSource + ?Sized,
{
    let query = input.trim();
    if query.is_empty() {
        return Err(GameError::InvalidInput("请输入皇帝姓名或称号".to_string()));
    }
    if let Some(record) = source.find_by_exact_name(query)? {
        return Ok(record);
    }
    if let Some(record) = source.find_by_name_substring(query)? {
        return Ok(record);
    }
    if let Some(record) = source.find_by_exact_title(query)? {
        return Ok(record);
    }
    Err(GameError::NotFound(query.to_string()))
}
