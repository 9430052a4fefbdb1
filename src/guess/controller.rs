//! Game lifecycle: start, guess, give up.
//!
//! A player is either without a game or has exactly one in progress.
//! Winning, running out of guesses, or giving up all end the game and
//! reveal the answer. Every operation on one player's session runs under
//! that player's lock; different players never contend.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use dashmap::DashMap;
use log::{info, warn};
use rand::Rng;

use super::logic::{compare_records, is_win, pick_answer, resolve_guess, select_hints};
use super::{
    Difficulty, GameError, GameSession, GiveUpOutcome, GuessOutcome, MemorySessionStore,
    SessionStore, StartOutcome,
};
use crate::catalog::RecordSource;
use crate::constants::{SESSION_SWEEP_SECS, SESSION_TTL_SECS};

/// Parse a tier from request text, rejecting unknown values.
pub fn parse_difficulty(raw: &str) -> Result<Difficulty, GameError> {
    Difficulty::parse(raw).ok_or_else(|| {
        GameError::InvalidInput(format!(
            "未知难度 `{}`，可选 easy / medium / hard / hell",
            raw.trim()
        ))
    })
}

pub struct GameController<S, T = MemorySessionStore> {
    source: Arc<S>,
    store: T,
    locks: DashMap<String, Arc<Mutex<()>>>,
    /// Unix seconds of the last stale-round sweep.
    last_sweep: AtomicI64,
}

impl<S: RecordSource> GameController<S, MemorySessionStore> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_store(source, MemorySessionStore::new())
    }
}

impl<S: RecordSource, T: SessionStore> GameController<S, T> {
    pub fn with_store(source: Arc<S>, store: T) -> Self {
        Self {
            source,
            store,
            locks: DashMap::new(),
            last_sweep: AtomicI64::new(Utc::now().timestamp()),
        }
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    /// Players with a lock entry. Idle players hold none.
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    fn player_lock(&self, player: &str) -> Arc<Mutex<()>> {
        self.locks.entry(player.to_string()).or_default().clone()
    }

    /// Drop `player`'s lock entry once they have no round, unless another
    /// caller is already waiting on it. Call with the guard held.
    fn release_if_idle(&self, player: &str, held: &Arc<Mutex<()>>) {
        if !self.store.contains(player) {
            // The map's copy plus the caller's
            self.locks.remove_if(player, |_, lock| {
                Arc::ptr_eq(lock, held) && Arc::strong_count(lock) <= 2
            });
        }
    }

    /// Begin a new round for `player`, replacing any unfinished one.
    pub fn start<R: Rng + ?Sized>(
        &self,
        player: &str,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<StartOutcome, GameError> {
        let answer = pick_answer(self.source.as_ref(), rng)?;
        let hints = select_hints(difficulty, &answer, rng);
        let Some(first) = hints.first() else {
            warn!("Picked answer has no hints, refusing to start");
            return Err(GameError::NoEligibleCandidate);
        };

        let total_guesses = difficulty.total_guesses();
        let session = GameSession {
            revealed_hint_field: first.field.to_string(),
            answer,
            guesses_left: total_guesses,
            difficulty,
            started_at: Utc::now(),
        };

        self.sweep_if_due();

        let lock = self.player_lock(player);
        let _guard = acquire(&lock);
        info!(
            "Player {player} started a {} game ({} hints, {total_guesses} guesses)",
            difficulty.name(),
            hints.len()
        );
        self.store.create(player, session);

        Ok(StartOutcome {
            difficulty,
            hints,
            total_guesses,
        })
    }

    /// Submit a name or title. Ends the round on a win or on the last guess.
    pub fn guess(&self, player: &str, input: &str) -> Result<GuessOutcome, GameError> {
        let query = input.trim();
        if query.is_empty() {
            warn!("Player {player} submitted an empty guess");
            return Err(GameError::InvalidInput("请输入皇帝姓名或称号".to_string()));
        }

        let lock = self.player_lock(player);
        let _guard = acquire(&lock);
        let result = self.guess_locked(player, query);
        self.release_if_idle(player, &lock);
        result
    }

    fn guess_locked(&self, player: &str, query: &str) -> Result<GuessOutcome, GameError> {
        let mut session = self.store.get(player).ok_or_else(|| {
            warn!("Player {player} guessed without an active game");
            GameError::NoActiveGame
        })?;
        if session.guesses_left <= 0 {
            return Err(GameError::GuessesExhausted);
        }

        let guessed = resolve_guess(self.source.as_ref(), query)?;
        let comparison = compare_records(&guessed, &session.answer);
        let won = is_win(&guessed, &session.answer);
        session.guesses_left -= 1;
        let guesses_left = session.guesses_left;

        let answer = if won || guesses_left <= 0 {
            self.store.clear(player);
            info!(
                "Player {player} {} after guessing {} (answer rank {:?})",
                if won { "won" } else { "ran out of guesses" },
                guessed.name,
                session.answer.overall_rank
            );
            Some(session.answer)
        } else {
            info!(
                "Player {player} guessed {}, {guesses_left} guesses left",
                guessed.name
            );
            self.store.update(player, session);
            None
        };

        Ok(GuessOutcome {
            comparison,
            won,
            guesses_left,
            guess_name: guessed.name,
            guess_rank: guessed.overall_rank,
            answer,
        })
    }

    /// Abandon the current round and reveal its answer.
    pub fn give_up(&self, player: &str) -> Result<GiveUpOutcome, GameError> {
        let lock = self.player_lock(player);
        let _guard = acquire(&lock);
        let session = self.store.clear(player);
        self.release_if_idle(player, &lock);
        let session = session.ok_or(GameError::NoActiveGame)?;
        info!(
            "Player {player} gave up with {} guesses left",
            session.guesses_left
        );
        Ok(GiveUpOutcome {
            answer: session.answer,
        })
    }

    /// End every round started more than `max_age` ago. Returns how many ended.
    pub fn expire_stale(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut expired = 0;
        for player in self.store.started_before(cutoff) {
            let lock = self.player_lock(&player);
            let _guard = acquire(&lock);
            // A restart may have replaced the round since the scan
            let stale = self
                .store
                .get(&player)
                .is_some_and(|session| session.started_at < cutoff);
            if stale && self.store.clear(&player).is_some() {
                expired += 1;
            }
            self.release_if_idle(&player, &lock);
        }
        if expired > 0 {
            info!("Expired {expired} abandoned games");
        }
        expired
    }

    /// Run [`Self::expire_stale`] if the sweep interval has passed. Only one
    /// caller wins each interval.
    fn sweep_if_due(&self) {
        let now = Utc::now().timestamp();
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now - last < SESSION_SWEEP_SECS {
            return;
        }
        if self
            .last_sweep
            .compare_exchange(last, now, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.expire_stale(Duration::seconds(SESSION_TTL_SECS));
        }
    }

    /// All emperor names in rank order, for autocompletion.
    pub fn list_names(&self) -> Result<Vec<String>, GameError> {
        Ok(self.source.names_by_rank()?)
    }
}

fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    // The guarded data is (), so a poisoned lock carries no broken state
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
