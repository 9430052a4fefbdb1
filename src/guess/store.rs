//! Per-player game session storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::GameSession;

/// Key-value store of active sessions, keyed by player id.
///
/// Each player has at most one session; `create` replaces any existing one.
pub trait SessionStore: Send + Sync {
    fn create(&self, player: &str, session: GameSession);
    fn get(&self, player: &str) -> Option<GameSession>;
    fn update(&self, player: &str, session: GameSession);
    fn clear(&self, player: &str) -> Option<GameSession>;

    fn contains(&self, player: &str) -> bool {
        self.get(player).is_some()
    }

    /// Players whose round started before `cutoff`.
    fn started_before(&self, cutoff: DateTime<Utc>) -> Vec<String>;
}

/// Process-local store. Sessions vanish on restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, GameSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, player: &str, session: GameSession) {
        self.sessions.insert(player.to_string(), session);
    }

    fn get(&self, player: &str) -> Option<GameSession> {
        self.sessions.get(player).map(|s| s.value().clone())
    }

    fn update(&self, player: &str, session: GameSession) {
        self.sessions.insert(player.to_string(), session);
    }

    fn clear(&self, player: &str) -> Option<GameSession> {
        self.sessions.remove(player).map(|(_, s)| s)
    }

    fn contains(&self, player: &str) -> bool {
        self.sessions.contains_key(player)
    }

    fn started_before(&self, cutoff: DateTime<Utc>) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|entry| entry.value().started_at < cutoff)
            .map(|entry| entry.key().clone())
            .collect()
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn create(&self, player: &str, session: GameSession) {
        (**self).create(player, session)
    }

    fn get(&self, player: &str) -> Option<GameSession> {
        (**self).get(player)
    }

    fn update(&self, player: &str, session: GameSession) {
        (**self).update(player, session)
    }

    fn clear(&self, player: &str) -> Option<GameSession> {
        (**self).clear(player)
    }

    fn contains(&self, player: &str) -> bool {
        (**self).contains(player)
    }

    fn started_before(&self, cutoff: DateTime<Utc>) -> Vec<String> {
        (**self).started_before(cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emperor::EmperorRecord;
    use crate::guess::Difficulty;
    use chrono::Duration;

    fn session(guesses_left: i32) -> GameSession {
        GameSession {
            answer: EmperorRecord {
                overall_rank: Some(1),
                ..Default::default()
            },
            guesses_left,
            revealed_hint_field: "virtue".to_string(),
            difficulty: Difficulty::Hard,
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_overwrites() {
        let store = MemorySessionStore::new();
        store.create("p1", session(5));
        store.create("p1", session(3));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("p1").unwrap().guesses_left, 3);
    }

    #[test]
    fn test_players_are_isolated() {
        let store = MemorySessionStore::new();
        store.create("p1", session(5));
        store.create("p2", session(2));
        store.clear("p1");
        assert!(store.get("p1").is_none());
        assert_eq!(store.get("p2").unwrap().guesses_left, 2);
    }

    #[test]
    fn test_update_and_clear() {
        let store = MemorySessionStore::new();
        store.create("p1", session(5));
        let mut s = store.get("p1").unwrap();
        s.guesses_left -= 1;
        store.update("p1", s);
        assert_eq!(store.get("p1").unwrap().guesses_left, 4);
        assert_eq!(store.clear("p1").unwrap().guesses_left, 4);
        assert!(store.clear("p1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_started_before_lists_old_rounds() {
        let store = MemorySessionStore::new();
        let mut old = session(5);
        old.started_at = Utc::now() - Duration::hours(3);
        store.create("old", old);
        store.create("new", session(5));

        let stale = store.started_before(Utc::now() - Duration::hours(1));
        assert_eq!(stale, vec!["old".to_string()]);
        assert!(store.contains("new"));
        assert!(!store.contains("gone"));
    }
}
