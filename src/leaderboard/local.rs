//! In-browser score backend
//!
//! Keeps accounts and records in memory and mirrors them to LocalStorage on
//! every write (no-op natively). Sessions are never persisted.

use serde::{Deserialize, Serialize};

use super::auth::{AccountStore, AuthFlow, Session};
use super::{RecordId, ScoreError, ScoreRecord, ScoreService, rank_records};
use crate::consts::MAX_PLAYER_NAME_LEN;
use crate::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Store {
    records: Vec<ScoreRecord>,
    accounts: AccountStore,
    next_record_id: RecordId,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            accounts: AccountStore::default(),
            next_record_id: 1,
        }
    }
}

/// [`ScoreService`] backed by local memory
#[derive(Debug, Default)]
pub struct LocalScoreService {
    store: Store,
    session: Option<Session>,
    /// Mirror writes to LocalStorage
    persist: bool,
}

impl LocalScoreService {
    /// LocalStorage key (used only in wasm32)
    const STORAGE_KEY: &'static str = "crabby_bird_scores";

    /// Empty, memory-only backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend restored from LocalStorage that saves on every write
    pub fn load() -> Self {
        let store = match platform::load_json::<Store>(Self::STORAGE_KEY) {
            Some(store) => {
                log::info!("Loaded {} scores", store.records.len());
                store
            }
            None => {
                log::info!("No scores found, starting fresh");
                Store::default()
            }
        };
        Self {
            store,
            session: None,
            persist: true,
        }
    }

    /// Number of stored records
    pub fn record_count(&self) -> usize {
        self.store.records.len()
    }

    fn save(&self) {
        if self.persist {
            platform::save_json(Self::STORAGE_KEY, &self.store);
        }
    }
}

impl ScoreService for LocalScoreService {
    fn authenticate(&mut self, flow: AuthFlow) -> Result<Session, ScoreError> {
        let session = self.store.accounts.authenticate(flow, platform::now_ms())?;
        log::info!(
            "Signed in as user {} ({})",
            session.user_id.0,
            if session.anonymous { "guest" } else { "account" }
        );
        self.session = Some(session.clone());
        self.save();
        Ok(session)
    }

    fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!("Signed out user {}", session.user_id.0);
        }
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn submit(&mut self, score: u32, player_name: &str) -> Result<RecordId, ScoreError> {
        let user_id = self
            .session
            .as_ref()
            .map(|s| s.user_id)
            .ok_or(ScoreError::Authentication)?;

        let id = self.store.next_record_id;
        self.store.next_record_id += 1;
        self.store.records.push(ScoreRecord {
            id,
            user_id,
            player_name: player_name.chars().take(MAX_PLAYER_NAME_LEN).collect(),
            score,
            created_at: platform::now_ms(),
        });
        self.save();

        log::info!("Stored score {} for user {} (record {})", score, user_id.0, id);
        Ok(id)
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
        Ok(rank_records(&self.store.records, limit))
    }

    fn user_best(&self) -> Result<Option<ScoreRecord>, ScoreError> {
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let best = self
            .store
            .records
            .iter()
            .filter(|r| r.user_id == session.user_id)
            .fold(None::<&ScoreRecord>, |best, r| match best {
                Some(b) if b.score >= r.score => Some(b),
                _ => Some(r),
            });
        Ok(best.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{Credentials, LIST_LIMIT};

    fn guest_service() -> LocalScoreService {
        let mut service = LocalScoreService::new();
        service.authenticate(AuthFlow::Anonymous).unwrap();
        service
    }

    #[test]
    fn test_submit_requires_session() {
        let mut service = LocalScoreService::new();
        assert_eq!(service.submit(5, "Sam"), Err(ScoreError::Authentication));
        assert_eq!(service.record_count(), 0);
        assert!(service.top_scores(10).unwrap().is_empty());
    }

    #[test]
    fn test_submit_after_sign_in() {
        let mut service = guest_service();
        let id = service.submit(5, "Sam").unwrap();
        let top = service.top_scores(10).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, id);
        assert_eq!(top[0].player_name, "Sam");
        assert_eq!(top[0].score, 5);
        assert!(top[0].created_at > 0.0);
    }

    #[test]
    fn test_top_scores_limit_and_ties() {
        let mut service = guest_service();
        let ids: Vec<_> = [10, 7, 7, 3, 1]
            .iter()
            .map(|&s| service.submit(s, "Sam").unwrap())
            .collect();

        let top = service.top_scores(2).unwrap();
        assert_eq!(top.iter().map(|r| r.score).collect::<Vec<_>>(), vec![10, 7]);
        assert_eq!(top[1].id, ids[1]);
    }

    #[test]
    fn test_top_scores_readable_signed_out() {
        let mut service = guest_service();
        service.submit(3, "Sam").unwrap();
        service.sign_out();
        assert!(!service.is_authenticated());
        assert_eq!(service.top_scores(10).unwrap().len(), 1);
        assert_eq!(service.submit(4, "Sam"), Err(ScoreError::Authentication));
    }

    #[test]
    fn test_no_dedup_per_player() {
        let mut service = guest_service();
        service.submit(4, "Sam").unwrap();
        service.submit(4, "Sam").unwrap();
        assert_eq!(service.top_scores(10).unwrap().len(), 2);
    }

    #[test]
    fn test_user_best_is_highest_for_caller() {
        let mut service = LocalScoreService::new();
        assert_eq!(service.user_best().unwrap(), None);

        service
            .authenticate(AuthFlow::SignUp(Credentials::new("a@b.c", "pw")))
            .unwrap();
        assert_eq!(service.user_best().unwrap(), None);
        service.submit(3, "A").unwrap();
        let best_id = service.submit(9, "A").unwrap();
        service.submit(9, "A").unwrap();
        service.submit(2, "A").unwrap();

        service.authenticate(AuthFlow::Anonymous).unwrap();
        service.submit(50, "Guest").unwrap();

        service
            .authenticate(AuthFlow::SignIn(Credentials::new("a@b.c", "pw")))
            .unwrap();
        let best = service.user_best().unwrap().unwrap();
        assert_eq!(best.score, 9);
        assert_eq!(best.id, best_id);

        service.sign_out();
        assert_eq!(service.user_best().unwrap(), None);
    }

    #[test]
    fn test_list_caps_at_twenty() {
        let mut service = guest_service();
        for s in 0..30 {
            service.submit(s, "Sam").unwrap();
        }
        let list = service.list().unwrap();
        assert_eq!(list.len(), LIST_LIMIT);
        assert_eq!(list[0].score, 29);
    }

    #[test]
    fn test_long_names_truncated() {
        let mut service = guest_service();
        service.submit(1, "a-very-long-crab-name-indeed").unwrap();
        let top = service.top_scores(1).unwrap();
        assert_eq!(top[0].player_name.chars().count(), MAX_PLAYER_NAME_LEN);
    }
}
