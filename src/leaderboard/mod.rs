//! Global leaderboard and accounts
//!
//! The game only talks to the score backend through [`ScoreService`]:
//! authenticate, submit a finished run, list the top scores and fetch the
//! caller's personal best. Records are append-only; the board is a raw
//! descending sort over every submission with no per-player dedup.

pub mod auth;
pub mod local;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthFlow, Credentials, Session, UserId};
pub use local::LocalScoreService;

/// Default page size for [`ScoreService::top_scores`] callers
pub const DEFAULT_TOP_LIMIT: usize = 10;
/// Rows shown on the leaderboard screen
pub const LEADERBOARD_SCREEN_LIMIT: usize = 15;
/// Size of the full [`ScoreService::list`] query
pub const LIST_LIMIT: usize = 20;

/// Identifier assigned to a stored record
pub type RecordId = u64;

/// One submitted score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub player_name: String,
    pub score: u32,
    /// Unix timestamp (ms) when submitted
    pub created_at: f64,
}

/// Errors at the score backend boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// Write attempted without a session
    #[error("not authenticated")]
    Authentication,
    /// Rejected client-side before reaching the backend
    #[error("invalid input: {0}")]
    Validation(String),
    /// The backend call failed; safe to retry
    #[error("network error: {0}")]
    Network(String),
    /// Sign-in with an unknown email or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Sign-up with an email that is already registered
    #[error("account already exists: {0}")]
    AccountExists(String),
    /// A submission for this run is in flight or already succeeded
    #[error("score already submitted for this run")]
    Duplicate,
}

impl ScoreError {
    /// True for failures the user can clear by simply trying again
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScoreError::Network(_) | ScoreError::Authentication)
    }
}

/// The score backend collaborator
pub trait ScoreService {
    /// Start a session with one of the supported identity flows
    fn authenticate(&mut self, flow: AuthFlow) -> Result<Session, ScoreError>;

    /// Drop the current session
    fn sign_out(&mut self);

    /// Current session, if signed in
    fn session(&self) -> Option<&Session>;

    /// Store one record for the signed-in user
    fn submit(&mut self, score: u32, player_name: &str) -> Result<RecordId, ScoreError>;

    /// Highest scores first, ties in storage order, at most `limit`
    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError>;

    /// The signed-in user's highest record (None if signed out or no runs)
    fn user_best(&self) -> Result<Option<ScoreRecord>, ScoreError>;

    /// The full leaderboard listing
    fn list(&self) -> Result<Vec<ScoreRecord>, ScoreError> {
        self.top_scores(LIST_LIMIT)
    }

    fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}

/// Sort records highest first, keeping storage order among ties, and cap at `limit`
pub fn rank_records<'a, I>(records: I, limit: usize) -> Vec<ScoreRecord>
where
    I: IntoIterator<Item = &'a ScoreRecord>,
{
    let mut ranked: Vec<ScoreRecord> = records.into_iter().cloned().collect();
    // Stable sort keeps insertion order for equal scores
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

/// Label for a 0-based leaderboard row: medals for the podium, numbers after
pub fn rank_label(index: usize) -> String {
    match index {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => (n + 1).to_string(),
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
