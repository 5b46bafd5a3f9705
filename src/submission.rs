//! Share-score flow for a finished run
//!
//! Validates the player name client-side, guards against duplicate
//! submissions with a one-shot latch, and leaves the latch open after a
//! failure so the player can retry.

use crate::consts::MAX_PLAYER_NAME_LEN;
use crate::leaderboard::{RecordId, ScoreError, ScoreService};

/// Trim and check a display name before it goes anywhere near the backend
pub fn validate_player_name(name: &str) -> Result<String, ScoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ScoreError::Validation("player name is empty".into()));
    }
    if trimmed.chars().count() > MAX_PLAYER_NAME_LEN {
        return Err(ScoreError::Validation(format!(
            "player name longer than {MAX_PLAYER_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// A validated request ready to hand to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    pub score: u32,
    pub player_name: String,
}

/// Where the share-score form is
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStatus {
    Ready,
    InFlight,
    Submitted(RecordId),
    Failed(ScoreError),
}

/// Submission latch for one completed run
#[derive(Debug, Clone)]
pub struct Submission {
    score: u32,
    status: SubmitStatus,
}

impl Submission {
    /// Fresh form for a run that ended with `score`
    pub fn for_run(score: u32) -> Self {
        Self {
            score,
            status: SubmitStatus::Ready,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.status, SubmitStatus::Submitted(_))
    }

    pub fn is_in_flight(&self) -> bool {
        self.status == SubmitStatus::InFlight
    }

    /// Whether the share form should be shown at all
    pub fn can_offer(&self) -> bool {
        self.score > 0 && !self.is_submitted()
    }

    /// Validate and mark in flight. Nothing changes on error.
    pub fn begin(&mut self, player_name: &str) -> Result<PendingSubmit, ScoreError> {
        if self.is_submitted() || self.is_in_flight() {
            return Err(ScoreError::Duplicate);
        }
        let player_name = validate_player_name(player_name)?;
        self.status = SubmitStatus::InFlight;
        Ok(PendingSubmit {
            score: self.score,
            player_name,
        })
    }

    /// Record the backend's answer for the in-flight request
    pub fn finish(&mut self, result: Result<RecordId, ScoreError>) {
        match result {
            Ok(id) => {
                log::info!("Score {} shared (record {})", self.score, id);
                self.status = SubmitStatus::Submitted(id);
            }
            Err(e) => {
                log::warn!("Failed to submit score {}: {}", self.score, e);
                self.status = SubmitStatus::Failed(e);
            }
        }
    }

    /// Begin, call the backend, and finish in one go
    pub fn submit_with<S: ScoreService + ?Sized>(
        &mut self,
        service: &mut S,
        player_name: &str,
    ) -> Result<RecordId, ScoreError> {
        let pending = self.begin(player_name)?;
        let result = service.submit(pending.score, &pending.player_name);
        self.finish(result.clone());
        result
    }
}
