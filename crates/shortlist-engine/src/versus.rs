//! Round-based versus match session state machine.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use shortlist_types::{Choice, Error, Result, Round, Session, SessionSummary, VersusBackend};

/// State owned by the machine.
///
/// Invariant: at most one round is current, and only while the session is
/// unfinished. Once `summary` is set it is never overwritten.
#[derive(Debug, Default)]
struct VersusState {
    session: Option<Session>,
    current_round: Option<Round>,
    summary: Option<SessionSummary>,
    submitting: bool,
    loading: bool,
    error: Option<Error>,
}

impl VersusState {
    fn is_finished(&self) -> bool {
        self.session.as_ref().map(|s| s.is_finished).unwrap_or(false)
    }

    /// Apply an authoritative session (+ optional round) from the server.
    fn apply_session(&mut self, session: Session, current_round: Option<Round>) {
        if let Some(previous) = &self.session {
            if previous.id == session.id
                && session.current_round_number < previous.current_round_number
            {
                // The server is authoritative, but a round number moving
                // backwards within one session breaks its own contract.
                warn!(
                    session_id = %session.id,
                    previous = previous.current_round_number,
                    reported = session.current_round_number,
                    "server reported an earlier round than previously seen"
                );
            }
        }

        if session.is_finished {
            self.current_round = None;
        } else {
            self.current_round = current_round;
        }
        self.session = Some(session);
    }
}

/// Two-party match session: fetch/create a session, submit one choice per
/// round, and recover from desynchronization.
///
/// Local state is provisional until confirmed by a successful fetch: after
/// any failed mutation the machine surfaces the error and waits for the
/// caller to reconcile via [`refetch_round`](Self::refetch_round) before
/// retrying. Nothing auto-retries.
///
/// Handles are cheap to clone and share one underlying state.
#[derive(Clone)]
pub struct VersusSessionMachine {
    inner: Arc<RwLock<VersusState>>,
    backend: Arc<dyn VersusBackend>,
}

/// Point-in-time copy of the machine state, for rendering.
#[derive(Debug, Clone)]
pub struct VersusSnapshot {
    /// Current session, if one exists.
    pub session: Option<Session>,
    /// Round awaiting a choice, if any.
    pub current_round: Option<Round>,
    /// Terminal summary, once the session finished.
    pub summary: Option<SessionSummary>,
    /// Whether a choice submission is in flight.
    pub submitting: bool,
    /// Whether a session fetch/create is in flight.
    pub loading: bool,
    /// Most recent failure, if any.
    pub error: Option<Error>,
}

impl VersusSessionMachine {
    /// Create a machine over the given backend.
    pub fn new(backend: Arc<dyn VersusBackend>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(VersusState::default())),
            backend,
        }
    }

    /// Create a new session with `total_rounds` rounds and load round 1.
    ///
    /// The create response carries no round, so the machine follows up with
    /// a session fetch to obtain it.
    pub async fn create_session(&self, total_rounds: u32) -> Result<()> {
        if total_rounds == 0 {
            return Err(Error::Validation(
                "a session needs at least one round".to_string(),
            ));
        }

        {
            let mut state = self.inner.write();
            if state.submitting {
                return Err(Error::State(
                    "a choice submission is in flight".to_string(),
                ));
            }
            state.loading = true;
            state.session = None;
            state.current_round = None;
            state.summary = None;
            state.error = None;
        }

        debug!(total_rounds, "creating versus session");
        match self.backend.create_session(total_rounds).await {
            Ok(session) => {
                {
                    let mut state = self.inner.write();
                    state.loading = false;
                    state.session = Some(session);
                }
                self.fetch_session().await
            }
            Err(err) => {
                let mut state = self.inner.write();
                state.loading = false;
                state.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Fetch the server's authoritative session + current round.
    ///
    /// Idempotent; used for the initial load and for resynchronization
    /// after an error. Clears the current round once the session finished.
    pub async fn fetch_session(&self) -> Result<()> {
        {
            let mut state = self.inner.write();
            state.loading = true;
        }

        trace!("fetching versus session");
        match self.backend.fetch_session().await {
            Ok(snapshot) => {
                let mut state = self.inner.write();
                state.loading = false;
                state.error = None;
                state.apply_session(snapshot.session, snapshot.current_round);
                Ok(())
            }
            Err(err) => {
                let mut state = self.inner.write();
                state.loading = false;
                state.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Reconcile local state with the server after a failed submission.
    ///
    /// Equivalent to [`fetch_session`](Self::fetch_session); named for the
    /// recovery path so call sites read as what they do.
    pub async fn refetch_round(&self) -> Result<()> {
        self.fetch_session().await
    }

    /// Submit the choice for the current round.
    ///
    /// Rejected with `Error::State` — making NO network call — when no
    /// round is active, the session is finished, or another submission is
    /// still in flight. On success the session updates from the response;
    /// if it finished, the summary freezes and the round clears, otherwise
    /// the next round is obtained via an automatic session re-fetch.
    pub async fn submit_choice(&self, choice: Choice) -> Result<()> {
        let round_id = {
            let mut state = self.inner.write();
            if state.submitting {
                return Err(Error::State(
                    "a choice submission is already in flight".to_string(),
                ));
            }
            if state.is_finished() {
                return Err(Error::State("the session is already finished".to_string()));
            }
            let round_id = state
                .current_round
                .as_ref()
                .ok_or_else(|| Error::State("no round is currently active".to_string()))?
                .id
                .clone();
            state.submitting = true;
            round_id
        };

        debug!(round_id = %round_id, ?choice, "submitting round choice");
        match self.backend.submit_choice(&round_id, choice).await {
            Ok(outcome) => {
                let finished = outcome.session.is_finished;
                {
                    let mut state = self.inner.write();
                    state.submitting = false;
                    state.error = None;
                    if finished {
                        if state.summary.is_none() {
                            state.summary = outcome.summary;
                        }
                    }
                    state.apply_session(outcome.session, None);
                }

                if finished {
                    debug!("versus session finished");
                    Ok(())
                } else {
                    // The choice response never carries the next round;
                    // ask the server for it.
                    self.fetch_session().await
                }
            }
            Err(err) => {
                warn!(round_id = %round_id, error = %err, "choice submission failed");
                let mut state = self.inner.write();
                state.submitting = false;
                state.error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Whether a choice submission would be accepted right now.
    ///
    /// The same guard is enforced inside [`submit_choice`](Self::submit_choice);
    /// exposing it lets the UI disable controls for the same reasons.
    pub fn can_submit_choice(&self) -> bool {
        let state = self.inner.read();
        !state.submitting && !state.is_finished() && state.current_round.is_some()
    }

    /// Current session, if one exists.
    pub fn session(&self) -> Option<Session> {
        self.inner.read().session.clone()
    }

    /// Round awaiting a choice, if any.
    pub fn current_round(&self) -> Option<Round> {
        self.inner.read().current_round.clone()
    }

    /// Terminal summary, once the session finished.
    pub fn summary(&self) -> Option<SessionSummary> {
        self.inner.read().summary.clone()
    }

    /// Whether the session has finished.
    pub fn is_finished(&self) -> bool {
        self.inner.read().is_finished()
    }

    /// Whether a choice submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.inner.read().submitting
    }

    /// Whether a session fetch/create is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    /// Most recent failure, if any.
    pub fn last_error(&self) -> Option<Error> {
        self.inner.read().error.clone()
    }

    /// Point-in-time copy of the full state.
    pub fn snapshot(&self) -> VersusSnapshot {
        let state = self.inner.read();
        VersusSnapshot {
            session: state.session.clone(),
            current_round: state.current_round.clone(),
            summary: state.summary.clone(),
            submitting: state.submitting,
            loading: state.loading,
            error: state.error.clone(),
        }
    }
}

impl std::fmt::Debug for VersusSessionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("VersusSessionMachine")
            .field("session", &state.session.as_ref().map(|s| s.id.clone()))
            .field("round", &state.current_round.as_ref().map(|r| r.round_number))
            .field("finished", &state.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, round: u32, total: u32, finished: bool) -> Session {
        Session {
            id: id.to_string(),
            current_round_number: round,
            total_rounds: total,
            is_finished: finished,
            score: 0,
        }
    }

    #[test]
    fn test_finished_session_clears_round() {
        let mut state = VersusState::default();
        state.current_round = Some(Round {
            id: "r1".to_string(),
            round_number: 1,
            content: shortlist_types::RecommendationItem {
                external_id: "x".to_string(),
                title: String::new(),
                content_type: String::new(),
                source: String::new(),
                poster_url: None,
                description: None,
                compatibility_score: 0.0,
            },
            is_answered: false,
        });

        state.apply_session(session("s1", 3, 3, true), None);

        assert!(state.is_finished());
        assert!(state.current_round.is_none());
    }

    #[test]
    fn test_apply_session_replaces_round() {
        let mut state = VersusState::default();
        state.apply_session(session("s1", 1, 5, false), None);
        assert!(state.session.is_some());
        assert!(!state.is_finished());
    }
}
