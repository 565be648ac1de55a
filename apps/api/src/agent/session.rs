//! Per-candidate screening session.
//!
//! A session records every decision the loop made for one candidate. The
//! history only grows, and the transition into a finished state happens at
//! most once; after that the loop issues no further gateway calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::agent::actions::{ActionOutcome, ParamMap};
use crate::agent::decision::{ProtocolViolation, ViolationClass};

/// Control states of the decision loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Created, no decision requested yet.
    Pending,
    /// Waiting on the completion gateway.
    Deciding,
    /// A validated decision is being dispatched.
    Dispatching,
    /// The terminal action was dispatched.
    Done,
    /// The safety bound tripped before a terminal action arrived.
    Aborted,
}

/// One step of session history: either a dispatched action with its
/// outcome, or a recorded protocol violation (no handler ran).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    Dispatched {
        action: String,
        params: ParamMap,
        outcome: ActionOutcome,
    },
    Violation {
        class: ViolationClass,
        detail: String,
    },
}

#[derive(Debug, Serialize)]
pub struct AgentSession {
    pub id: Uuid,
    pub candidate_id: String,
    pub state: SessionState,
    pub history: Vec<HistoryEntry>,
    /// Total gateway round-trips spent on this session, across reinvocations.
    pub iterations: u32,
    /// Protocol violations since the last successful dispatch.
    pub consecutive_failures: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl AgentSession {
    pub fn new(candidate_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            candidate_id: candidate_id.into(),
            state: SessionState::Pending,
            history: Vec::new(),
            iterations: 0,
            consecutive_failures: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// True once the terminal action has been dispatched.
    pub fn terminal(&self) -> bool {
        self.state == SessionState::Done
    }

    /// True for both end states; a finished session is never driven again.
    pub fn finished(&self) -> bool {
        matches!(self.state, SessionState::Done | SessionState::Aborted)
    }

    /// The most recent dispatched outcome, folded into the next decision's
    /// context.
    pub fn last_outcome(&self) -> Option<&ActionOutcome> {
        self.history.iter().rev().find_map(|entry| match entry {
            HistoryEntry::Dispatched { outcome, .. } => Some(outcome),
            HistoryEntry::Violation { .. } => None,
        })
    }

    pub fn record_dispatch(&mut self, action: &str, params: ParamMap, outcome: ActionOutcome) {
        self.history.push(HistoryEntry::Dispatched {
            action: action.to_string(),
            params,
            outcome,
        });
        self.consecutive_failures = 0;
    }

    pub fn record_violation(&mut self, violation: &ProtocolViolation) {
        self.history.push(HistoryEntry::Violation {
            class: violation.class(),
            detail: violation.to_string(),
        });
        self.consecutive_failures += 1;
    }

    /// Moves the session into an end state. A second call is a no-op: the
    /// finished transition happens exactly once.
    pub fn finish(&mut self, state: SessionState) {
        debug_assert!(matches!(
            state,
            SessionState::Done | SessionState::Aborted
        ));
        if self.finished() {
            return;
        }
        self.state = state;
        self.finished_at = Some(Utc::now());
    }
}
