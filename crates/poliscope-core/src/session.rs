//! Question lifecycle state machine.
//!
//! Gates when a question may be submitted and which decision is currently
//! valid to display. One question is in flight at a time; each accepted
//! submission carries a generation tag, and resolutions bearing a stale tag
//! are discarded, so an out-of-order response can never overwrite a newer
//! state.

use thiserror::Error;
use tracing::info;

use crate::decision::PolicyDecision;

/// Why a submission was rejected locally. Messages render verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please upload a policy first")]
    NoPolicy,
    #[error("Please enter a question")]
    EmptyQuestion,
    #[error("Still analysing the previous question")]
    InFlight,
}

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NoPolicy,
    PolicyReady,
    Asking,
    Answered,
    Failed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::NoPolicy => "no_policy",
            SessionPhase::PolicyReady => "policy_ready",
            SessionPhase::Asking => "asking",
            SessionPhase::Answered => "answered",
            SessionPhase::Failed => "failed",
        }
    }
}

/// Tag for one accepted submission; resolves exactly that submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AskTicket {
    generation: u64,
}

#[derive(Debug)]
enum State {
    NoPolicy,
    PolicyReady,
    Asking { generation: u64, question: String },
    Answered { decision: Box<PolicyDecision> },
    Failed { reason: String },
}

/// The lifecycle controller.
#[derive(Debug)]
pub struct Session {
    state: State,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: State::NoPolicy,
            generation: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::NoPolicy => SessionPhase::NoPolicy,
            State::PolicyReady => SessionPhase::PolicyReady,
            State::Asking { .. } => SessionPhase::Asking,
            State::Answered { .. } => SessionPhase::Answered,
            State::Failed { .. } => SessionPhase::Failed,
        }
    }

    /// The decision currently valid to display.
    pub fn decision(&self) -> Option<&PolicyDecision> {
        match &self.state {
            State::Answered { decision } => Some(decision),
            _ => None,
        }
    }

    /// The failure reason, when the last question failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            State::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    /// The question currently in flight.
    pub fn in_flight(&self) -> Option<&str> {
        match &self.state {
            State::Asking { question, .. } => Some(question),
            _ => None,
        }
    }

    /// The upload collaborator reported success: enter PolicyReady,
    /// discarding any prior answer. Valid from any state.
    pub fn policy_ingested(&mut self) {
        info!(phase = self.phase().as_str(), "policy ingested, session reset");
        self.state = State::PolicyReady;
    }

    /// Validate and accept a question submission.
    ///
    /// Rejections leave the state untouched; an accepted submission enters
    /// Asking and returns the ticket its resolution must present.
    pub fn submit(&mut self, question: &str) -> Result<AskTicket, SubmitError> {
        match self.state {
            State::NoPolicy => return Err(SubmitError::NoPolicy),
            State::Asking { .. } => return Err(SubmitError::InFlight),
            _ => {}
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(SubmitError::EmptyQuestion);
        }

        self.generation += 1;
        self.state = State::Asking {
            generation: self.generation,
            question: question.to_string(),
        };
        Ok(AskTicket {
            generation: self.generation,
        })
    }

    /// Record the decision for an in-flight question.
    ///
    /// Returns false and changes nothing when the ticket is stale (a newer
    /// submission or a policy reset superseded it).
    pub fn resolve(&mut self, ticket: AskTicket, decision: PolicyDecision) -> bool {
        if !self.accepts(ticket) {
            info!(generation = ticket.generation, "discarding stale answer");
            return false;
        }
        self.state = State::Answered {
            decision: Box::new(decision),
        };
        true
    }

    /// Record a transport failure for an in-flight question. Same staleness
    /// rules as [`Self::resolve`].
    pub fn fail(&mut self, ticket: AskTicket, reason: String) -> bool {
        if !self.accepts(ticket) {
            info!(generation = ticket.generation, "discarding stale failure");
            return false;
        }
        self.state = State::Failed { reason };
        true
    }

    fn accepts(&self, ticket: AskTicket) -> bool {
        matches!(
            self.state,
            State::Asking { generation, .. } if generation == ticket.generation
        )
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
