pub mod answer;
pub mod decision;
pub mod decode;
pub mod diagnostics;
pub mod labels;
pub mod present;
pub mod session;

pub use answer::{AnswerVariant, FinancialEntry, FinancialKind, LimitEntry};
pub use decision::{
    ClassificationMetadata, DecisionSummary, DecisionTrace, Evidence, PolicyDecision, SourceRef,
    Verdict,
};
pub use decode::{decode, decode_decision, decode_decision_with_diagnostics, decode_with_diagnostics};
pub use diagnostics::{AnomalyKind, DecodeAnomaly, Diagnostics};
pub use present::{normalize, present_decision, AnswerCard, DecisionPresentation};
pub use session::{AskTicket, Session, SessionPhase, SubmitError};
