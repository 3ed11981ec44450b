//! Application layer - Handlers, the estimate pipeline and presentation state.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Gateway-side handlers serve the HTTP endpoints; the estimate session and
//! presenter drive the client side of the same flow.

pub mod estimate;
pub mod handlers;
pub mod presenter;

pub use estimate::{ActiveEstimate, EstimateRequestClient, EstimateSession, SessionError, SubmitOutcome};
pub use handlers::{
    AnalysisError, AnalyzePropertyCommand, AnalyzePropertyHandler, AnalyzePropertyResult,
    NotificationError, SendValuationEmailCommand, SendValuationEmailHandler,
};
pub use presenter::{ContactDialog, ContactError, Notice, NoticeKind, ResultView};
