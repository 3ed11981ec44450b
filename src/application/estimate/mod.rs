//! Estimate request pipeline: one validated call per submission, and the
//! per-form session that owns loading state and the active estimate.

mod client;
mod session;

pub use client::EstimateRequestClient;
pub use session::{ActiveEstimate, EstimateSession, SessionError, SubmitOutcome};
