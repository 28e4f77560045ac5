pub mod candidate_ctx;
pub mod candidate_flow;

pub use candidate_ctx::CandidateCtx;
pub use candidate_flow::{CandidateFlow, RetryPolicy};
