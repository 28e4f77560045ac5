pub mod limiter;
pub mod match_store;

pub use limiter::ScoringLimiter;
pub use match_store::{MatchStats, MatchStore, MemoryMatchStore};
