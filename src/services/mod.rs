pub mod aggregator;
pub mod prefilter;
pub mod reasoning;
pub mod seed;
pub mod threshold;
pub mod weight_profile;

pub use aggregator::{aggregate, weighted_contributions, AggregatedCandidate};
pub use prefilter::{CandidatePreFilter, PreFilterConfig, PreFilterPolicy};
pub use reasoning::{assign_tiers, retier, ReasoningComposer, RunStamp};
pub use seed::derive_seed;
pub use threshold::{Scored, ThresholdFilter};
pub use weight_profile::WeightProfile;
