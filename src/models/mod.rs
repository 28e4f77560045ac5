pub mod candidate;
pub mod criteria;
pub mod job;
pub mod loaders;
pub mod match_result;
pub mod score_sheet;
pub mod summary;

pub use candidate::{CandidateProfile, MentionIndex};
pub use criteria::{CriteriaScores, Criterion, WeightedScores};
pub use job::JobRequirement;
pub use loaders::{load_all_candidates, load_job};
pub use match_result::{rank_results, MatchResult, MatchStatus, RecommendationTier};
pub use score_sheet::{ScoreSheet, SkillAnalysis, SkillBreakdown};
pub use summary::{FailureKind, FailureRecord, RunSummary};
