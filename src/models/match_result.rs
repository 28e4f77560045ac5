use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::criteria::{CriteriaScores, WeightedScores};
use super::score_sheet::SkillAnalysis;

/// 推荐等级（相对于同一批次计算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Best,
    AboveAverage,
    Average,
    BelowAverage,
    Poor,
}

impl RecommendationTier {
    pub fn label(self) -> &'static str {
        match self {
            RecommendationTier::Best => "最佳匹配",
            RecommendationTier::AboveAverage => "高于平均",
            RecommendationTier::Average => "平均水平",
            RecommendationTier::BelowAverage => "低于平均",
            RecommendationTier::Poor => "匹配较差",
        }
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 匹配结果的处理状态
///
/// `Pending → Reviewed → {InterviewScheduled, Rejected}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Reviewed,
    InterviewScheduled,
    Rejected,
}

impl MatchStatus {
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (MatchStatus::Pending, MatchStatus::Reviewed)
                | (MatchStatus::Reviewed, MatchStatus::InterviewScheduled)
                | (MatchStatus::Reviewed, MatchStatus::Rejected)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Reviewed => "reviewed",
            MatchStatus::InterviewScheduled => "interview_scheduled",
            MatchStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// 一次运行中某个候选人的匹配结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: Uuid,
    pub candidate_id: String,
    pub job_id: String,
    pub run_id: Uuid,
    pub tenant_id: String,
    pub criteria_scores: CriteriaScores,
    pub weighted_scores: WeightedScores,
    /// 综合匹配度，保留一位小数
    pub match_percentage: f64,
    pub reasoning: String,
    pub tier: RecommendationTier,
    pub status: MatchStatus,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    /// 各维度的评分理由、技能拆解和建议
    #[serde(default)]
    pub skill_analysis: SkillAnalysis,
    pub created_at: DateTime<Utc>,
}

/// 按匹配度降序排列（同分按候选人 ID 升序）
pub fn rank_results(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        b.match_percentage
            .total_cmp(&a.match_percentage)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
}
