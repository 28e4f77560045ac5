//! 加权汇总 - 业务能力层
//!
//! `overall = Σ(score_i * weight_i) / 100`，保留一位小数。
//! 权重总和为 100 且每项分数在 [0, 100]，结果必然落在 [0, 100]。

use crate::models::{CriteriaScores, Criterion, ScoreSheet, WeightedScores};
use crate::services::weight_profile::WeightProfile;

/// 计算综合匹配度
///
/// 调用前权重必须已通过校验
pub fn aggregate(scores: &CriteriaScores, weights: &WeightProfile) -> f64 {
    let total: i64 = Criterion::ALL
        .into_iter()
        .map(|c| i64::from(scores.get(c)) * i64::from(weights.get(c)))
        .sum();

    // total / 100 保留一位小数 = round(total / 10) / 10
    (total as f64 / 10.0).round() / 10.0
}

/// 每项维度的加权贡献
pub fn weighted_contributions(scores: &CriteriaScores, weights: &WeightProfile) -> WeightedScores {
    let part = |c: Criterion| f64::from(scores.get(c)) * f64::from(weights.get(c)) / 100.0;
    WeightedScores {
        skills: part(Criterion::Skills),
        experience: part(Criterion::Experience),
        keyword_relevance: part(Criterion::KeywordRelevance),
        technical_depth: part(Criterion::TechnicalDepth),
        domain_experience: part(Criterion::DomainExperience),
    }
}

/// 已完成加权汇总、尚未分级的候选人
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCandidate {
    pub candidate_id: String,
    pub sheet: ScoreSheet,
    pub weighted_scores: WeightedScores,
    pub match_percentage: f64,
}

impl AggregatedCandidate {
    pub fn new(candidate_id: impl Into<String>, sheet: ScoreSheet, weights: &WeightProfile) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            weighted_scores: weighted_contributions(&sheet.scores, weights),
            match_percentage: aggregate(&sheet.scores, weights),
            sheet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_sum_matches_hand_calculation() {
        let weights = WeightProfile::new(30, 20, 35, 10, 5);
        let scores = CriteriaScores::new(80, 70, 60, 90, 50);
        assert_eq!(aggregate(&scores, &weights), 70.5);
    }

    #[test]
    fn uniform_scores_return_the_score_for_every_preset() {
        for (_, weights) in WeightProfile::presets() {
            for x in [0u8, 1, 37, 50, 99, 100] {
                assert_eq!(aggregate(&CriteriaScores::uniform(x), &weights), f64::from(x));
            }
        }
    }

    #[test]
    fn rounds_to_one_decimal() {
        // 33*33 + 67*67 = 5578 → 55.78 → 55.8
        let weights = WeightProfile::new(33, 67, 0, 0, 0);
        let scores = CriteriaScores::new(33, 67, 0, 0, 0);
        assert_eq!(aggregate(&scores, &weights), 55.8);
    }

    #[test]
    fn result_stays_within_bounds() {
        let weights = WeightProfile::new(100, 0, 0, 0, 0);
        assert_eq!(aggregate(&CriteriaScores::new(100, 0, 0, 0, 0), &weights), 100.0);
        assert_eq!(aggregate(&CriteriaScores::new(0, 100, 100, 100, 100), &weights), 0.0);
    }

    #[test]
    fn contributions_sum_to_overall() {
        let weights = WeightProfile::new(30, 20, 35, 10, 5);
        let scores = CriteriaScores::new(80, 70, 60, 90, 50);
        let parts = weighted_contributions(&scores, &weights);
        assert!((parts.skills - 24.0).abs() < 1e-9);
        assert!((parts.keyword_relevance - 21.0).abs() < 1e-9);
        assert!((parts.total() - 70.5).abs() < 1e-9);
    }
}
