//! 推荐等级与说明 - 业务能力层
//!
//! 等级相对于当前批次计算，而不是绝对分数：
//! - 批次极差不超过 5 分时，所有人都是最佳匹配
//! - 距最高分 5 分以内为最佳匹配，距最低分 5 分以内为匹配较差
//! - 中间区间三等分，自上而下为高于平均、平均水平、低于平均
//!
//! 批次组成变化后必须重新计算（见 [`retier`]）。

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Criterion, MatchResult, MatchStatus, RecommendationTier};
use crate::services::aggregator::AggregatedCandidate;

/// 顶部/底部区间宽度，也是"全员最佳"的极差上限
pub const TIER_BAND: f64 = 5.0;

/// 根据批次分布计算每个分数的等级（纯函数，输出与输入一一对应）
pub fn assign_tiers(percentages: &[f64]) -> Vec<RecommendationTier> {
    let Some((min, max)) = bounds(percentages) else {
        return Vec::new();
    };

    if max - min <= TIER_BAND {
        return vec![RecommendationTier::Best; percentages.len()];
    }

    let top = max - TIER_BAND;
    let bottom = min + TIER_BAND;
    let width = (top - bottom).max(0.0) / 3.0;

    percentages
        .iter()
        .map(|&p| {
            if p >= top {
                RecommendationTier::Best
            } else if p <= bottom {
                RecommendationTier::Poor
            } else if p >= top - width {
                RecommendationTier::AboveAverage
            } else if p >= top - 2.0 * width {
                RecommendationTier::Average
            } else {
                RecommendationTier::BelowAverage
            }
        })
        .collect()
}

fn bounds(percentages: &[f64]) -> Option<(f64, f64)> {
    let mut iter = percentages.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

/// 当前运行的上下文信息
#[derive(Debug, Clone)]
pub struct RunStamp {
    pub run_id: Uuid,
    pub job_id: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
}

pub struct ReasoningComposer;

impl ReasoningComposer {
    /// 为整批结果分级并生成说明
    pub fn compose(batch: Vec<AggregatedCandidate>, stamp: &RunStamp) -> Vec<MatchResult> {
        let percentages: Vec<f64> = batch.iter().map(|c| c.match_percentage).collect();
        let tiers = assign_tiers(&percentages);
        let (min, max) = bounds(&percentages).unwrap_or((0.0, 0.0));

        batch
            .into_iter()
            .zip(tiers)
            .map(|(candidate, tier)| {
                let reasoning = compose_narrative(&candidate, tier, min, max);
                MatchResult {
                    id: Uuid::new_v4(),
                    candidate_id: candidate.candidate_id,
                    job_id: stamp.job_id.clone(),
                    run_id: stamp.run_id,
                    tenant_id: stamp.tenant_id.clone(),
                    criteria_scores: candidate.sheet.scores,
                    weighted_scores: candidate.weighted_scores,
                    match_percentage: candidate.match_percentage,
                    reasoning,
                    tier,
                    status: MatchStatus::Pending,
                    strengths: candidate.sheet.strengths,
                    concerns: candidate.sheet.concerns,
                    skill_analysis: candidate.sheet.analysis,
                    created_at: stamp.created_at,
                }
            })
            .collect()
    }
}

/// 批次组成变化后重新计算等级
pub fn retier(results: &mut [MatchResult]) {
    let percentages: Vec<f64> = results.iter().map(|r| r.match_percentage).collect();
    for (result, tier) in results.iter_mut().zip(assign_tiers(&percentages)) {
        result.tier = tier;
    }
}

fn compose_narrative(
    candidate: &AggregatedCandidate,
    tier: RecommendationTier,
    batch_min: f64,
    batch_max: f64,
) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "【{}】综合匹配度 {:.1}%（本批最高 {:.1}%，最低 {:.1}%）",
        tier, candidate.match_percentage, batch_max, batch_min
    ));

    let narrative = candidate.sheet.narrative.trim();
    if !narrative.is_empty() {
        lines.push(narrative.to_string());
    }

    let breakdown: Vec<String> = Criterion::ALL
        .into_iter()
        .map(|c| {
            format!(
                "{} {} 分 → {:.1}",
                c.label(),
                candidate.sheet.scores.get(c),
                candidate.weighted_scores.get(c)
            )
        })
        .collect();
    lines.push(format!("评分明细: {}", breakdown.join("；")));

    if !candidate.sheet.strengths.is_empty() {
        lines.push(format!("优势: {}", candidate.sheet.strengths.join("、")));
    }
    if !candidate.sheet.concerns.is_empty() {
        lines.push(format!("顾虑: {}", candidate.sheet.concerns.join("、")));
    }

    let analysis = &candidate.sheet.analysis;
    for criterion in Criterion::ALL {
        let explanation = analysis.score_explanations.get(&criterion);
        let breakdown = analysis.skill_breakdown.get(&criterion);
        if explanation.is_none() && breakdown.is_none() {
            continue;
        }

        let mut line = format!("- {}", criterion.label());
        if let Some(explanation) = explanation {
            line.push_str(&format!(": {}", explanation.trim()));
        }
        if let Some(breakdown) = breakdown {
            if !breakdown.has.is_empty() {
                line.push_str(&format!("（已具备: {}）", breakdown.has.join("、")));
            }
            if !breakdown.missing.is_empty() {
                line.push_str(&format!("（欠缺: {}）", breakdown.missing.join("、")));
            }
        }
        lines.push(line);
    }
    if !analysis.recommendations.is_empty() {
        lines.push(format!("建议: {}", analysis.recommendations.join("；")));
    }

    lines.push(format!(
        "匹配计算: {:.1}% (加权求和)",
        candidate.match_percentage
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CriteriaScores, ScoreSheet, SkillAnalysis, SkillBreakdown};
    use crate::services::weight_profile::WeightProfile;
    use RecommendationTier::*;

    #[test]
    fn narrow_range_labels_everyone_best() {
        assert_eq!(assign_tiers(&[70.0, 72.5, 75.0]), vec![Best, Best, Best]);
        assert_eq!(assign_tiers(&[42.0]), vec![Best]);
        assert!(assign_tiers(&[]).is_empty());
    }

    #[test]
    fn wide_range_uses_five_bands() {
        // max 95, min 5 → top ≥ 90, bottom ≤ 10, middle (10, 90) 三等分，每段 26.67
        let tiers = assign_tiers(&[95.0, 90.0, 80.0, 55.0, 30.0, 10.0, 5.0]);
        assert_eq!(
            tiers,
            vec![Best, Best, AboveAverage, Average, BelowAverage, Poor, Poor]
        );
    }

    #[test]
    fn overlapping_bands_prefer_best() {
        // 极差 8：顶部区间 [55, 60]，底部区间 [52, 57]，重叠部分归为最佳
        assert_eq!(assign_tiers(&[60.0, 56.0, 52.0]), vec![Best, Best, Poor]);
        assert_eq!(assign_tiers(&[60.0, 51.0]), vec![Best, Poor]);
    }

    #[test]
    fn tiers_depend_on_batch_not_absolute_score() {
        let alone = assign_tiers(&[60.0, 58.0]);
        let with_stronger = assign_tiers(&[60.0, 58.0, 95.0]);
        assert_eq!(alone[0], Best);
        assert_eq!(with_stronger[0], Poor);
    }

    fn aggregated(id: &str, score: u8) -> AggregatedCandidate {
        AggregatedCandidate::new(
            id,
            ScoreSheet {
                scores: CriteriaScores::uniform(score),
                narrative: "熟悉分布式系统".into(),
                strengths: vec!["Rust".into()],
                concerns: vec![],
                analysis: SkillAnalysis::default(),
            },
            &WeightProfile::default(),
        )
    }

    fn stamp() -> RunStamp {
        RunStamp {
            run_id: Uuid::new_v4(),
            job_id: "job-1".into(),
            tenant_id: "t1".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn compose_builds_pending_results_with_narrative() {
        let stamp = stamp();
        let results =
            ReasoningComposer::compose(vec![aggregated("a", 90), aggregated("b", 20)], &stamp);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].tier, Best);
        assert_eq!(results[1].tier, Poor);
        assert!(results.iter().all(|r| r.status == MatchStatus::Pending));
        assert!(results.iter().all(|r| r.run_id == stamp.run_id));
        assert!(results[0].reasoning.contains("熟悉分布式系统"));
        assert!(results[0].reasoning.contains("优势: Rust"));
        assert!(!results[0].reasoning.contains("顾虑"));
        assert!(results[0].reasoning.ends_with("匹配计算: 90.0% (加权求和)"));
    }

    #[test]
    fn compose_renders_skill_analysis() {
        let mut candidate = aggregated("a", 80);
        candidate.sheet.analysis = SkillAnalysis {
            score_explanations: [(Criterion::Skills, "Rust 项目经验丰富".to_string())].into(),
            skill_breakdown: [(
                Criterion::Skills,
                SkillBreakdown {
                    has: vec!["rust".into(), "tokio".into()],
                    missing: vec!["kafka".into()],
                },
            )]
            .into(),
            recommendations: vec!["面试时考察消息队列".into()],
        };

        let results = ReasoningComposer::compose(vec![candidate], &stamp());
        let reasoning = &results[0].reasoning;
        assert!(reasoning.contains("- 技能匹配: Rust 项目经验丰富（已具备: rust、tokio）（欠缺: kafka）"));
        assert!(reasoning.contains("建议: 面试时考察消息队列"));
        assert!(!reasoning.contains("- 领域经验"));
        assert_eq!(
            results[0].skill_analysis.skill_breakdown[&Criterion::Skills].missing,
            vec!["kafka".to_string()]
        );
    }

    #[test]
    fn retier_recomputes_after_batch_changes() {
        let stamp = stamp();
        let mut results =
            ReasoningComposer::compose(vec![aggregated("a", 90), aggregated("b", 20)], &stamp);
        assert_eq!(results[1].tier, Poor);

        results.remove(0);
        retier(&mut results);
        assert_eq!(results[0].tier, Best);
    }
}
