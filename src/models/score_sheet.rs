use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::criteria::{CriteriaScores, Criterion};

/// 某个维度下已具备和欠缺的技能
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBreakdown {
    #[serde(default)]
    pub has: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

/// 按维度的技能分析，评分服务没有给出时为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAnalysis {
    #[serde(default)]
    pub score_explanations: BTreeMap<Criterion, String>,
    #[serde(default)]
    pub skill_breakdown: BTreeMap<Criterion, SkillBreakdown>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl SkillAnalysis {
    pub fn is_empty(&self) -> bool {
        self.score_explanations.is_empty()
            && self.skill_breakdown.is_empty()
            && self.recommendations.is_empty()
    }
}

/// 通过边界校验后的评分服务输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub scores: CriteriaScores,
    pub narrative: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub analysis: SkillAnalysis,
}
