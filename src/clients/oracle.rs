//! 评分服务（Scoring Oracle）接口
//!
//! 评分服务是外部协作方：输入职位文本、候选人文本、维度列表和种子，
//! 返回每个维度的分数和一段说明。返回内容在这里统一做边界校验，
//! 之后的加权计算只接触 [`ScoreSheet`]。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::OracleError;
use crate::models::{CriteriaScores, Criterion, ScoreSheet, SkillAnalysis, SkillBreakdown};
use crate::services::weight_profile::WeightProfile;

/// 单次评分请求
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub job_text: String,
    pub candidate_text: String,
    pub criteria: Vec<Criterion>,
    /// 由 (职位, 候选人, 权重摘要) 派生的确定性种子
    pub seed: i64,
    /// 仅用于提示词中说明各维度的重要程度
    pub weights: WeightProfile,
}

/// 评分服务的原始返回，尚未校验
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScoreSheet {
    pub scores: BTreeMap<String, Value>,
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    /// 以下为可选的分析内容，缺失不影响评分
    #[serde(default)]
    pub score_explanations: BTreeMap<String, String>,
    #[serde(default)]
    pub skill_breakdown: BTreeMap<String, SkillBreakdown>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl RawScoreSheet {
    /// 边界校验
    ///
    /// - 维度键接受标准键和旧别名，两者同时出现时只看标准键，未知键忽略
    /// - 数值（或数字字符串）截断到 [0, 100] 并取整
    /// - 非数值或缺少任一维度 → `MalformedScore`，不会用 0 代替
    pub fn validate(self) -> Result<ScoreSheet, OracleError> {
        let mut pairs = Vec::with_capacity(Criterion::ALL.len());
        for criterion in Criterion::ALL {
            let Some((key, value)) = lookup(&self.scores, criterion) else {
                continue;
            };
            let score = numeric_score(value).ok_or_else(|| {
                OracleError::malformed(format!("维度 {} 的分数不是数值: {}", key, value))
            })?;
            pairs.push((criterion, score));
        }

        let scores = CriteriaScores::from_pairs(pairs).map_err(|missing| {
            let keys: Vec<&str> = missing.iter().map(|c| c.key()).collect();
            OracleError::malformed(format!("缺少维度: {}", keys.join(", ")))
        })?;

        let analysis = SkillAnalysis {
            score_explanations: by_criterion(&self.score_explanations),
            skill_breakdown: by_criterion(&self.skill_breakdown),
            recommendations: self.recommendations,
        };

        Ok(ScoreSheet {
            scores,
            narrative: self.narrative,
            strengths: self.strengths,
            concerns: self.concerns,
            analysis,
        })
    }
}

/// 按维度取值，标准键优先于别名
fn lookup<'a, V>(map: &'a BTreeMap<String, V>, criterion: Criterion) -> Option<(&'a str, &'a V)> {
    std::iter::once(criterion.key())
        .chain(criterion.aliases().iter().copied())
        .find_map(|key| map.get_key_value(key))
        .map(|(key, value)| (key.as_str(), value))
}

fn by_criterion<V: Clone>(map: &BTreeMap<String, V>) -> BTreeMap<Criterion, V> {
    Criterion::ALL
        .into_iter()
        .filter_map(|c| lookup(map, c).map(|(_, value)| (c, value.clone())))
        .collect()
}

fn numeric_score(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.clamp(0.0, 100.0).round() as u8)
}

/// 评分服务
///
/// 实现方只负责一次调用；超时、重试和并发控制由 workflow / orchestrator 负责。
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn score(&self, request: &OracleRequest) -> Result<RawScoreSheet, OracleError>;
}
