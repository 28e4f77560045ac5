//! 权重配置 - 业务能力层
//!
//! 只负责"校验五项权重"能力：每项在 [0, 100]，总和严格等于 100。

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::InvalidWeightsError;
use crate::models::Criterion;

/// 五项评分维度的权重（整数百分比）
///
/// 字段使用 `i32`，以便表示用户输入中的越界值；
/// 在开始评分之前必须通过 [`WeightProfile::validate`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightProfile {
    pub skills: i32,
    pub experience: i32,
    pub keyword_relevance: i32,
    pub technical_depth: i32,
    pub domain_experience: i32,
}

/// 预设权重（均已满足总和为 100）
const PRESETS: [(&str, WeightProfile); 5] = [
    ("Default", WeightProfile::new(25, 15, 25, 15, 20)),
    ("Balanced", WeightProfile::new(20, 20, 20, 20, 20)),
    ("Technical Focus", WeightProfile::new(35, 10, 20, 25, 10)),
    ("Experience Heavy", WeightProfile::new(20, 35, 15, 10, 20)),
    ("Keyword Recency Focus", WeightProfile::new(20, 10, 40, 10, 20)),
];

impl WeightProfile {
    pub const fn new(
        skills: i32,
        experience: i32,
        keyword_relevance: i32,
        technical_depth: i32,
        domain_experience: i32,
    ) -> Self {
        Self {
            skills,
            experience,
            keyword_relevance,
            technical_depth,
            domain_experience,
        }
    }

    pub fn get(&self, criterion: Criterion) -> i32 {
        match criterion {
            Criterion::Skills => self.skills,
            Criterion::Experience => self.experience,
            Criterion::KeywordRelevance => self.keyword_relevance,
            Criterion::TechnicalDepth => self.technical_depth,
            Criterion::DomainExperience => self.domain_experience,
        }
    }

    pub fn sum(&self) -> i32 {
        Criterion::ALL.into_iter().map(|c| self.get(c)).sum()
    }

    /// 校验权重
    ///
    /// 先按固定顺序检查单项范围，再检查总和
    pub fn validate(&self) -> Result<(), InvalidWeightsError> {
        for criterion in Criterion::ALL {
            let value = self.get(criterion);
            if !(0..=100).contains(&value) {
                return Err(InvalidWeightsError::OutOfRange { criterion, value });
            }
        }

        let sum = self.sum();
        if sum != 100 {
            return Err(InvalidWeightsError::SumMismatch { sum });
        }

        Ok(())
    }

    /// 按名称查找预设（不区分大小写）
    pub fn preset(name: &str) -> Result<Self, InvalidWeightsError> {
        PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name.trim()))
            .map(|(_, weights)| *weights)
            .ok_or_else(|| InvalidWeightsError::UnknownPreset {
                name: name.to_string(),
            })
    }

    /// 所有预设
    pub fn presets() -> impl Iterator<Item = (&'static str, WeightProfile)> {
        PRESETS.into_iter()
    }

    /// 权重摘要（用于派生确定性种子）
    pub fn digest(&self) -> String {
        let canonical = Criterion::ALL
            .into_iter()
            .map(|c| format!("{}={}", c.key(), self.get(c)))
            .collect::<Vec<_>>()
            .join(";");
        let hash = Sha256::digest(canonical.as_bytes());
        hash.iter().take(8).map(|b| format!("{:02x}", b)).collect()
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        PRESETS[0].1
    }
}
