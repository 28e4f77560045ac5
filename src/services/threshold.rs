//! 阈值过滤 - 业务能力层
//!
//! 保留 `match_percentage >= min_match_percentage` 的结果（边界包含）。
//! 严格模式下，任一子分数低于下限的结果同样被丢弃。
//! 被过滤不是错误，只体现在统计数量中。

use crate::models::{CriteriaScores, MatchResult};
use crate::services::aggregator::AggregatedCandidate;

/// 浮点表示误差容差
const TOLERANCE: f64 = 1e-9;

/// 可参与阈值过滤的结果
pub trait Scored {
    fn match_percentage(&self) -> f64;
    fn criteria_scores(&self) -> &CriteriaScores;
}

impl Scored for AggregatedCandidate {
    fn match_percentage(&self) -> f64 {
        self.match_percentage
    }

    fn criteria_scores(&self) -> &CriteriaScores {
        &self.sheet.scores
    }
}

impl Scored for MatchResult {
    fn match_percentage(&self) -> f64 {
        self.match_percentage
    }

    fn criteria_scores(&self) -> &CriteriaScores {
        &self.criteria_scores
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdFilter {
    pub min_match_percentage: f64,
    /// 严格模式下每项子分数的下限；`None` 表示不启用严格模式
    pub strict_floor: Option<u8>,
}

impl ThresholdFilter {
    pub fn new(min_match_percentage: f64) -> Self {
        Self {
            min_match_percentage,
            strict_floor: None,
        }
    }

    pub fn strict(min_match_percentage: f64, floor: u8) -> Self {
        Self {
            min_match_percentage,
            strict_floor: Some(floor),
        }
    }

    /// 单个结果是否保留
    pub fn accepts<T: Scored>(&self, item: &T) -> bool {
        if item.match_percentage() + TOLERANCE < self.min_match_percentage {
            return false;
        }
        match self.strict_floor {
            Some(floor) => item.criteria_scores().min_score() >= floor,
            None => true,
        }
    }

    /// 过滤，返回 (保留的结果, 被丢弃的数量)
    pub fn filter<T: Scored>(&self, items: Vec<T>) -> (Vec<T>, usize) {
        let total = items.len();
        let kept: Vec<T> = items.into_iter().filter(|item| self.accepts(item)).collect();
        let dropped = total - kept.len();
        (kept, dropped)
    }
}
