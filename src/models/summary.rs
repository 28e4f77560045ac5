use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::OracleError;

/// 失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Unavailable,
    MalformedScore,
}

impl From<&OracleError> for FailureKind {
    fn from(err: &OracleError) -> Self {
        match err {
            OracleError::Timeout { .. } => FailureKind::Timeout,
            OracleError::Unavailable { .. } => FailureKind::Unavailable,
            OracleError::MalformedScore { .. } => FailureKind::MalformedScore,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Unavailable => "unavailable",
            FailureKind::MalformedScore => "malformed_score",
        };
        f.write_str(s)
    }
}

/// 单个候选人的失败记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub candidate_id: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl FailureRecord {
    pub fn from_error(candidate_id: impl Into<String>, err: &OracleError) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            kind: err.into(),
            reason: err.to_string(),
        }
    }
}

/// 单次运行统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: Uuid,
    /// 输入的候选人总数
    pub considered: usize,
    /// 被预筛选排除的人数
    pub prefiltered_out: usize,
    /// 成功完成评分的人数
    pub scored: usize,
    /// 被阈值（或严格模式）过滤的人数
    pub filtered_by_threshold: usize,
    pub failed: usize,
    pub failures: Vec<FailureRecord>,
    /// 运行被取消，结果未保存
    pub cancelled: bool,
    /// 保存失败的原因；此时存储中该职位的旧结果保持不变
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

impl RunSummary {
    pub fn new(run_id: Uuid, considered: usize) -> Self {
        Self {
            run_id,
            considered,
            ..Default::default()
        }
    }

    pub fn record_failure(&mut self, failure: FailureRecord) {
        self.failed += 1;
        self.failures.push(failure);
    }

    /// 最终输出的结果数量
    pub fn matched(&self) -> usize {
        self.scored.saturating_sub(self.filtered_by_threshold)
    }
}
