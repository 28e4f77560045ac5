//! 候选人评分上下文
//!
//! 封装"我正在为哪次运行、哪个职位的哪个候选人评分"这一信息

use std::fmt::Display;
use uuid::Uuid;

/// 候选人评分上下文
#[derive(Debug, Clone)]
pub struct CandidateCtx {
    pub run_id: Uuid,
    pub job_id: String,
    pub candidate_id: String,
    /// 候选人在本次运行中的序号（从1开始，仅用于日志显示）
    pub index: usize,
    /// 本次运行需要评分的人数（仅用于日志显示）
    pub total: usize,
}

impl CandidateCtx {
    pub fn new(
        run_id: Uuid,
        job_id: impl Into<String>,
        candidate_id: impl Into<String>,
        index: usize,
        total: usize,
    ) -> Self {
        Self {
            run_id,
            job_id: job_id.into(),
            candidate_id: candidate_id.into(),
            index,
            total,
        }
    }
}

impl Display for CandidateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[职位 {} 候选人 {} ({}/{})]",
            self.job_id, self.candidate_id, self.index, self.total
        )
    }
}
