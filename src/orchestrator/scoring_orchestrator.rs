//! 并发评分调度器 - 编排层
//!
//! ## 职责
//!
//! 为预筛选后的每个候选人派发一次评分流程：
//!
//! 1. **派发前检查取消**：取消后不再派发新的调用
//! 2. **并发控制**：等待进程级 `ScoringLimiter` 的许可，等待本身也可被取消打断
//! 3. **任务隔离**：每个候选人一个 `tokio::spawn` 任务，单个失败不影响整批
//! 4. **排空**：已派发的任务全部等待完成，结果是否保留由调用方决定

use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::clients::OracleRequest;
use crate::error::OracleError;
use crate::infrastructure::ScoringLimiter;
use crate::models::{CandidateProfile, Criterion, FailureKind, FailureRecord, JobRequirement, ScoreSheet};
use crate::services::seed::derive_seed;
use crate::services::weight_profile::WeightProfile;
use crate::workflow::{CandidateCtx, CandidateFlow};

/// 一次评分阶段的结果（顺序不保证）
#[derive(Debug, Default)]
pub struct ScoringOutcome {
    /// 成功评分的 (候选人ID, 评分)
    pub scored: Vec<(String, ScoreSheet)>,
    pub failures: Vec<FailureRecord>,
    /// 实际派发的候选人数
    pub dispatched: usize,
    /// 运行期间收到取消信号
    pub cancelled: bool,
}

pub struct ScoringOrchestrator {
    flow: Arc<CandidateFlow>,
}

impl ScoringOrchestrator {
    pub fn new(flow: CandidateFlow) -> Self {
        Self {
            flow: Arc::new(flow),
        }
    }

    pub fn limiter(&self) -> &Arc<ScoringLimiter> {
        self.flow.limiter()
    }

    /// 对所有候选人并发评分
    pub async fn score(
        &self,
        run_id: Uuid,
        job: &JobRequirement,
        candidates: &[CandidateProfile],
        weights: &WeightProfile,
        cancel: &CancellationToken,
    ) -> ScoringOutcome {
        let mut outcome = ScoringOutcome::default();
        let total = candidates.len();
        let job_text = job.job_text();
        let mut handles = Vec::with_capacity(total);

        for (idx, candidate) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    outcome.cancelled = true;
                    break;
                }
                permit = self.limiter().acquire() => match permit {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("[候选人 {}] 获取并发许可失败: {}", candidate.id, e);
                        outcome.failures.push(FailureRecord::from_error(
                            candidate.id.clone(),
                            &OracleError::unavailable(e.to_string()),
                        ));
                        continue;
                    }
                },
            };

            let ctx = CandidateCtx::new(run_id, job.id.clone(), candidate.id.clone(), idx + 1, total);
            let request = OracleRequest {
                job_text: job_text.clone(),
                candidate_text: candidate.candidate_text(),
                criteria: Criterion::ALL.to_vec(),
                seed: derive_seed(&job.id, &candidate.id, weights),
                weights: *weights,
            };
            debug!("{} 派发评分任务, seed: {}", ctx, request.seed);

            let flow = Arc::clone(&self.flow);
            let handle = tokio::spawn(async move {
                let _permit = permit;
                flow.run(&ctx, &request).await
            });
            handles.push((candidate.id.clone(), handle));
        }

        outcome.dispatched = handles.len();
        if outcome.cancelled {
            info!(
                "⏹️ 运行已取消，已派发 {}/{} 个评分任务，等待在途调用结束",
                outcome.dispatched, total
            );
        }

        let (ids, tasks): (Vec<String>, Vec<_>) = handles.into_iter().unzip();
        for (candidate_id, joined) in ids.into_iter().zip(join_all(tasks).await) {
            match joined {
                Ok(Ok(sheet)) => outcome.scored.push((candidate_id, sheet)),
                Ok(Err(e)) => outcome
                    .failures
                    .push(FailureRecord::from_error(candidate_id, &e)),
                Err(e) => {
                    error!("[候选人 {}] 任务执行失败: {}", candidate_id, e);
                    outcome.failures.push(FailureRecord {
                        candidate_id,
                        kind: FailureKind::Unavailable,
                        reason: format!("任务执行失败: {}", e),
                    });
                }
            }
        }

        // 在途调用排空期间收到的取消同样生效
        if cancel.is_cancelled() {
            outcome.cancelled = true;
        }

        outcome
    }
}
