//! 候选人评分流程 - 流程层
//!
//! 核心职责：定义"一个候选人"的完整评分流程
//!
//! 流程顺序：
//! 1. 调用评分服务（单次调用有超时）
//! 2. 瞬时错误（超时 / 不可用）按指数退避重试
//! 3. 返回内容做边界校验，格式错误不重试

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::{OracleRequest, ScoringOracle};
use crate::config::Config;
use crate::error::OracleError;
use crate::infrastructure::ScoringLimiter;
use crate::models::ScoreSheet;
use crate::workflow::candidate_ctx::CandidateCtx;

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（包含第一次）
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_backoff: Duration::from_millis(config.backoff_base_ms),
            max_backoff: Duration::from_millis(config.backoff_max_ms),
        }
    }

    /// 第 `attempt` 次失败后的等待时间：`base * 2^(attempt-1)`，不超过上限
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        self.base_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

/// 候选人评分流程
///
/// - 编排一次评分的超时、重试和校验
/// - 不持有并发许可（由编排层在外部持有）
/// - 只处理单个候选人，不出现 Vec<CandidateProfile>
pub struct CandidateFlow {
    oracle: Arc<dyn ScoringOracle>,
    limiter: Arc<ScoringLimiter>,
    retry: RetryPolicy,
    call_timeout: Duration,
}

impl CandidateFlow {
    pub fn new(
        oracle: Arc<dyn ScoringOracle>,
        limiter: Arc<ScoringLimiter>,
        retry: RetryPolicy,
        call_timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            limiter,
            retry,
            call_timeout,
        }
    }

    pub fn limiter(&self) -> &Arc<ScoringLimiter> {
        &self.limiter
    }

    pub async fn run(
        &self,
        ctx: &CandidateCtx,
        request: &OracleRequest,
    ) -> Result<ScoreSheet, OracleError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.call_once(request).await {
                Ok(sheet) => {
                    debug!("{} ✓ 第 {} 次调用成功", ctx, attempt);
                    return Ok(sheet);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let wait = self.retry.backoff(attempt);
                    warn!(
                        "{} ⚠️ 第 {}/{} 次调用失败: {}，{} ms 后重试",
                        ctx,
                        attempt,
                        max_attempts,
                        e,
                        wait.as_millis()
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!("{} ❌ 评分失败（第 {} 次调用）: {}", ctx, attempt, e);
                    return Err(e);
                }
            }
        }
    }

    async fn call_once(&self, request: &OracleRequest) -> Result<ScoreSheet, OracleError> {
        self.limiter.record_call();

        let raw = tokio::time::timeout(self.call_timeout, self.oracle.score(request))
            .await
            .map_err(|_| OracleError::Timeout {
                timeout_ms: self.call_timeout.as_millis() as u64,
            })??;

        raw.validate()
    }
}
