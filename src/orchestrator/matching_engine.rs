//! 匹配引擎 - 编排层
//!
//! 对外暴露的核心接口：
//! - `run_matching`: 权重校验 → 预筛选 → 并发评分 → 加权汇总 → 阈值过滤 → 分级与说明 → 保存
//! - `clear_matches`: 删除租户的所有匹配结果
//!
//! 只有权重和阈值参数错误会让整次运行失败；单个候选人的评分失败
//! 和保存失败只体现在 `RunSummary` 中。

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clients::ScoringOracle;
use crate::config::Config;
use crate::error::{AppError, AppResult, StoreError};
use crate::infrastructure::{MatchStats, MatchStore, ScoringLimiter};
use crate::models::{CandidateProfile, JobRequirement, MatchResult, MatchStatus, RunSummary};
use crate::orchestrator::scoring_orchestrator::ScoringOrchestrator;
use crate::services::{
    AggregatedCandidate, CandidatePreFilter, PreFilterConfig, ReasoningComposer, RunStamp,
    ThresholdFilter, WeightProfile,
};
use crate::workflow::{CandidateFlow, RetryPolicy};

/// 单次运行的选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// 预筛选时偏向最近更新过的候选人
    pub prioritize_recent: bool,
    /// 任一子分数低于下限即丢弃
    pub strict_match_mode: bool,
}

/// 引擎级设置（跨运行不变）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub prefilter: PreFilterConfig,
    /// 严格模式下的子分数下限
    pub strict_floor: u8,
    /// 保存前删除同一职位的旧结果
    pub supersede_previous: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            prefilter: PreFilterConfig::default(),
            strict_floor: 40,
            supersede_previous: true,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefilter: config.prefilter_config(),
            strict_floor: config.strict_criterion_floor,
            supersede_previous: config.supersede_previous,
        }
    }
}

/// 一次运行的输出；`results` 无序，展示前用 `rank_results` 排序
#[derive(Debug, Clone)]
pub struct MatchRun {
    pub results: Vec<MatchResult>,
    pub summary: RunSummary,
}

pub struct MatchingEngine {
    orchestrator: ScoringOrchestrator,
    prefilter: CandidatePreFilter,
    store: Arc<dyn MatchStore>,
    settings: EngineSettings,
}

impl MatchingEngine {
    pub fn new(
        orchestrator: ScoringOrchestrator,
        store: Arc<dyn MatchStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            orchestrator,
            prefilter: CandidatePreFilter::new(settings.prefilter),
            store,
            settings,
        }
    }

    /// 按配置组装引擎；`limiter` 由调用方在进程启动时创建并在所有引擎间共享
    pub fn from_config(
        config: &Config,
        oracle: Arc<dyn ScoringOracle>,
        limiter: Arc<ScoringLimiter>,
        store: Arc<dyn MatchStore>,
    ) -> Self {
        let flow = CandidateFlow::new(
            oracle,
            limiter,
            RetryPolicy::from_config(config),
            Duration::from_secs(config.call_timeout_secs),
        );
        Self::new(
            ScoringOrchestrator::new(flow),
            store,
            EngineSettings::from_config(config),
        )
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn limiter(&self) -> &Arc<ScoringLimiter> {
        self.orchestrator.limiter()
    }

    /// 对一个职位运行一次匹配
    pub async fn run_matching(
        &self,
        job: &JobRequirement,
        candidates: &[CandidateProfile],
        weights: &WeightProfile,
        min_match_percentage: f64,
        options: RunOptions,
        cancel: &CancellationToken,
    ) -> AppResult<MatchRun> {
        // 参数校验在任何评分调用之前
        weights.validate()?;
        if !(0.0..=100.0).contains(&min_match_percentage) {
            return Err(AppError::invalid_input(format!(
                "最低匹配度 {} 超出范围 [0, 100]",
                min_match_percentage
            )));
        }

        let run_id = Uuid::new_v4();
        let mut summary = RunSummary::new(run_id, candidates.len());
        info!(
            "🎯 [职位 {}] 开始匹配 run={}，候选人 {} 个，最低匹配度 {:.1}%",
            job.id,
            run_id,
            candidates.len(),
            min_match_percentage
        );

        if cancel.is_cancelled() {
            info!("⏹️ [职位 {}] 运行在开始前已取消", job.id);
            summary.cancelled = true;
            return Ok(MatchRun {
                results: Vec::new(),
                summary,
            });
        }

        // ========== 预筛选 ==========
        let survivors = self
            .prefilter
            .filter(candidates, job, options.prioritize_recent, Utc::now());
        summary.prefiltered_out = candidates.len() - survivors.len();
        if summary.prefiltered_out > 0 {
            info!(
                "🔎 预筛选保留 {}/{} 个候选人",
                survivors.len(),
                candidates.len()
            );
        }

        // ========== 并发评分 ==========
        let outcome = self
            .orchestrator
            .score(run_id, job, &survivors, weights, cancel)
            .await;
        for failure in outcome.failures {
            summary.record_failure(failure);
        }

        if outcome.cancelled || cancel.is_cancelled() {
            warn!(
                "⏹️ [职位 {}] 运行已取消，丢弃 {} 个评分结果",
                job.id,
                outcome.scored.len()
            );
            summary.cancelled = true;
            return Ok(MatchRun {
                results: Vec::new(),
                summary,
            });
        }

        // ========== 加权汇总 ==========
        let aggregated: Vec<AggregatedCandidate> = outcome
            .scored
            .into_iter()
            .map(|(candidate_id, sheet)| AggregatedCandidate::new(candidate_id, sheet, weights))
            .collect();
        summary.scored = aggregated.len();
        // 本次真正重新评分的候选人，覆盖旧结果时只动这些人
        let rescored: Vec<String> = aggregated
            .iter()
            .map(|c| c.candidate_id.clone())
            .collect();

        // ========== 阈值过滤 ==========
        let filter = if options.strict_match_mode {
            ThresholdFilter::strict(min_match_percentage, self.settings.strict_floor)
        } else {
            ThresholdFilter::new(min_match_percentage)
        };
        let (kept, dropped) = filter.filter(aggregated);
        summary.filtered_by_threshold = dropped;

        // ========== 分级与说明 ==========
        let stamp = RunStamp {
            run_id,
            job_id: job.id.clone(),
            tenant_id: job.tenant_id.clone(),
            created_at: Utc::now(),
        };
        let results = ReasoningComposer::compose(kept, &stamp);

        // ========== 保存 ==========
        if let Err(e) = self.persist(job, &rescored, &results).await {
            error!("❌ [职位 {}] 保存匹配结果失败: {}", job.id, e);
            summary.persist_error = Some(e.to_string());
        }

        info!(
            "✓ [职位 {}] 匹配完成: 评分 {}，过滤 {}，失败 {}，输出 {}",
            job.id,
            summary.scored,
            summary.filtered_by_threshold,
            summary.failed,
            results.len()
        );

        Ok(MatchRun { results, summary })
    }

    async fn persist(
        &self,
        job: &JobRequirement,
        rescored: &[String],
        results: &[MatchResult],
    ) -> Result<(), StoreError> {
        if self.settings.supersede_previous {
            let removed = self
                .store
                .replace_for_job(&job.tenant_id, &job.id, rescored, results)
                .await?;
            debug!("替换职位 {} 的旧结果 {} 条", job.id, removed);
        } else {
            self.store.save(results).await?;
        }
        Ok(())
    }

    /// 删除租户的所有匹配结果，返回删除数量
    pub async fn clear_matches(&self, tenant_id: &str) -> AppResult<usize> {
        let removed = self.store.clear_all(tenant_id).await?;
        info!("🧹 [租户 {}] 已清除 {} 条匹配结果", tenant_id, removed);
        Ok(removed)
    }

    /// 查询已保存的结果，按匹配度降序
    pub async fn list_matches(
        &self,
        tenant_id: &str,
        job_id: Option<&str>,
        min_percentage: Option<f64>,
    ) -> AppResult<Vec<MatchResult>> {
        Ok(self.store.list(tenant_id, job_id, min_percentage).await?)
    }

    pub async fn update_status(&self, id: Uuid, status: MatchStatus) -> AppResult<MatchResult> {
        Ok(self.store.update_status(id, status).await?)
    }

    pub async fn stats(&self, tenant_id: &str) -> AppResult<MatchStats> {
        Ok(self.store.stats(tenant_id).await?)
    }
}
