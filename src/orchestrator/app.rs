//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、初始化报告文件、创建进程级 `ScoringLimiter`
//! 2. **加载输入**：读取 `job.toml` 和 `candidates/` 下的候选人档案
//! 3. **运行匹配**：Ctrl-C 触发取消，已派发的调用排空后丢弃结果
//! 4. **输出**：按匹配度排序输出结果和统计
//!
//! ## 输入目录结构
//!
//! ```text
//! input/
//! ├── job.toml
//! └── candidates/
//!     ├── alice.toml
//!     └── bob.toml
//! ```

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::clients::{OpenAiOracle, ScoringOracle};
use crate::config::Config;
use crate::error::FileError;
use crate::infrastructure::{MatchStore, MemoryMatchStore, ScoringLimiter};
use crate::models::{load_all_candidates, load_job, rank_results};
use crate::orchestrator::matching_engine::{MatchingEngine, RunOptions};
use crate::services::WeightProfile;
use crate::utils::logging::{
    append_report, init_log_file, log_results, log_run_start, log_startup, print_final_stats,
};

/// 应用主结构
pub struct App {
    config: Config,
    limiter: Arc<ScoringLimiter>,
    engine: MatchingEngine,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        // 初始化报告文件
        init_log_file(&config.output_log_file)?;

        log_startup(
            config.max_in_flight_calls,
            &config.llm_model_name,
            &config.weight_preset,
        );

        // 进程内唯一的限流器，所有运行共享
        let limiter = Arc::new(ScoringLimiter::new(config.max_in_flight_calls));
        let oracle: Arc<dyn ScoringOracle> = Arc::new(OpenAiOracle::new(&config));
        let store: Arc<dyn MatchStore> = Arc::new(MemoryMatchStore::new());
        let engine = MatchingEngine::from_config(&config, oracle, limiter.clone(), store);

        Ok(Self {
            config,
            limiter,
            engine,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let input = Path::new(&self.config.input_folder);
        let job_path = input.join("job.toml");
        if !job_path.exists() {
            return Err(FileError::NotFound {
                path: job_path.display().to_string(),
            }
            .into());
        }

        let job = load_job(&job_path).await?;
        let candidates_dir = input.join("candidates");
        let candidates = load_all_candidates(&candidates_dir.to_string_lossy()).await?;

        if candidates.is_empty() {
            warn!("⚠️ 没有找到候选人档案，程序结束");
            return Ok(());
        }

        let weights = WeightProfile::preset(&self.config.weight_preset)?;
        log_run_start(&job.title, &job.id, candidates.len());

        let cancel = CancellationToken::new();
        let ctrl_c = tokio::spawn({
            let token = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("⚠️ 收到中断信号，停止派发新的评分调用");
                    token.cancel();
                }
            }
        });

        let options = RunOptions {
            prioritize_recent: self.config.prioritize_recent,
            strict_match_mode: self.config.strict_match_mode,
        };
        let run = self
            .engine
            .run_matching(
                &job,
                &candidates,
                &weights,
                self.config.min_match_percentage,
                options,
                &cancel,
            )
            .await;
        ctrl_c.abort();
        let run = run?;

        let mut results = run.results;
        rank_results(&mut results);
        log_results(&results);
        append_report(&self.config.output_log_file, &results, &run.summary)?;

        let stats = self.engine.stats(&job.tenant_id).await?;
        print_final_stats(
            &run.summary,
            &stats,
            self.limiter.calls_made(),
            &self.config.output_log_file,
        );

        Ok(())
    }
}
