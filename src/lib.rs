//! # Candidate Match
//!
//! 按可配置的五项加权评分，为一个职位对候选人进行匹配和排序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有进程级共享状态，只暴露能力
//! - `ScoringLimiter` - 并发信号量 + 评分调用计数
//! - `MatchStore` - 匹配结果的持久化接口（`MemoryMatchStore` 为进程内实现）
//!
//! ### 外部协作方（Clients）
//! - `clients/` - `ScoringOracle` 评分服务接口及 `OpenAiOracle` 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯函数能力，不关心流程
//! - `WeightProfile` - 权重校验与预设
//! - `CandidatePreFilter` - 启发式预筛选
//! - `aggregator` - 加权汇总
//! - `ThresholdFilter` - 阈值 / 严格模式过滤
//! - `ReasoningComposer` - 批次相对分级与说明
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个候选人"的完整评分流程
//! - `CandidateCtx` - 上下文封装（run_id + job_id + candidate_id）
//! - `CandidateFlow` - 超时 → 重试 → 边界校验
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/scoring_orchestrator` - 并发派发，响应取消
//! - `orchestrator/matching_engine` - `run_matching` / `clear_matches`
//! - `orchestrator/app` - 命令行入口
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{OracleRequest, RawScoreSheet, ScoringOracle};
pub use config::Config;
pub use error::{AppError, AppResult, InvalidWeightsError, OracleError};
pub use infrastructure::{MatchStore, MemoryMatchStore, ScoringLimiter};
pub use models::{CandidateProfile, JobRequirement, MatchResult, RunSummary};
pub use orchestrator::{App, MatchRun, MatchingEngine, RunOptions};
pub use services::WeightProfile;
pub use workflow::{CandidateCtx, CandidateFlow};
