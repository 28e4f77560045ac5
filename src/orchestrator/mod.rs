//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次匹配运行的调度和统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 创建进程级 `ScoringLimiter`，加载输入文件
//! - 输出全局统计信息
//!
//! ### `matching_engine` - 匹配引擎
//! - 对外接口：`run_matching` / `clear_matches`
//! - 串联预筛选、评分、汇总、过滤、分级和保存
//!
//! ### `scoring_orchestrator` - 并发评分调度
//! - 控制并发数量（进程级 Semaphore）
//! - 派发前检查取消信号
//! - 每个候选人一个任务，失败互不影响
//!
//! ## 层次关系
//!
//! ```text
//! app (加载输入，处理一个职位)
//!     ↓
//! matching_engine (处理 Vec<CandidateProfile>)
//!     ↓
//! scoring_orchestrator (并发派发)
//!     ↓
//! workflow::CandidateFlow (处理单个候选人)
//!     ↓
//! clients (ScoringOracle) / services (纯函数能力)
//!     ↓
//! infrastructure (ScoringLimiter / MatchStore)
//! ```

pub mod app;
pub mod matching_engine;
pub mod scoring_orchestrator;

// 重新导出主要类型
pub use app::App;
pub use matching_engine::{EngineSettings, MatchRun, MatchingEngine, RunOptions};
pub use scoring_orchestrator::{ScoringOrchestrator, ScoringOutcome};
