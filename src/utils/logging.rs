//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::MatchStats;
use crate::models::{MatchResult, RunSummary};
use crate::utils::text::truncate_text;

/// 初始化 tracing（`RUST_LOG` 未设置时默认 info）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化报告文件
///
/// # 参数
/// - `log_file_path`: 报告文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n候选人匹配报告 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(max_in_flight: usize, model_name: &str, weight_preset: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 候选人匹配模式");
    info!("📊 最大在途评分调用: {}", max_in_flight);
    info!("🤖 评分模型: {}", model_name);
    info!("⚖️ 权重预设: {}", weight_preset);
    info!("{}", "=".repeat(60));
}

/// 记录运行开始信息
pub fn log_run_start(job_title: &str, job_id: &str, candidates: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 职位: {} ({})", job_title, job_id);
    info!("📄 待匹配候选人: {} 个", candidates);
    info!("{}", "=".repeat(60));
}

/// 按排名输出匹配结果
pub fn log_results(results: &[MatchResult]) {
    info!("\n{}", "─".repeat(60));
    for (rank, result) in results.iter().enumerate() {
        info!(
            "#{} {} - {:.1}% 【{}】",
            rank + 1,
            result.candidate_id,
            result.match_percentage,
            result.tier
        );
        info!("    {}", truncate_text(&result.reasoning.replace('\n', " "), 120));
    }
    info!("{}", "─".repeat(60));
}

/// 追加结果到报告文件
pub fn append_report(log_file_path: &str, results: &[MatchResult], summary: &RunSummary) -> Result<()> {
    let mut file = OpenOptions::new().append(true).create(true).open(log_file_path)?;

    for (rank, result) in results.iter().enumerate() {
        writeln!(
            file,
            "#{} {} {:.1}% [{}]\n{}\n",
            rank + 1,
            result.candidate_id,
            result.match_percentage,
            result.tier,
            result.reasoning
        )?;
    }
    for failure in &summary.failures {
        writeln!(
            file,
            "失败: {} ({}) {}",
            failure.candidate_id, failure.kind, failure.reason
        )?;
    }
    writeln!(file, "\n{}", serde_json::to_string_pretty(summary)?)?;
    Ok(())
}

/// 打印最终统计信息
pub fn print_final_stats(
    summary: &RunSummary,
    stats: &MatchStats,
    calls_made: u64,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 匹配完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("👥 候选人: {}", summary.considered);
    info!("🔎 预筛选排除: {}", summary.prefiltered_out);
    info!("✅ 评分成功: {}", summary.scored);
    info!("🚫 低于阈值: {}", summary.filtered_by_threshold);
    info!("❌ 失败: {}", summary.failed);
    for failure in &summary.failures {
        info!("    - {} ({}): {}", failure.candidate_id, failure.kind, failure.reason);
    }
    if summary.cancelled {
        info!("⏹️ 运行已取消，未保存任何结果");
    }
    if let Some(reason) = &summary.persist_error {
        info!("⚠️ 结果未保存: {}", reason);
    }
    info!("📈 当前租户共 {} 条结果，平均匹配度 {}%", stats.total_matches, stats.average_match_rate);
    info!("💰 评分调用次数: {}", calls_made);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", log_file_path);
}
