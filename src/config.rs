use std::str::FromStr;

use crate::error::ConfigError;
use crate::services::prefilter::{PreFilterConfig, PreFilterPolicy};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- 并发与重试 ---
    /// 进程内同时在途的评分调用上限
    pub max_in_flight_calls: usize,
    /// 单个候选人的最大尝试次数（包含第一次）
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    /// 单次评分调用超时
    pub call_timeout_secs: u64,
    // --- 预筛选 ---
    /// 候选人数量达到该值才启用预筛选
    pub prefilter_activation: usize,
    pub prefilter_top_m: usize,
    /// 设置后改用下限策略
    pub prefilter_floor: Option<f64>,
    // --- 匹配 ---
    pub strict_criterion_floor: u8,
    pub min_match_percentage: f64,
    pub weight_preset: String,
    pub prioritize_recent: bool,
    pub strict_match_mode: bool,
    /// 保存前删除同一职位的旧结果
    pub supersede_previous: bool,
    // --- 输入输出 ---
    /// 输入目录（包含 job.toml 和 candidates/）
    pub input_folder: String,
    /// 输出日志文件
    pub output_log_file: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_in_flight_calls: 8,
            max_attempts: 3,
            backoff_base_ms: 500,
            backoff_max_ms: 8000,
            call_timeout_secs: 30,
            prefilter_activation: 50,
            prefilter_top_m: 25,
            prefilter_floor: None,
            strict_criterion_floor: 40,
            min_match_percentage: 50.0,
            weight_preset: "Default".to_string(),
            prioritize_recent: false,
            strict_match_mode: false,
            supersede_previous: true,
            input_folder: "input".to_string(),
            output_log_file: "match_report.txt".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
        }
    }
}

/// 读取并解析环境变量，缺失或无法解析时使用默认值
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_in_flight_calls: env_or("MAX_IN_FLIGHT_CALLS", default.max_in_flight_calls),
            max_attempts: env_or("MAX_ATTEMPTS", default.max_attempts),
            backoff_base_ms: env_or("BACKOFF_BASE_MS", default.backoff_base_ms),
            backoff_max_ms: env_or("BACKOFF_MAX_MS", default.backoff_max_ms),
            call_timeout_secs: env_or("CALL_TIMEOUT_SECS", default.call_timeout_secs),
            prefilter_activation: env_or("PREFILTER_ACTIVATION", default.prefilter_activation),
            prefilter_top_m: env_or("PREFILTER_TOP_M", default.prefilter_top_m),
            prefilter_floor: std::env::var("PREFILTER_FLOOR").ok().and_then(|v| v.trim().parse().ok()),
            strict_criterion_floor: env_or("STRICT_CRITERION_FLOOR", default.strict_criterion_floor),
            min_match_percentage: env_or("MIN_MATCH_PERCENTAGE", default.min_match_percentage),
            weight_preset: std::env::var("WEIGHT_PRESET").unwrap_or(default.weight_preset),
            prioritize_recent: env_or("PRIORITIZE_RECENT", default.prioritize_recent),
            strict_match_mode: env_or("STRICT_MATCH_MODE", default.strict_match_mode),
            supersede_previous: env_or("SUPERSEDE_PREVIOUS", default.supersede_previous),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }

    /// 检查无法用默认值兜底的组合
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_in_flight_calls == 0 {
            return Err(invalid("MAX_IN_FLIGHT_CALLS", 0, "至少为 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("MAX_ATTEMPTS", 0, "至少为 1"));
        }
        if !(0.0..=100.0).contains(&self.min_match_percentage) {
            return Err(invalid(
                "MIN_MATCH_PERCENTAGE",
                self.min_match_percentage,
                "必须在 [0, 100] 之间",
            ));
        }
        if self.strict_criterion_floor > 100 {
            return Err(invalid(
                "STRICT_CRITERION_FLOOR",
                self.strict_criterion_floor,
                "必须在 [0, 100] 之间",
            ));
        }
        Ok(())
    }

    pub fn prefilter_config(&self) -> PreFilterConfig {
        let policy = match self.prefilter_floor {
            Some(floor) => PreFilterPolicy::Floor(floor),
            None => PreFilterPolicy::TopM(self.prefilter_top_m),
        };
        PreFilterConfig {
            activation_threshold: self.prefilter_activation,
            policy,
        }
    }
}

fn invalid(name: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
