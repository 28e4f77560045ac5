use thiserror::Error;

use crate::models::Criterion;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 权重配置错误（在任何评分调用之前抛出）
    #[error("权重错误: {0}")]
    Weights(#[from] InvalidWeightsError),
    /// 评分服务错误
    #[error("评分服务错误: {0}")]
    Oracle(#[from] OracleError),
    /// 存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 调用参数错误
    #[error("参数错误: {0}")]
    InvalidInput(String),
}

/// 权重校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidWeightsError {
    /// 单项权重超出 [0, 100]
    #[error("权重 {criterion} = {value} 超出范围 [0, 100]")]
    OutOfRange { criterion: Criterion, value: i32 },
    /// 五项权重之和不等于 100
    #[error("五项权重之和为 {sum}，必须恰好等于 100")]
    SumMismatch { sum: i32 },
    /// 未知的预设名称
    #[error("未知的权重预设: {name}")]
    UnknownPreset { name: String },
}

/// 评分服务（Scoring Oracle）错误
///
/// `Timeout` 和 `Unavailable` 属于瞬时错误，会按退避策略重试；
/// `MalformedScore` 不重试，直接记为该候选人失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// 单次调用超时
    #[error("评分调用超时 ({timeout_ms} ms)")]
    Timeout { timeout_ms: u64 },
    /// 传输错误或服务不可用
    #[error("评分服务不可用: {detail}")]
    Unavailable { detail: String },
    /// 返回内容缺项或无法解析
    #[error("评分结果格式错误: {detail}")]
    MalformedScore { detail: String },
}

impl OracleError {
    /// 是否为可重试的瞬时错误
    pub fn is_transient(&self) -> bool {
        matches!(self, OracleError::Timeout { .. } | OracleError::Unavailable { .. })
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        OracleError::MalformedScore {
            detail: detail.into(),
        }
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        OracleError::Unavailable {
            detail: detail.into(),
        }
    }
}

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 匹配结果不存在
    #[error("匹配结果不存在: {id}")]
    NotFound { id: String },
    /// 状态流转不合法
    #[error("状态不能从 {from} 变更为 {to}")]
    InvalidTransition { from: String, to: String },
    /// 后端存储故障
    #[error("存储后端故障: {detail}")]
    Backend { detail: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件或目录不存在
    #[error("路径不存在: {path}")]
    NotFound { path: String },
    /// 读取失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 数值不合法
    #[error("配置项 {name} 的值 {value} 不合法: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建参数错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput(message.into())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(OracleError::Timeout { timeout_ms: 10 }.is_transient());
        assert!(OracleError::unavailable("503").is_transient());
        assert!(!OracleError::malformed("缺少 skills").is_transient());
    }

    #[test]
    fn weights_error_converts_into_app_error() {
        let err: AppError = InvalidWeightsError::SumMismatch { sum: 99 }.into();
        assert!(matches!(err, AppError::Weights(_)));
        assert!(err.to_string().contains("99"));
    }
}
