//! 评分调用限流器 - 基础设施层
//!
//! 进程内唯一的可变共享状态：并发信号量 + 调用计数。
//! 在进程启动时显式构造一次，通过 `Arc` 传给所有运行，不使用全局变量。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// 评分调用限流器
///
/// 职责：
/// - 限制所有并发运行的在途评分调用总数
/// - 统计评分调用次数（成本跟踪）
/// - 不认识 Job / Candidate
#[derive(Debug)]
pub struct ScoringLimiter {
    semaphore: Arc<Semaphore>,
    max_in_flight: usize,
    calls: AtomicU64,
}

impl ScoringLimiter {
    /// 创建新的限流器
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            calls: AtomicU64::new(0),
        }
    }

    /// 获取一个在途许可，许可随返回值释放
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        self.semaphore.clone().acquire_owned().await
    }

    /// 记录一次评分调用
    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    /// 进程启动以来的评分调用次数
    pub fn calls_made(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// 当前空闲许可数
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
