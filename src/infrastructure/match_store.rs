//! 匹配结果存储 - 基础设施层
//!
//! 持久化由外部协作方负责，这里只定义接口和一个进程内实现。
//! 同一 (职位, 候选人) 的重复结果是覆盖还是追加由调用方决定
//! （覆盖见 `replace_for_job`）。

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{rank_results, MatchResult, MatchStatus};

/// 租户维度的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub total_matches: usize,
    /// 平均匹配度（四舍五入取整）
    pub average_match_rate: u32,
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// 保存一批结果
    async fn save(&self, results: &[MatchResult]) -> Result<(), StoreError>;

    /// 删除租户的所有结果，返回删除数量
    async fn clear_all(&self, tenant_id: &str) -> Result<usize, StoreError>;

    /// 删除某职位的所有结果，返回删除数量
    async fn delete_by_job(&self, tenant_id: &str, job_id: &str) -> Result<usize, StoreError>;

    /// 用新结果替换某职位下 `candidate_ids` 的旧结果，返回删除数量
    ///
    /// 删除和写入要么都生效，要么都不生效；不在 `candidate_ids` 中的候选人不受影响
    async fn replace_for_job(
        &self,
        tenant_id: &str,
        job_id: &str,
        candidate_ids: &[String],
        results: &[MatchResult],
    ) -> Result<usize, StoreError>;

    /// 查询结果，按匹配度降序
    async fn list(
        &self,
        tenant_id: &str,
        job_id: Option<&str>,
        min_percentage: Option<f64>,
    ) -> Result<Vec<MatchResult>, StoreError>;

    /// 更新状态，只允许合法的状态流转
    async fn update_status(&self, id: Uuid, status: MatchStatus) -> Result<MatchResult, StoreError>;

    async fn stats(&self, tenant_id: &str) -> Result<MatchStats, StoreError>;
}

/// 进程内存储
#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    results: RwLock<HashMap<Uuid, MatchResult>>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn save(&self, results: &[MatchResult]) -> Result<(), StoreError> {
        let mut guard = self.results.write().await;
        for result in results {
            guard.insert(result.id, result.clone());
        }
        Ok(())
    }

    async fn clear_all(&self, tenant_id: &str) -> Result<usize, StoreError> {
        let mut guard = self.results.write().await;
        let before = guard.len();
        guard.retain(|_, r| r.tenant_id != tenant_id);
        Ok(before - guard.len())
    }

    async fn delete_by_job(&self, tenant_id: &str, job_id: &str) -> Result<usize, StoreError> {
        let mut guard = self.results.write().await;
        let before = guard.len();
        guard.retain(|_, r| !(r.tenant_id == tenant_id && r.job_id == job_id));
        Ok(before - guard.len())
    }

    async fn replace_for_job(
        &self,
        tenant_id: &str,
        job_id: &str,
        candidate_ids: &[String],
        results: &[MatchResult],
    ) -> Result<usize, StoreError> {
        let replaced: HashSet<&str> = candidate_ids.iter().map(String::as_str).collect();

        let mut guard = self.results.write().await;
        let before = guard.len();
        guard.retain(|_, r| {
            !(r.tenant_id == tenant_id
                && r.job_id == job_id
                && replaced.contains(r.candidate_id.as_str()))
        });
        let removed = before - guard.len();

        for result in results {
            guard.insert(result.id, result.clone());
        }
        Ok(removed)
    }

    async fn list(
        &self,
        tenant_id: &str,
        job_id: Option<&str>,
        min_percentage: Option<f64>,
    ) -> Result<Vec<MatchResult>, StoreError> {
        let guard = self.results.read().await;
        let mut matches: Vec<MatchResult> = guard
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .filter(|r| job_id.map_or(true, |id| r.job_id == id))
            .filter(|r| min_percentage.map_or(true, |min| r.match_percentage >= min))
            .cloned()
            .collect();
        rank_results(&mut matches);
        Ok(matches)
    }

    async fn update_status(&self, id: Uuid, status: MatchStatus) -> Result<MatchResult, StoreError> {
        let mut guard = self.results.write().await;
        let result = guard.get_mut(&id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;

        if !result.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                from: result.status.to_string(),
                to: status.to_string(),
            });
        }

        result.status = status;
        Ok(result.clone())
    }

    async fn stats(&self, tenant_id: &str) -> Result<MatchStats, StoreError> {
        let guard = self.results.read().await;
        let percentages: Vec<f64> = guard
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .map(|r| r.match_percentage)
            .collect();

        if percentages.is_empty() {
            return Ok(MatchStats::default());
        }

        let average = percentages.iter().sum::<f64>() / percentages.len() as f64;
        Ok(MatchStats {
            total_matches: percentages.len(),
            average_match_rate: average.round() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CriteriaScores, RecommendationTier, WeightedScores};
    use chrono::Utc;

    fn result(tenant: &str, job: &str, candidate: &str, pct: f64) -> MatchResult {
        MatchResult {
            id: Uuid::new_v4(),
            candidate_id: candidate.into(),
            job_id: job.into(),
            run_id: Uuid::new_v4(),
            tenant_id: tenant.into(),
            criteria_scores: CriteriaScores::uniform(pct as u8),
            weighted_scores: WeightedScores::default(),
            match_percentage: pct,
            reasoning: String::new(),
            tier: RecommendationTier::Best,
            status: MatchStatus::Pending,
            strengths: vec![],
            concerns: vec![],
            skill_analysis: Default::default(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn list_filters_and_sorts_descending() {
        let store = MemoryMatchStore::new();
        store
            .save(&[
                result("t1", "j1", "a", 55.0),
                result("t1", "j1", "b", 80.0),
                result("t1", "j2", "c", 90.0),
                result("t2", "j1", "d", 99.0),
                result("t1", "j1", "e", 40.0),
            ])
            .await
            .unwrap();

        let listed = store.list("t1", Some("j1"), Some(50.0)).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn clear_all_only_touches_one_tenant() {
        let store = MemoryMatchStore::new();
        store
            .save(&[
                result("t1", "j1", "a", 50.0),
                result("t1", "j2", "b", 60.0),
                result("t2", "j1", "c", 70.0),
            ])
            .await
            .unwrap();

        assert_eq!(store.clear_all("t1").await.unwrap(), 2);
        assert!(store.list("t1", None, None).await.unwrap().is_empty());
        assert_eq!(store.list("t2", None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_by_job_keeps_other_jobs() {
        let store = MemoryMatchStore::new();
        store
            .save(&[result("t1", "j1", "a", 50.0), result("t1", "j2", "b", 60.0)])
            .await
            .unwrap();

        assert_eq!(store.delete_by_job("t1", "j1").await.unwrap(), 1);
        let remaining = store.list("t1", None, None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].job_id, "j2");
    }

    #[tokio::test]
    async fn replace_for_job_only_touches_listed_candidates() {
        let store = MemoryMatchStore::new();
        store
            .save(&[
                result("t1", "j1", "a", 50.0),
                result("t1", "j1", "b", 60.0),
                result("t1", "j2", "a", 70.0),
                result("t2", "j1", "a", 80.0),
            ])
            .await
            .unwrap();

        let removed = store
            .replace_for_job("t1", "j1", &["a".to_string()], &[result("t1", "j1", "a", 90.0)])
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let j1 = store.list("t1", Some("j1"), None).await.unwrap();
        let scores: Vec<_> = j1
            .iter()
            .map(|r| (r.candidate_id.as_str(), r.match_percentage))
            .collect();
        assert_eq!(scores, vec![("a", 90.0), ("b", 60.0)]);
        assert_eq!(store.list("t1", Some("j2"), None).await.unwrap().len(), 1);
        assert_eq!(store.list("t2", None, None).await.unwrap().len(), 1);

        // 没有重新评分的候选人时什么也不删
        assert_eq!(store.replace_for_job("t1", "j1", &[], &[]).await.unwrap(), 0);
        assert_eq!(store.list("t1", Some("j1"), None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn status_updates_follow_state_machine() {
        let store = MemoryMatchStore::new();
        let saved = result("t1", "j1", "a", 50.0);
        let id = saved.id;
        store.save(&[saved]).await.unwrap();

        let err = store
            .update_status(id, MatchStatus::InterviewScheduled)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));

        store.update_status(id, MatchStatus::Reviewed).await.unwrap();
        let updated = store.update_status(id, MatchStatus::Rejected).await.unwrap();
        assert_eq!(updated.status, MatchStatus::Rejected);

        let missing = store.update_status(Uuid::new_v4(), MatchStatus::Reviewed).await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn stats_average_is_rounded() {
        let store = MemoryMatchStore::new();
        assert_eq!(store.stats("t1").await.unwrap(), MatchStats::default());

        store
            .save(&[result("t1", "j1", "a", 70.5), result("t1", "j1", "b", 80.0)])
            .await
            .unwrap();
        let stats = store.stats("t1").await.unwrap();
        assert_eq!(stats.total_matches, 2);
        assert_eq!(stats.average_match_rate, 75);
    }
}
