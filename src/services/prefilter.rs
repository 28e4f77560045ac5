//! 候选人预筛选 - 业务能力层
//!
//! 在调用昂贵的评分服务之前，用简单的启发式分数缩小候选人池。
//!
//! 启发式分数（0.0〜1.0）：
//! - 技能重合度 × 0.7：必备技能权重 2，加分技能和技术栈权重 1
//! - 年限接近度 × 0.3：达到最低年限为 1.0，否则按比例
//! - `prioritize_recent` 时额外加上最多 0.1 的时效加分
//!
//! 以召回率换取成本：启发式排名靠后、但完整分析会得高分的候选人可能被漏掉。

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::debug;

use crate::models::{CandidateProfile, JobRequirement};

const OVERLAP_WEIGHT: f64 = 0.7;
const PROXIMITY_WEIGHT: f64 = 0.3;
const RECENCY_BONUS: f64 = 0.1;
/// 此天数内更新的简历获得全额时效加分
const FRESH_DAYS: f64 = 180.0;
/// 超过此天数时效加分为 0
const STALE_DAYS: f64 = 3.0 * 365.0;

/// 超过激活阈值后的保留策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreFilterPolicy {
    /// 保留启发式分数最高的 M 个
    TopM(usize),
    /// 保留启发式分数严格大于下限的所有候选人
    Floor(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreFilterConfig {
    /// 候选人数量低于该值时不做筛选
    pub activation_threshold: usize,
    pub policy: PreFilterPolicy,
}

impl Default for PreFilterConfig {
    fn default() -> Self {
        Self {
            activation_threshold: 50,
            policy: PreFilterPolicy::TopM(25),
        }
    }
}

pub struct CandidatePreFilter {
    config: PreFilterConfig,
}

impl CandidatePreFilter {
    pub fn new(config: PreFilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreFilterConfig {
        &self.config
    }

    /// 预筛选候选人，幸存者保持输入顺序
    pub fn filter(
        &self,
        candidates: &[CandidateProfile],
        job: &JobRequirement,
        prioritize_recent: bool,
        now: DateTime<Utc>,
    ) -> Vec<CandidateProfile> {
        if candidates.len() < self.config.activation_threshold {
            return candidates.to_vec();
        }

        let scored: Vec<(usize, f64)> = candidates
            .iter()
            .enumerate()
            .map(|(idx, c)| (idx, heuristic_score(c, job, prioritize_recent, now)))
            .collect();

        let mut keep: Vec<usize> = match self.config.policy {
            PreFilterPolicy::TopM(m) => {
                let mut ranked = scored;
                // 稳定排序：同分保持输入顺序
                ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
                ranked.truncate(m);
                ranked.into_iter().map(|(idx, _)| idx).collect()
            }
            PreFilterPolicy::Floor(floor) => scored
                .into_iter()
                .filter(|(_, score)| *score > floor)
                .map(|(idx, _)| idx)
                .collect(),
        };
        keep.sort_unstable();

        debug!(
            "预筛选: {} 个候选人中保留 {} 个 (策略: {:?})",
            candidates.len(),
            keep.len(),
            self.config.policy
        );

        keep.into_iter().map(|idx| candidates[idx].clone()).collect()
    }
}

/// 计算单个候选人的启发式相关度
pub fn heuristic_score(
    candidate: &CandidateProfile,
    job: &JobRequirement,
    prioritize_recent: bool,
    now: DateTime<Utc>,
) -> f64 {
    let mut score = OVERLAP_WEIGHT * skill_overlap(candidate, job)
        + PROXIMITY_WEIGHT * experience_proximity(candidate.years_experience, job.min_years_experience);

    if prioritize_recent {
        score += RECENCY_BONUS * recency(candidate.updated_at, now);
    }
    score
}

/// 加权技能命中率
fn skill_overlap(candidate: &CandidateProfile, job: &JobRequirement) -> f64 {
    let terms = job
        .mandatory_skills
        .iter()
        .map(|t| (t, 2.0))
        .chain(job.preferred_skills.iter().map(|t| (t, 1.0)))
        .chain(job.technologies.iter().map(|t| (t, 1.0)));

    let index = candidate.mention_index();
    let mut total = 0.0;
    let mut hit = 0.0;
    for (term, weight) in terms {
        total += weight;
        if index.mentions(term) {
            hit += weight;
        }
    }

    if total == 0.0 {
        1.0
    } else {
        hit / total
    }
}

fn experience_proximity(years: u32, min_years: u32) -> f64 {
    if min_years == 0 || years >= min_years {
        1.0
    } else {
        f64::from(years) / f64::from(min_years)
    }
}

/// 0.0〜1.0 的时效系数
fn recency(updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(updated_at) = updated_at else {
        return 0.0;
    };
    let age_days = (now - updated_at).num_days().max(0) as f64;
    if age_days <= FRESH_DAYS {
        1.0
    } else if age_days >= STALE_DAYS {
        0.0
    } else {
        1.0 - (age_days - FRESH_DAYS) / (STALE_DAYS - FRESH_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn job() -> JobRequirement {
        JobRequirement {
            id: "job-1".into(),
            tenant_id: "t1".into(),
            title: "Backend Engineer".into(),
            requirement_text: "Rust services".into(),
            mandatory_skills: vec!["rust".into()],
            preferred_skills: vec!["kafka".into()],
            technologies: vec!["postgres".into()],
            min_years_experience: 4,
        }
    }

    fn candidate(id: &str, resume: &str, years: u32) -> CandidateProfile {
        CandidateProfile {
            id: id.into(),
            name: String::new(),
            resume_text: resume.into(),
            years_experience: years,
            keywords: Default::default(),
            updated_at: None,
        }
    }

    fn pool(n: usize) -> Vec<CandidateProfile> {
        (0..n)
            .map(|i| candidate(&format!("c{:02}", i), "java developer", 1))
            .collect()
    }

    #[test]
    fn below_threshold_returns_everyone_unchanged() {
        let filter = CandidatePreFilter::new(PreFilterConfig {
            activation_threshold: 10,
            policy: PreFilterPolicy::TopM(1),
        });
        let candidates = pool(9);

        let kept = filter.filter(&candidates, &job(), false, Utc::now());
        assert_eq!(kept.len(), 9);
        assert_eq!(kept[0].id, "c00");
        assert_eq!(kept[8].id, "c08");
    }

    #[test]
    fn top_m_keeps_best_heuristic_scores_in_input_order() {
        let filter = CandidatePreFilter::new(PreFilterConfig {
            activation_threshold: 3,
            policy: PreFilterPolicy::TopM(2),
        });
        let mut candidates = pool(4);
        candidates.push(candidate("strong", "rust kafka postgres", 6));
        candidates.insert(1, candidate("medium", "rust services", 4));

        let kept = filter.filter(&candidates, &job(), false, Utc::now());
        let ids: Vec<_> = kept.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["medium", "strong"]);
    }

    #[test]
    fn floor_policy_keeps_scores_strictly_above_floor() {
        let filter = CandidatePreFilter::new(PreFilterConfig {
            activation_threshold: 1,
            policy: PreFilterPolicy::Floor(0.5),
        });
        let candidates = vec![
            candidate("none", "java", 0),
            candidate("all", "rust kafka postgres", 10),
        ];

        let kept = filter.filter(&candidates, &job(), false, Utc::now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "all");
    }

    #[test]
    fn heuristic_combines_overlap_and_experience() {
        let now = Utc::now();
        let perfect = candidate("p", "rust kafka postgres", 5);
        assert!((heuristic_score(&perfect, &job(), false, now) - 1.0).abs() < 1e-9);

        // 必备技能命中 2/4，年限 2/4
        let half = candidate("h", "rust", 2);
        let expected = 0.7 * 0.5 + 0.3 * 0.5;
        assert!((heuristic_score(&half, &job(), false, now) - expected).abs() < 1e-9);
    }

    #[test]
    fn overlap_ignores_partial_word_hits() {
        let mut job = job();
        job.mandatory_skills = vec!["java".into()];
        job.preferred_skills = vec!["go".into()];
        job.technologies.clear();
        job.min_years_experience = 0;

        let lookalike = candidate("x", "javascript developer at google", 5);
        assert!((heuristic_score(&lookalike, &job, false, Utc::now()) - 0.3).abs() < 1e-9);

        let real = candidate("y", "java and go developer", 5);
        assert!((heuristic_score(&real, &job, false, Utc::now()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn job_without_terms_does_not_penalize_overlap() {
        let mut job = job();
        job.mandatory_skills.clear();
        job.preferred_skills.clear();
        job.technologies.clear();
        job.min_years_experience = 0;

        let score = heuristic_score(&candidate("x", "anything", 0), &job, false, Utc::now());
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prioritize_recent_rewards_fresh_profiles() {
        let now = Utc::now();
        let mut fresh = candidate("fresh", "rust", 4);
        fresh.updated_at = Some(now - Duration::days(30));
        let mut stale = candidate("stale", "rust", 4);
        stale.updated_at = Some(now - Duration::days(5 * 365));

        let fresh_score = heuristic_score(&fresh, &job(), true, now);
        let stale_score = heuristic_score(&stale, &job(), true, now);
        assert!((fresh_score - stale_score - 0.1).abs() < 1e-9);

        assert_eq!(
            heuristic_score(&fresh, &job(), false, now),
            heuristic_score(&stale, &job(), false, now)
        );
    }

    #[test]
    fn recency_decays_linearly_between_bounds() {
        let now = Utc::now();
        let midpoint = (FRESH_DAYS + STALE_DAYS) / 2.0;
        let updated = now - Duration::days(midpoint as i64);
        assert!((recency(Some(updated), now) - 0.5).abs() < 0.01);
        assert_eq!(recency(None, now), 0.0);
    }
}
