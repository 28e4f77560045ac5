use serde::{Deserialize, Serialize};
use std::fmt;

/// 五项评分维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    /// 技能匹配
    Skills,
    /// 经验水平
    Experience,
    /// 关键词相关度（含时效性）
    KeywordRelevance,
    /// 技术深度
    TechnicalDepth,
    /// 领域经验
    DomainExperience,
}

impl Criterion {
    /// 固定顺序的全部维度
    pub const ALL: [Criterion; 5] = [
        Criterion::Skills,
        Criterion::Experience,
        Criterion::KeywordRelevance,
        Criterion::TechnicalDepth,
        Criterion::DomainExperience,
    ];

    /// 与评分服务交互时使用的键名
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Skills => "skills",
            Criterion::Experience => "experience",
            Criterion::KeywordRelevance => "keywordRelevance",
            Criterion::TechnicalDepth => "technicalDepth",
            Criterion::DomainExperience => "domainExperience",
        }
    }

    /// 旧版评分接口使用的别名
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Criterion::Skills => &["skillsMatch"],
            Criterion::Experience => &["experienceLevel"],
            Criterion::KeywordRelevance => &["keywords"],
            Criterion::TechnicalDepth => &["professionalDepth"],
            Criterion::DomainExperience => &[],
        }
    }

    /// 中文显示名称
    pub fn label(self) -> &'static str {
        match self {
            Criterion::Skills => "技能匹配",
            Criterion::Experience => "经验水平",
            Criterion::KeywordRelevance => "关键词相关度",
            Criterion::TechnicalDepth => "技术深度",
            Criterion::DomainExperience => "领域经验",
        }
    }

    /// 从键名或别名解析
    pub fn from_key(key: &str) -> Option<Self> {
        Criterion::ALL
            .into_iter()
            .find(|c| c.key() == key || c.aliases().contains(&key))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 单个 (职位, 候选人) 的五项子分数，均在 [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaScores {
    pub skills: u8,
    pub experience: u8,
    pub keyword_relevance: u8,
    pub technical_depth: u8,
    pub domain_experience: u8,
}

impl CriteriaScores {
    /// 构造时自动截断到 [0, 100]
    pub fn new(
        skills: u8,
        experience: u8,
        keyword_relevance: u8,
        technical_depth: u8,
        domain_experience: u8,
    ) -> Self {
        Self {
            skills: skills.min(100),
            experience: experience.min(100),
            keyword_relevance: keyword_relevance.min(100),
            technical_depth: technical_depth.min(100),
            domain_experience: domain_experience.min(100),
        }
    }

    /// 五项分数全部相同
    pub fn uniform(score: u8) -> Self {
        Self::new(score, score, score, score, score)
    }

    pub fn get(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::Skills => self.skills,
            Criterion::Experience => self.experience,
            Criterion::KeywordRelevance => self.keyword_relevance,
            Criterion::TechnicalDepth => self.technical_depth,
            Criterion::DomainExperience => self.domain_experience,
        }
    }

    fn slot(&mut self, criterion: Criterion) -> &mut u8 {
        match criterion {
            Criterion::Skills => &mut self.skills,
            Criterion::Experience => &mut self.experience,
            Criterion::KeywordRelevance => &mut self.keyword_relevance,
            Criterion::TechnicalDepth => &mut self.technical_depth,
            Criterion::DomainExperience => &mut self.domain_experience,
        }
    }

    /// 由 (维度, 分数) 列表构造；缺少任一维度时返回缺失的维度
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Criterion, u8)>,
    ) -> Result<Self, Vec<Criterion>> {
        let mut scores = CriteriaScores::uniform(0);
        let mut seen = [false; 5];
        for (criterion, value) in pairs {
            *scores.slot(criterion) = value.min(100);
            seen[criterion as usize] = true;
        }

        let missing: Vec<Criterion> = Criterion::ALL
            .into_iter()
            .filter(|c| !seen[*c as usize])
            .collect();
        if missing.is_empty() {
            Ok(scores)
        } else {
            Err(missing)
        }
    }

    /// 按固定顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, u8)> + '_ {
        Criterion::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn min_score(&self) -> u8 {
        self.iter().map(|(_, s)| s).min().unwrap_or(0)
    }
}

/// 每项维度的加权贡献 `score * weight / 100`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedScores {
    pub skills: f64,
    pub experience: f64,
    pub keyword_relevance: f64,
    pub technical_depth: f64,
    pub domain_experience: f64,
}

impl WeightedScores {
    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Skills => self.skills,
            Criterion::Experience => self.experience,
            Criterion::KeywordRelevance => self.keyword_relevance,
            Criterion::TechnicalDepth => self.technical_depth,
            Criterion::DomainExperience => self.domain_experience,
        }
    }

    pub fn total(&self) -> f64 {
        Criterion::ALL.into_iter().map(|c| self.get(c)).sum()
    }
}
