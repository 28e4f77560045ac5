use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::utils::text::{contains_phrase, tokenize};

/// 候选人档案，由外部的简历解析服务提供
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 已规范化的简历文本
    pub resume_text: String,
    #[serde(default)]
    pub years_experience: u32,
    /// 已提取的关键词（小写）
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// 简历数据最近一次更新时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CandidateProfile {
    /// 发送给评分服务的候选人描述
    pub fn candidate_text(&self) -> String {
        let mut text = String::new();
        if !self.name.is_empty() {
            text.push_str(&format!("姓名: {}\n", self.name));
        }
        text.push_str(&format!("工作年限: {} 年\n", self.years_experience));
        if !self.keywords.is_empty() {
            let keywords: Vec<&str> = self.keywords.iter().map(String::as_str).collect();
            text.push_str(&format!("关键词: {}\n", keywords.join(", ")));
        }
        text.push_str(&format!("简历内容: {}", self.resume_text));
        text
    }

    /// 关键词或简历正文中是否包含该词（不区分大小写，整词匹配）
    ///
    /// 需要检查多个词时用 [`CandidateProfile::mention_index`]，简历只规范化一次
    pub fn mentions(&self, term: &str) -> bool {
        self.mention_index().mentions(term)
    }

    pub fn mention_index(&self) -> MentionIndex {
        MentionIndex {
            keywords: self.keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
            tokens: tokenize(&self.resume_text),
        }
    }
}

/// 规范化后的关键词和简历词序列
#[derive(Debug, Clone)]
pub struct MentionIndex {
    keywords: BTreeSet<String>,
    tokens: Vec<String>,
}

impl MentionIndex {
    pub fn mentions(&self, term: &str) -> bool {
        let keyword = term.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        if self.keywords.contains(&keyword) {
            return true;
        }
        contains_phrase(&self.tokens, &tokenize(term))
    }
}
