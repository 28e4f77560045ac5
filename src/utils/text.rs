//! 文本规范化工具

use regex::Regex;
use std::sync::OnceLock;

fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("静态正则表达式"))
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("静态正则表达式"))
}

/// 规范化简历文本：转小写、标点替换为空格、合并连续空白
pub fn normalize_resume_text(content: &str) -> String {
    let lowered = content.to_lowercase();
    let stripped = punctuation().replace_all(&lowered, " ");
    whitespace().replace_all(&stripped, " ").trim().to_string()
}

fn word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\p{Han}+|[^\s\p{Han}]+").expect("静态正则表达式"))
}

/// 规范化后切分为词：连续汉字为一个词，其余按空白切分
///
/// `熟悉rust` 切为 `熟悉` 和 `rust`
pub fn tokenize(content: &str) -> Vec<String> {
    let normalized = normalize_resume_text(content);
    word()
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `phrase` 的词序列是否在 `tokens` 中连续出现
///
/// 英文词必须整词相等（`java` 不匹配 `javascript`）；汉字词没有词边界，
/// 只要包含在对应位置的汉字串中即可
pub fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() {
        return false;
    }
    tokens.windows(phrase.len()).any(|window| {
        window
            .iter()
            .zip(phrase)
            .all(|(token, term)| token_matches(token, term))
    })
}

fn token_matches(token: &str, term: &str) -> bool {
    if term.chars().all(is_han) {
        token.contains(term)
    } else {
        token == term
    }
}

fn is_han(c: char) -> bool {
    matches!(c, '\u{3400}'..='\u{4dbf}' | '\u{4e00}'..='\u{9fff}' | '\u{f900}'..='\u{faff}')
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_punctuation_and_whitespace() {
        assert_eq!(
            normalize_resume_text("  Node.js,\tReact &  AWS!! "),
            "node js react aws"
        );
    }

    #[test]
    fn keeps_cjk_characters() {
        assert_eq!(normalize_resume_text("熟悉Rust、Go。"), "熟悉rust go");
    }

    fn words(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn tokenize_splits_han_from_latin() {
        assert_eq!(words("熟悉Rust、Go。"), vec!["熟悉", "rust", "go"]);
        assert_eq!(words("Node.js developer"), vec!["node", "js", "developer"]);
    }

    #[test]
    fn phrases_match_whole_words_only() {
        let resume = words("JavaScript developer at Google");
        assert!(!contains_phrase(&resume, &words("java")));
        assert!(!contains_phrase(&resume, &words("go")));
        assert!(contains_phrase(&resume, &words("javascript")));
        assert!(contains_phrase(&resume, &words("Developer at")));
        assert!(!contains_phrase(&resume, &words("at developer")));
        assert!(!contains_phrase(&resume, &[]));
    }

    #[test]
    fn han_terms_match_inside_han_runs() {
        let resume = words("五年分布式系统经验，熟悉Kafka");
        assert!(contains_phrase(&resume, &words("分布式")));
        assert!(contains_phrase(&resume, &words("kafka")));
        assert!(!contains_phrase(&resume, &words("微服务")));
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_text("候选人简历内容", 3), "候选人...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
