//! 基于 OpenAI 兼容接口的评分服务
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型（兼容 OpenAI API 的服务均可）
//! - `temperature = 0` 并传入种子，保证同一输入的评分可复现

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::clients::oracle::{OracleRequest, RawScoreSheet, ScoringOracle};
use crate::config::Config;
use crate::error::OracleError;
use crate::models::SkillBreakdown;

const MAX_TOKENS: u32 = 2500;

const SYSTEM_MESSAGE: &str = "你是一名资深招聘顾问，负责评估候选人与职位的匹配程度。\
                              你只根据提供的职位描述和简历内容打分，不做任何假设。\
                              你只输出一个 JSON 对象，不输出任何其他内容。";

/// 模型返回的 JSON 结构
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OracleReply {
    criteria_scores: BTreeMap<String, Value>,
    #[serde(default, alias = "reasoning")]
    detailed_reasoning: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    concerns: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    score_explanations: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "lenient")]
    skill_breakdown: BTreeMap<String, SkillBreakdown>,
    #[serde(default, deserialize_with = "lenient")]
    recommendations: Vec<String>,
}

/// 分析类字段格式不对时按缺失处理，不让整次评分失败
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// OpenAI 评分服务
///
/// 职责：
/// - 构建评分提示词并调用 LLM API
/// - 解析返回的 JSON
/// - 不做重试、不做超时控制、不做分数校验
pub struct OpenAiOracle {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiOracle {
    /// 创建新的评分服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn send(&self, user_message: &str, seed: i64) -> Result<String, OracleError> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_MESSAGE)
            .build()
            .map_err(|e| OracleError::malformed(format!("构建系统消息失败: {}", e)))?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| OracleError::malformed(format!("构建用户消息失败: {}", e)))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(0.0)
            .seed(seed)
            .max_tokens(MAX_TOKENS)
            .build()
            .map_err(|e| OracleError::malformed(format!("构建请求失败: {}", e)))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            OracleError::unavailable(e.to_string())
        })?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| OracleError::malformed("LLM 返回内容为空"))
    }
}

#[async_trait]
impl ScoringOracle for OpenAiOracle {
    async fn score(&self, request: &OracleRequest) -> Result<RawScoreSheet, OracleError> {
        debug!(
            "调用评分服务，模型: {}, seed: {}",
            self.model_name, request.seed
        );
        let prompt = build_prompt(request);
        let reply = self.send(&prompt, request.seed).await?;
        parse_reply(&reply)
    }
}

/// 构建评分提示词
pub fn build_prompt(request: &OracleRequest) -> String {
    let criteria: Vec<String> = request
        .criteria
        .iter()
        .map(|c| {
            format!(
                "- \"{}\"（{}，权重 {}%）",
                c.key(),
                c.label(),
                request.weights.get(*c)
            )
        })
        .collect();

    let keys: Vec<String> = request
        .criteria
        .iter()
        .map(|c| format!("    \"{}\": <0-100 的整数>", c.key()))
        .collect();

    format!(
        r#"请根据以下职位需求评估候选人，每个维度给出 0 到 100 的整数分数。

【职位需求】
{job}

【候选人】
{candidate}

【评分维度】
{criteria}

请只返回如下 JSON：
{{
  "criteriaScores": {{
{keys}
  }},
  "detailedReasoning": "<对匹配情况的简要说明>",
  "scoreExplanations": {{
    "<维度键>": "<该维度的评分理由>"
  }},
  "skillBreakdown": {{
    "<维度键>": {{ "has": ["<已具备的技能>"], "missing": ["<欠缺的技能>"] }}
  }},
  "strengths": ["<优势>"],
  "concerns": ["<顾虑>"],
  "recommendations": ["<面试或培养建议>"]
}}"#,
        job = request.job_text,
        candidate = request.candidate_text,
        criteria = criteria.join("\n"),
        keys = keys.join(",\n"),
    )
}

/// 从模型回复中解析评分
///
/// 回复可能带有 markdown 代码块等多余内容，取第一个 `{` 到最后一个 `}` 之间的部分
pub fn parse_reply(reply: &str) -> Result<RawScoreSheet, OracleError> {
    let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) else {
        return Err(OracleError::malformed("回复中没有 JSON 对象"));
    };
    if end < start {
        return Err(OracleError::malformed("回复中没有 JSON 对象"));
    }

    let parsed: OracleReply = serde_json::from_str(&reply[start..=end])
        .map_err(|e| OracleError::malformed(format!("JSON 解析失败: {}", e)))?;

    Ok(RawScoreSheet {
        scores: parsed.criteria_scores,
        narrative: parsed.detailed_reasoning,
        strengths: parsed.strengths,
        concerns: parsed.concerns,
        score_explanations: parsed.score_explanations,
        skill_breakdown: parsed.skill_breakdown,
        recommendations: parsed.recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CriteriaScores, Criterion};
    use crate::services::weight_profile::WeightProfile;

    fn request() -> OracleRequest {
        OracleRequest {
            job_text: "职位: Rust 后端工程师".into(),
            candidate_text: "工作年限: 5 年".into(),
            criteria: Criterion::ALL.to_vec(),
            seed: 42,
            weights: WeightProfile::default(),
        }
    }

    #[test]
    fn prompt_lists_every_criterion_with_weight() {
        let prompt = build_prompt(&request());
        for criterion in Criterion::ALL {
            assert!(prompt.contains(&format!("\"{}\"", criterion.key())));
        }
        assert!(prompt.contains("权重 25%"));
        assert!(prompt.contains("\"skillBreakdown\""));
        assert!(prompt.contains("\"recommendations\""));
        assert!(prompt.contains("Rust 后端工程师"));
    }

    #[test]
    fn parses_reply_wrapped_in_code_fence() {
        let reply = r#"```json
{
  "criteriaScores": {
    "skills": 85, "experience": 70, "keywordRelevance": 60,
    "technicalDepth": 75, "domainExperience": 40
  },
  "detailedReasoning": "具备扎实的 Rust 经验",
  "strengths": ["Rust"],
  "concerns": ["缺少金融行业经验"]
}
```"#;

        let raw = parse_reply(reply).unwrap();
        assert_eq!(raw.narrative, "具备扎实的 Rust 经验");
        assert_eq!(raw.concerns, vec!["缺少金融行业经验".to_string()]);

        let sheet = raw.validate().unwrap();
        assert_eq!(sheet.scores, CriteriaScores::new(85, 70, 60, 75, 40));
    }

    #[test]
    fn parses_skill_analysis() {
        let reply = r#"{
  "criteriaScores": {
    "skills": 85, "experience": 70, "keywordRelevance": 60,
    "technicalDepth": 75, "domainExperience": 40
  },
  "scoreExplanations": { "skills": "Rust 和 Tokio 都有项目经验" },
  "skillBreakdown": { "skills": { "has": ["rust", "tokio"], "missing": ["kafka"] } },
  "recommendations": ["面试时重点考察消息队列"]
}"#;

        let sheet = parse_reply(reply).unwrap().validate().unwrap();
        let breakdown = &sheet.analysis.skill_breakdown[&Criterion::Skills];
        assert_eq!(breakdown.has, vec!["rust".to_string(), "tokio".to_string()]);
        assert_eq!(breakdown.missing, vec!["kafka".to_string()]);
        assert_eq!(
            sheet.analysis.score_explanations[&Criterion::Skills],
            "Rust 和 Tokio 都有项目经验"
        );
        assert_eq!(sheet.analysis.recommendations.len(), 1);
    }

    #[test]
    fn badly_shaped_analysis_is_ignored() {
        let reply = r#"{
  "criteriaScores": {
    "skills": 85, "experience": 70, "keywordRelevance": 60,
    "technicalDepth": 75, "domainExperience": 40
  },
  "skillBreakdown": ["rust"],
  "recommendations": "多问问并发"
}"#;

        let sheet = parse_reply(reply).unwrap().validate().unwrap();
        assert!(sheet.analysis.is_empty());
        assert_eq!(sheet.scores, CriteriaScores::new(85, 70, 60, 75, 40));
    }

    #[test]
    fn garbage_reply_is_malformed() {
        assert!(matches!(
            parse_reply("抱歉，我无法完成评分"),
            Err(OracleError::MalformedScore { .. })
        ));
        assert!(matches!(
            parse_reply("} nope {"),
            Err(OracleError::MalformedScore { .. })
        ));
        assert!(matches!(
            parse_reply(r#"{"detailedReasoning": "缺少分数"}"#),
            Err(OracleError::MalformedScore { .. })
        ));
    }

    #[tokio::test]
    #[ignore] // 需要真实的 API 密钥，手动运行: cargo test -- --ignored
    async fn test_live_scoring() {
        let _ = tracing_subscriber::fmt::try_init();

        let oracle = OpenAiOracle::new(&Config::from_env());
        let result = oracle.score(&request()).await;

        match result {
            Ok(raw) => {
                println!("✓ 评分成功: {:?}", raw.scores);
                assert!(raw.validate().is_ok());
            }
            Err(e) => println!("✗ 评分失败: {}", e),
        }
    }
}
