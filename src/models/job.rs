use serde::{Deserialize, Serialize};

/// 职位需求，一次匹配运行中不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: String,
    /// 所属租户，用于批量清理
    pub tenant_id: String,
    #[serde(default)]
    pub title: String,
    pub requirement_text: String,
    #[serde(default)]
    pub mandatory_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub min_years_experience: u32,
}

impl JobRequirement {
    /// 发送给评分服务的完整职位描述
    pub fn job_text(&self) -> String {
        let mut text = String::new();
        if !self.title.is_empty() {
            text.push_str(&format!("职位: {}\n", self.title));
        }
        text.push_str(&format!("职位描述: {}\n", self.requirement_text));
        if !self.mandatory_skills.is_empty() {
            text.push_str(&format!("必备技能: {}\n", self.mandatory_skills.join(", ")));
        }
        if !self.preferred_skills.is_empty() {
            text.push_str(&format!("加分技能: {}\n", self.preferred_skills.join(", ")));
        }
        if !self.technologies.is_empty() {
            text.push_str(&format!("技术栈: {}\n", self.technologies.join(", ")));
        }
        text.push_str(&format!("最低工作年限: {} 年", self.min_years_experience));
        text
    }
}
