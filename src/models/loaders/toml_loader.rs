use crate::models::{CandidateProfile, JobRequirement};
use crate::utils::text::normalize_resume_text;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载职位需求
pub async fn load_job(toml_file_path: &Path) -> Result<JobRequirement> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let job: JobRequirement = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(job)
}

/// 从 TOML 文件加载单个候选人，并规范化简历文本和关键词
pub async fn load_candidate(toml_file_path: &Path) -> Result<CandidateProfile> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut candidate: CandidateProfile = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    candidate.resume_text = normalize_resume_text(&candidate.resume_text);
    candidate.keywords = candidate
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    Ok(candidate)
}

/// 从文件夹中加载所有候选人 TOML 文件（按文件名排序）
///
/// 解析失败的文件会被跳过并记录警告
pub async fn load_all_candidates(folder_path: &str) -> Result<Vec<CandidateProfile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut candidates = Vec::with_capacity(toml_files.len());
    for path in toml_files {
        match load_candidate(&path).await {
            Ok(candidate) => {
                tracing::debug!("成功加载候选人: {}", candidate.id);
                candidates.push(candidate);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(candidates)
}
