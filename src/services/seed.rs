//! 确定性种子派生
//!
//! 种子 = SHA-256(job_id ␟ candidate_id ␟ 权重摘要) 的前 8 个字节，
//! 按大端序解释并清除最高位，保证是非负的 `i64`。

use sha2::{Digest, Sha256};

use crate::services::weight_profile::WeightProfile;

const SEPARATOR: u8 = 0x1f;

pub fn derive_seed(job_id: &str, candidate_id: &str, weights: &WeightProfile) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(job_id.as_bytes());
    hasher.update([SEPARATOR]);
    hasher.update(candidate_id.as_bytes());
    hasher.update([SEPARATOR]);
    hasher.update(weights.digest().as_bytes());
    let hash = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    (u64::from_be_bytes(bytes) & i64::MAX as u64) as i64
}
