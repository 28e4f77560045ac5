pub mod openai_oracle;
pub mod oracle;

pub use openai_oracle::OpenAiOracle;
pub use oracle::{OracleRequest, RawScoreSheet, ScoringOracle};
