pub mod toml_loader;

pub use toml_loader::{load_all_candidates, load_candidate, load_job};
