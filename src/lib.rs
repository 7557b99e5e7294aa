pub mod answer;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod prompt;
pub mod request;
pub mod text_bank;

use std::sync::LazyLock;

use tracing_subscriber::EnvFilter;

pub use answer::{Answer, EvidenceType, Meta, MissingField};
pub use config::{Config, PipelineConfig, RuntimeConfig};
pub use error::{AnswerError, Result};
pub use pipeline::{FallbackContext, Normalizer};
pub use text_bank::{Locale, Mode};

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// Normalize a raw completion with the default pipeline configuration.
pub fn normalize_answer(raw: &str) -> Answer {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// Install the stderr tracing subscriber from `ANSWER_LOG` / `RUST_LOG`.
///
/// Call before [`Config::load`] so its warnings about a missing file or bad
/// overrides are printed.
pub fn init_tracing() -> RuntimeConfig {
    config::load_env_file();
    init_tracing_from(|key| std::env::var(key).ok())
}

pub fn init_tracing_from(lookup: impl Fn(&str) -> Option<String>) -> RuntimeConfig {
    let runtime = RuntimeConfig::from_lookup(lookup);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&runtime.log_level))
        .with_writer(std::io::stderr)
        .try_init();
    runtime
}
