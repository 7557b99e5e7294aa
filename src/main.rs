use std::sync::Arc;

use anyhow::Result;
use answer_normalizer::clients::{CompletionClient, OpenAiClient};
use answer_normalizer::config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    answer_normalizer::init_tracing();
    let config = Config::load()?;

    if config.runtime.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; every request will get the canned answer");
    }

    let client = OpenAiClient::new(&config.completion, config.runtime.openai_api_key.clone())?;
    info!(
        model = client.model(),
        language = config.pipeline.language.as_str(),
        "Starting answer service"
    );
    let client: Arc<dyn CompletionClient> = Arc::new(client);

    answer_normalizer::http::start_http_server(&config, client).await?;
    Ok(())
}
