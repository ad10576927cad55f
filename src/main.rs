//! Crypto news pipeline: binary entrypoint.
//! Loads settings, opens storage, runs the pipeline once and exits.

use std::sync::Arc;

use anyhow::Context;
use crypto_news_pipeline::{
    config::Settings, logging, metrics::Metrics, CryptoNewsProvider, OpenAiClassifier, Pipeline,
    PgNewsStore, TelegramNotifier,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            logging::init(None);
            tracing::error!(error = %e, "configuration validation failed");
            std::process::exit(1);
        }
    };
    logging::init(Some(&settings));
    tracing::info!(
        app = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        "configuration loaded"
    );

    let metrics = match &settings.metrics_textfile {
        Some(_) => Some(Metrics::install()?),
        None => None,
    };

    let http = reqwest::Client::builder()
        .user_agent(format!("{}/{}", settings.app_name, settings.app_version))
        .connect_timeout(settings.http_timeout.min(std::time::Duration::from_secs(10)))
        .timeout(settings.http_timeout)
        .build()
        .context("building http client")?;

    let store = Arc::new(
        PgNewsStore::connect(&settings.db_uri, &settings.db_name, settings.http_timeout)
            .context("parsing database uri")?,
    );
    // An unreachable database is not fatal: the cache step will see the same error
    // and the run degrades to an empty batch.
    if let Err(e) = store.init().await {
        tracing::error!(error = %e, "failed to initialize news collection");
    }

    let pipeline = Pipeline::new(
        Arc::new(CryptoNewsProvider::from_url(
            settings.news_url.clone(),
            settings.news_api_key.clone(),
            http.clone(),
        )),
        store.clone(),
        Arc::new(OpenAiClassifier::new(
            http.clone(),
            settings.model_api_key.clone(),
            settings.model_name.clone(),
            settings.model_base_url.clone(),
        )),
        Arc::new(TelegramNotifier::new(
            http,
            settings.telegram_api_url.clone(),
            settings.bot_token.clone(),
            settings.group_id.clone(),
        )),
    );

    pipeline.run().await;
    store.close().await;

    if let (Some(m), Some(path)) = (&metrics, &settings.metrics_textfile) {
        if let Err(e) = m.write_textfile(path) {
            tracing::warn!(error = ?e, "could not write metrics textfile");
        }
    }
    Ok(())
}
