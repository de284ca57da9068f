//! services/tracker/src/bootstrap.rs
//!
//! Startup wiring for an embedding front end: logging, the local store, the
//! session marker and the AI adapters, assembled into a `Tracker`.

use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use study_os_core::ports::PlanGenerationService;
use study_os_core::ResilientAnalyzer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::adapters::{FileSessionRegistry, OpenAiAnalysisAdapter, OpenAiPlanAdapter, SqliteStore};
use crate::app::Tracker;
use crate::config::Config;
use crate::error::TrackerError;

/// Installs the global `tracing` subscriber at the configured level. A second
/// call is a no-op.
pub fn init_tracing(config: &Config) {
    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
    if installed.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Builds the OpenAI-compatible client, or `None` when no key is configured.
fn openai_client(config: &Config) -> Option<Client<OpenAIConfig>> {
    let api_key = config.openai_api_key.as_ref()?;
    let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(api_base) = &config.openai_api_base {
        openai_config = openai_config.with_api_base(api_base);
    }
    Some(Client::with_config(openai_config))
}

/// Connects every adapter and returns the ready-to-use tracker.
pub async fn build_tracker(config: &Config) -> Result<Tracker, TrackerError> {
    // --- 1. Local store & migrations ---
    let store = SqliteStore::connect(&config.database_url).await?;
    info!("Running local store migrations...");
    store.run_migrations().await?;
    info!("Local store migrations complete.");

    // --- 2. Session marker ---
    let registry = FileSessionRegistry::new(config.session_file.clone());
    info!(path = %registry.path().display(), "Using session marker file.");

    // --- 3. AI adapters ---
    let (analyzer, planner) = match openai_client(config) {
        Some(client) => {
            let analysis = Arc::new(OpenAiAnalysisAdapter::new(
                client.clone(),
                config.analysis_model.clone(),
            ));
            let planner: Arc<dyn PlanGenerationService> =
                Arc::new(OpenAiPlanAdapter::new(client, config.plan_model.clone()));
            (
                ResilientAnalyzer::new(analysis, config.ai_timeout),
                Some(planner),
            )
        }
        None => {
            warn!("OPENAI_API_KEY is not set; days will be closed with the fallback verdict and plan generation is disabled");
            (ResilientAnalyzer::offline(), None)
        }
    };

    Ok(Tracker::new(
        Arc::new(store),
        Arc::new(registry),
        analyzer,
        planner,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_offline_tracker() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            session_file: dir.path().join("session"),
            ..Config::default()
        };
        init_tracing(&config);

        let tracker = build_tracker(&config).await.unwrap();
        let session = tracker.register("alice").await.unwrap();
        let err = tracker.generate_plan(&session, 5.0, "").await.unwrap_err();
        assert!(matches!(err, TrackerError::PlanUnavailable(_)));
        assert!(dir.path().join("session").exists());
    }

    #[test]
    fn test_client_requires_key() {
        assert!(openai_client(&Config::default()).is_none());
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            openai_api_base: Some("http://localhost:8080/v1".to_string()),
            ..Config::default()
        };
        assert!(openai_client(&config).is_some());
    }
}
