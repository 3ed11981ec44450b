//! Property valuation gateway server.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use property_valuation::adapters::ai::{
    AnthropicConfig, AnthropicProvider, FailoverAIProvider, OpenAIConfig, OpenAIProvider,
};
use property_valuation::adapters::email::{ResendConfig, ResendEmailSender};
use property_valuation::adapters::http::{build_router, NotificationAppState, ValuationAppState};
use property_valuation::config::{AiConfig, AiProvider, AppConfig, ConfigError, ValidationError};
use property_valuation::ports::AIProvider;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "server exited with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_logging(&config);
    config.validate()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "starting property valuation gateway"
    );

    let ai_provider = build_ai_provider(&config.ai);
    let email_sender = ResendEmailSender::new(
        ResendConfig::new(config.email.resend_api_key.clone(), config.email.from_header())
            .with_base_url(config.email.base_url.clone()),
    );

    let router = build_router(
        ValuationAppState::new(ai_provider, config.ai.max_tokens),
        NotificationAppState::new(Arc::new(email_sender), config.email.notify_to.clone()),
        &config.server,
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router).await?;
    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Primary provider, wrapped with the fallback when one is configured and keyed.
fn build_ai_provider(ai: &AiConfig) -> Arc<dyn AIProvider> {
    let primary = provider_for(ai, ai.primary_provider);

    match ai.fallback_provider {
        Some(fallback) if fallback != ai.primary_provider && ai.has_key_for(fallback) => {
            info!(primary = ?ai.primary_provider, fallback = ?fallback, "AI failover enabled");
            Arc::new(FailoverAIProvider::new(primary).with_fallback(provider_for(ai, fallback)))
        }
        _ => primary,
    }
}

fn provider_for(ai: &AiConfig, provider: AiProvider) -> Arc<dyn AIProvider> {
    match provider {
        AiProvider::OpenAI => {
            let mut config = OpenAIConfig::new(ai.openai_api_key.clone().unwrap_or_default())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries)
                .with_retry_base_delay(ai.retry_base_delay());
            if let Some(model) = &ai.openai_model {
                config = config.with_model(model.clone());
            }
            Arc::new(OpenAIProvider::new(config))
        }
        AiProvider::Anthropic => {
            let mut config =
                AnthropicConfig::new(ai.anthropic_api_key.clone().unwrap_or_default())
                    .with_timeout(ai.timeout())
                    .with_max_retries(ai.max_retries)
                    .with_retry_base_delay(ai.retry_base_delay());
            if let Some(model) = &ai.anthropic_model {
                config = config.with_model(model.clone());
            }
            Arc::new(AnthropicProvider::new(config))
        }
    }
}
