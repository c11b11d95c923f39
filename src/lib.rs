pub mod chat;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod llm;
pub mod models;
pub mod trace;

use anyhow::{Result, anyhow};
use chat::ChatSession;
use cli::{AppState, CliArgs, run_tui};
use config::{AppConfig, parse_model};
use dispatch::Dispatcher;
use http::client::HttpClient;
use http::redact::HttpLogConfig;
use llm::gemini::GeminiProvider;
use models::{MODEL_OPTIONS, ModelOption};
use std::time::{SystemTime, UNIX_EPOCH};
use trace::SessionTrace;

const MISSING_KEY_NOTICE: &str = "Gemini API key not found. Set GOOGLE_API_KEY (or google_api_key in config.toml) to enable live gemini-pro replies; other models answer in demo mode.";

pub async fn run(args: CliArgs) -> Result<()> {
    if args.list_models {
        print!("{}", catalog_listing());
        return Ok(());
    }

    let config = AppConfig::load_with_path(args.config.as_deref())?;
    let initial_model = initial_model(args.model.as_deref(), &config)?;
    let session_id = generate_session_id();
    let trace = SessionTrace::create(&session_id)?;

    let http = HttpClient::new(
        reqwest::Client::new(),
        HttpLogConfig::new(config.redact_trace_secrets),
    )
    .with_trace(trace.clone());
    let gemini = GeminiProvider::new(
        http,
        config.google_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
    )
    .ok();

    let startup_notice = gemini.is_none().then(|| MISSING_KEY_NOTICE.to_string());
    trace.log_session_start(&session_id, initial_model, gemini.is_some());
    if let Some(notice) = &startup_notice {
        trace.log_info(notice);
    }

    let state = AppState {
        session_id,
        session: ChatSession::new(initial_model),
        dispatcher: Dispatcher::new(gemini),
        theme_config: config.theme.clone(),
        trace,
        startup_notice,
    };

    run_tui(state).await
}

/// `--model` wins over the configured default.
fn initial_model(cli_model: Option<&str>, config: &AppConfig) -> Result<ModelOption> {
    match cli_model {
        Some(name) => parse_model(name).map_err(|reason| anyhow!("Invalid --model: {reason}")),
        None => Ok(config.default_model),
    }
}

fn catalog_listing() -> String {
    MODEL_OPTIONS
        .iter()
        .map(|model| {
            let mode = if model.is_remote() { "live" } else { "demo" };
            format!("{:<16} {:<28} {mode}\n", model.id, model.label)
        })
        .collect()
}

fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}
