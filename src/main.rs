use std::sync::Arc;

use anyhow::{Context, Result};
use jin::{
    agent::{GenerationPort, UnavailableGenerator, adapters::OpenAiCompatibleGenerator},
    arena::{MatchCollaborators, MatchEngine, MatchEvent, MatchRules, MatchRuntime},
    cli::args_from_env,
    config::Config,
    logging::init_tracing,
};
use tokio::signal::unix::{SignalKind, signal};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let args = args_from_env()?;
    let config = Config::load(&args.config_path)
        .with_context(|| format!("failed to load config from {}", args.config_path.display()))?;
    let _logging_guard = init_tracing(&config.logging)?;

    let rules = MatchRules::from_config(&config.r#match)?;
    let mut engine = MatchEngine::new(Uuid::now_v7().to_string(), rules);
    engine.add_bot_players(args.bots.unwrap_or(config.demo.bots))?;

    let generator: Arc<dyn GenerationPort> = if config.generation.enabled {
        Arc::new(OpenAiCompatibleGenerator::from_config(&config.generation)?)
    } else {
        tracing::info!(target: "jin", "generation_disabled_using_fallback_lines");
        Arc::new(UnavailableGenerator)
    };
    let collaborators = MatchCollaborators {
        generator,
        ..MatchCollaborators::default()
    };

    let mut launched = MatchRuntime::launch(engine, collaborators, config.runtime_settings())?;
    let handle = launched.handle.clone();

    let mut sigint = signal(SignalKind::interrupt()).context("failed to listen for SIGINT")?;
    let mut sigterm = signal(SignalKind::terminate()).context("failed to listen for SIGTERM")?;

    loop {
        tokio::select! {
            event = launched.events.recv() => match event {
                Some(MatchEvent::MatchEnded { winner, .. }) => {
                    tracing::info!(target: "jin", winner = ?winner, "demo_match_ended");
                    break;
                }
                Some(event) => log_event(&event),
                None => break,
            },
            _ = sigint.recv() => {
                tracing::info!(target: "jin", signal = "SIGINT", "shutdown_signal_received");
                break;
            }
            _ = sigterm.recv() => {
                tracing::info!(target: "jin", signal = "SIGTERM", "shutdown_signal_received");
                break;
            }
        }
    }

    // The task may already be gone after MatchEnded.
    let _ = handle.shutdown().await;
    let outcome = launched
        .task
        .await
        .context("match task terminated abnormally")?;
    tracing::info!(
        target: "jin",
        match_id = %outcome.match_id,
        winner = ?outcome.winner,
        participants = outcome.participants.len(),
        "demo_match_closed"
    );
    Ok(())
}

fn log_event(event: &MatchEvent) {
    match serde_json::to_string(event) {
        Ok(payload) => tracing::info!(target: "jin", event = %payload, "match_event"),
        Err(err) => tracing::warn!(target: "jin", error = %err, "match_event_encode_failed"),
    }
}
