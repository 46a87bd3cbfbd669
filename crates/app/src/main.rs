mod repl;
mod terminal;

use chrono::Utc;
use clap::{Parser, Subcommand};
use hadith_panel_core::{
    Completion, HttpQueryClient, Mode, PanelConfig, QueryBackend, QueryPanel, ResponseTrust,
    SubmitOutcome, DEFAULT_BASE_URL,
};
use std::process::ExitCode;
use std::sync::Arc;
use terminal::{paint_notification, TerminalPainter};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "hadith-panel", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the Hadith search backend
    #[arg(long, env = "HADITH_PANEL_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// How much of the backend's answer markup to keep: allowlist, escape or trusted
    #[arg(long, default_value = "allowlist")]
    response_trust: ResponseTrust,

    /// Quick query offered by the panel. Repeat to add more.
    #[arg(long = "preset")]
    presets: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask one question and print the rendered answer.
    Ask {
        /// Question text
        #[arg(long)]
        query: String,
        /// Answer verbosity: concise or detailed.
        #[arg(long, default_value = "concise")]
        mode: Mode,
        /// Show full hadith text instead of the collapsed list.
        #[arg(long, default_value_t = false)]
        expanded: bool,
    },
    /// Interactive panel reading questions from stdin.
    Repl {
        /// Initial answer verbosity.
        #[arg(long, default_value = "concise")]
        mode: Mode,
    },
    /// Check that the backend is up and has loaded its collection.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = PanelConfig::from_base_url(&cli.base_url)?
        .with_presets(cli.presets)
        .with_response_trust(cli.response_trust);
    let client = HttpQueryClient::from_config(&config);

    info!(
        version = app_version,
        backend = %client.base_url(),
        started_at = %Utc::now().to_rfc3339(),
        "hadith-panel boot"
    );

    match cli.command {
        Command::Ask {
            query,
            mode,
            expanded,
        } => {
            let painter = TerminalPainter::new()?;
            let mut panel = QueryPanel::new(config)?;
            panel.set_mode(mode);

            let outcome = panel.submit_query(&client, &query).await;
            if expanded {
                panel.toggle_hadiths_expansion();
            }

            let view = panel.view();
            for notification in &view.notifications {
                eprintln!(
                    "{}",
                    paint_notification(notification.severity, &notification.message)
                );
            }
            print!("{}", painter.paint(&view));

            // The notification above already told the user what went wrong.
            if !matches!(outcome, SubmitOutcome::Completed(Completion::Shown(_))) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Repl { mode } => {
            let mut panel = QueryPanel::new(config)?;
            panel.set_mode(mode);
            repl::run(&mut panel, Arc::new(client)).await?;
        }
        Command::Health => {
            let health = client.health().await?;
            println!(
                "status={} hadiths_loaded={}",
                health.status, health.hadiths_loaded
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
