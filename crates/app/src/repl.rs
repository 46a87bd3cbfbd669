use crate::terminal::{paint_notification, TerminalPainter};
use hadith_panel_core::{
    Completion, Effect, Mode, PanelError, QueryBackend, QueryPanel, QueryResponse, Submission,
};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Submit(String),
    SetMode(Mode),
    Toggle,
    /// Zero-based preset index.
    Preset(usize),
    ListPresets,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ReplCommand, PanelError> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Ok(ReplCommand::Submit(line.to_string()));
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    match name {
        "mode" => Ok(ReplCommand::SetMode(argument.parse()?)),
        "toggle" => Ok(ReplCommand::Toggle),
        "preset" => argument
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .map(ReplCommand::Preset)
            .ok_or_else(|| {
                PanelError::InvalidArgument(format!("preset number expected, got {argument:?}"))
            }),
        "presets" => Ok(ReplCommand::ListPresets),
        "help" => Ok(ReplCommand::Help),
        "quit" | "q" | "exit" => Ok(ReplCommand::Quit),
        other => Err(PanelError::InvalidArgument(format!("unknown command :{other}"))),
    }
}

const HELP: &str = "type a question to search, or:
  :mode concise|detailed   choose answer verbosity
  :toggle                  show or hide hadith details
  :preset <n>              run quick query n
  :presets                 list quick queries
  :quit                    leave";

/// Drives the panel from stdin. Requests run on their own task so input keeps
/// flowing; anything submitted meanwhile is dropped by the panel.
pub async fn run<B>(panel: &mut QueryPanel, backend: Arc<B>) -> anyhow::Result<()>
where
    B: QueryBackend + Send + Sync + 'static,
{
    let input = BufReader::new(tokio::io::stdin());
    run_with(panel, backend, input, std::io::stdout()).await
}

pub async fn run_with<B, R, W>(
    panel: &mut QueryPanel,
    backend: Arc<B>,
    input: R,
    mut out: W,
) -> anyhow::Result<()>
where
    B: QueryBackend + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let painter = TerminalPainter::new()?;
    let mut lines = input.lines();
    let (results_tx, mut results_rx) = mpsc::unbounded_channel::<Result<QueryResponse, PanelError>>();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    let mut scroll_at: Option<Instant> = None;
    let mut last_notification = 0u64;

    writeln!(out, "{HELP}")?;
    write!(out, "{}", painter.paint(&panel.view()))?;
    out.flush()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(error) => {
                        writeln!(out, "{error}")?;
                        out.flush()?;
                        continue;
                    }
                };

                let submission = match command {
                    ReplCommand::Quit => break,
                    ReplCommand::Help => {
                        writeln!(out, "{HELP}")?;
                        None
                    }
                    ReplCommand::ListPresets => {
                        for (index, preset) in panel.config().presets.iter().enumerate() {
                            writeln!(out, "  {}. {preset}", index + 1)?;
                        }
                        None
                    }
                    ReplCommand::SetMode(mode) => {
                        panel.set_mode(mode);
                        write!(out, "{}", painter.paint(&panel.view()))?;
                        None
                    }
                    ReplCommand::Toggle => {
                        panel.toggle_hadiths_expansion();
                        write!(out, "{}", painter.paint(&panel.view()))?;
                        None
                    }
                    ReplCommand::Preset(index) => match panel.select_preset(index) {
                        Some(submission) => Some(submission),
                        None => {
                            writeln!(out, "no preset {}", index + 1)?;
                            None
                        }
                    },
                    ReplCommand::Submit(text) => Some(panel.begin_submit(&text)),
                };

                match submission {
                    Some(Submission::Started(request)) => {
                        let backend = Arc::clone(&backend);
                        let results_tx = results_tx.clone();
                        tokio::spawn(async move {
                            let result = backend.query(&request).await;
                            let _ = results_tx.send(result);
                        });
                        write!(out, "{}", painter.paint(&panel.view()))?;
                    }
                    Some(Submission::Rejected(rejection)) => {
                        debug!(?rejection, "submission rejected");
                    }
                    None => {}
                }
            }
            Some(result) = results_rx.recv() => {
                match panel.finish_submit(result) {
                    Completion::Shown(effects) => {
                        for effect in effects {
                            match effect {
                                Effect::ScrollToResults { after } => {
                                    scroll_at = Some(Instant::now() + after);
                                }
                            }
                        }
                    }
                    Completion::Failed | Completion::Ignored => {
                        write!(out, "{}", painter.paint(&panel.view()))?;
                    }
                }
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                panel.tick(now);
                if scroll_at.is_some_and(|at| at <= now) {
                    scroll_at = None;
                    write!(out, "{}", painter.paint(&panel.view_at(now)))?;
                }
            }
        }

        for notification in panel.notifications().active(Instant::now()) {
            if notification.id > last_notification {
                last_notification = notification.id;
                writeln!(
                    out,
                    "{}",
                    paint_notification(notification.severity, &notification.message)
                )?;
            }
        }
        out.flush()?;
    }

    if panel.is_loading() {
        info!("leaving with a request still in flight");
    }
    Ok(())
}
