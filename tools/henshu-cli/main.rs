use clap::{Parser, Subcommand};
use henshu::diagnostics::LintReport;
use henshu::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Edits integration and automation documents through a JSON-lines message protocol
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the editor configuration YAML (defaults are used when it does not exist)
    #[arg(short, long, default_value = "henshu.yml")]
    config: PathBuf,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Print the full render of a document as one replace instruction
    Render { document: PathBuf },
    /// Apply recorded messages from a JSON-lines file, printing every outbound message
    Replay {
        document: PathBuf,
        messages: PathBuf,
        /// Save the document after the last message
        #[arg(long)]
        save: bool,
    },
    /// Run a session over stdin (inbound messages) and stdout (outbound messages)
    Serve { document: PathBuf },
    /// Show the findings of a lint report for a document
    Lint { document: PathBuf, report: PathBuf },
}

/// A display surface that writes each outbound message as one JSON line on stdout.
struct StdoutSurface {
    out: io::Stdout,
}

impl StdoutSurface {
    fn new() -> Self {
        Self { out: io::stdout() }
    }

    fn emit(&mut self, message: &impl Serialize) {
        let line = match serde_json::to_string(message) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "could not encode outbound message");
                return;
            }
        };
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!(error = %e, "could not write outbound message");
        }
    }
}

impl DisplaySurface for StdoutSurface {
    fn post(&mut self, instruction: Instruction) {
        self.emit(&instruction);
    }

    fn notify(&mut self, notice: Notice) {
        self.emit(&notice);
    }
}

fn main() {
    let cli = Cli::parse();

    let config = EditorConfig::load_or_default(&cli.config).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load config '{}': {}",
            cli.config.display(),
            e
        ))
    });
    init_logging(&config.log_filter);
    debug!(?config, "configuration loaded");

    match cli.mode {
        Mode::Render { document } => {
            let mut controller = open_controller(&document, &config);
            show_or_exit(&mut controller);
        }
        Mode::Replay {
            document,
            messages,
            save,
        } => {
            let file = File::open(&messages).unwrap_or_else(|e| {
                exit_with_error(&format!(
                    "Failed to read messages '{}': {}",
                    messages.display(),
                    e
                ))
            });
            let controller = open_controller(&document, &config);
            run_session(controller, BufReader::new(file), save || config.save_on_close);
        }
        Mode::Serve { document } => {
            let mut controller = open_controller(&document, &config);
            show_or_exit(&mut controller);
            run_session(
                controller,
                BufReader::new(io::stdin()),
                config.save_on_close,
            );
        }
        Mode::Lint { document, report } => {
            let text = fs::read_to_string(&report).unwrap_or_else(|e| {
                exit_with_error(&format!(
                    "Failed to read lint report '{}': {}",
                    report.display(),
                    e
                ))
            });
            let report = LintReport::from_json_str(&text)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse lint report: {}", e)));
            let mut controller = open_controller(&document, &config);
            controller.surface_diagnostics(&report);
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_controller(
    path: &Path,
    config: &EditorConfig,
) -> Controller<StdoutSurface, YamlFilePersistence> {
    let session = Session::open(path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to open document '{}': {}",
            path.display(),
            e
        ))
    });
    let renderer = Renderer::new(config.new_elements.clone());
    Controller::new(session, renderer, StdoutSurface::new(), YamlFilePersistence)
}

fn show_or_exit(controller: &mut Controller<StdoutSurface, YamlFilePersistence>) {
    if let Err(e) = controller.show() {
        exit_with_error(&format!("Failed to render document: {}", e));
    }
}

/// Feeds `input` line by line into the controller's message loop from a reader thread.
/// Lines that are not JSON are skipped.
fn run_session<R>(
    controller: Controller<StdoutSurface, YamlFilePersistence>,
    input: R,
    save_on_close: bool,
) where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel::<Value>();
    let reader = thread::spawn(move || {
        for (number, line) in input.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "stopped reading messages");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&line) {
                Ok(message) => {
                    if sender.send(message).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(line = number + 1, error = %e, "skipping non-JSON input"),
            }
        }
    });

    let (session, mut surface, mut persistence) = controller.run(receiver);
    if reader.join().is_err() {
        warn!("message reader panicked");
    }

    info!(dirty = session.is_dirty(), "input closed");
    if save_on_close && session.is_dirty() {
        match persistence.save(session.path(), session.document()) {
            Ok(()) => surface.notify(Notice::info(format!("Saved {}", session.path().display()))),
            Err(e) => surface.notify(Notice::error(e.to_string())),
        }
    }
    session.close();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
