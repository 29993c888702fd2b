mod command;
mod render;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use glimpse_application::{ImageChatService, SessionManager};
use glimpse_core::inference::{CaptionGateway, ChatResponder, ImageAnalyzer, VisionChatGateway};
use glimpse_infrastructure::{ConfigServiceImpl, SecretServiceImpl, load_gateway_config};
use glimpse_interaction::{ConfiguredGateway, GeminiBackend, HuggingFaceCaptionBackend};

use command::{COMMANDS, Command};

const DEFAULT_LOG_FILTER: &str = concat!(
    "glimpse=info,glimpse_core=info,glimpse_infrastructure=info,",
    "glimpse_interaction=info,glimpse_application=info"
);

/// Rustyline helper: slash-command completion and hints, file-name completion
/// after `/upload`.
struct CliHelper {
    commands: Vec<String>,
    files: FilenameCompleter,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            files: FilenameCompleter::new(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if line[..pos].starts_with("/upload ") {
            return self.files.complete(line, pos, ctx);
        }

        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

type VisionGateway = VisionChatGateway<GeminiBackend>;
type CaptionOnlyGateway = CaptionGateway<HuggingFaceCaptionBackend>;

/// One session plus the registry that owns it.
struct Repl<G> {
    manager: SessionManager<G>,
    service: Arc<ImageChatService<G>>,
}

impl<G: ImageAnalyzer + Clone> Repl<G> {
    async fn start(gateway: G) -> Self {
        let manager = SessionManager::new(gateway);
        let service = manager.create_session().await;
        Self { manager, service }
    }

    async fn upload(&self, paths: &[PathBuf]) {
        for path in paths {
            println!("{}", format!("Analyzing {}...", path.display()).bright_black());
            match self.service.upload_file(path).await {
                Ok(outcome) => {
                    println!(
                        "{}",
                        format!("Uploaded #{}: {}", outcome.index + 1, outcome.name).bright_green()
                    );
                    for line in render::annotation(&outcome.annotation) {
                        println!("  {line}");
                    }
                }
                Err(err) => eprintln!("{}", format!("{}: {err}", path.display()).red()),
            }
        }
    }

    async fn handle(&self, command: Command) -> Result<()> {
        match command {
            Command::Upload(paths) => self.upload(&paths).await,
            Command::Images => {
                let session = self.service.snapshot().await;
                if session.images().is_empty() {
                    println!("{}", "No images uploaded yet.".bright_black());
                }
                for line in render::images(&session) {
                    println!("{line}");
                }
            }
            Command::Select(index) => {
                self.service.select_image(index).await?;
                println!("{}", format!("Image #{} is now active.", index + 1).bright_green());
            }
            Command::Show => {
                let session = self.service.snapshot().await;
                match session.active_image() {
                    Some(image) => {
                        println!("{}", image.name().bold());
                        match image.annotation() {
                            Some(annotation) => {
                                for line in render::annotation(annotation) {
                                    println!("  {line}");
                                }
                            }
                            None => println!("{}", "  (no annotation)".bright_black()),
                        }
                    }
                    None => println!("{}", "No active image.".bright_black()),
                }
            }
            Command::History => {
                let session = self.service.snapshot().await;
                for entry in session.chat_history() {
                    println!("{}", render::chat_entry(entry));
                }
            }
            Command::Sessions => {
                for summary in self.manager.list_sessions().await {
                    println!(
                        "{} ({} images, {} messages, since {})",
                        summary.id, summary.image_count, summary.message_count, summary.created_at
                    );
                }
            }
            Command::Help => print_help(),
            Command::Quit | Command::Chat(_) => {}
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let session_id = self.service.session_id().await;
        self.manager.close_session(&session_id).await?;
        Ok(())
    }
}

impl<G: ImageAnalyzer + ChatResponder + Clone> Repl<G> {
    async fn chat(&self, text: &str) -> Result<()> {
        let reply = self.service.send_message(text).await?;
        println!("{} {}", "Bot:".bright_blue().bold(), render::reply(&reply));
        Ok(())
    }
}

/// The REPL for whichever backend the configuration selected.
///
/// Chat is only reachable through the vision-chat variant.
enum Frontend {
    VisionChat(Repl<VisionGateway>),
    CaptionOnly(Repl<CaptionOnlyGateway>),
}

impl Frontend {
    async fn start(gateway: ConfiguredGateway) -> Self {
        match gateway {
            ConfiguredGateway::VisionChat(g) => Frontend::VisionChat(Repl::start(g).await),
            ConfiguredGateway::CaptionOnly(g) => Frontend::CaptionOnly(Repl::start(g).await),
        }
    }

    async fn handle(&self, command: Command) -> Result<()> {
        match (self, command) {
            (Frontend::VisionChat(repl), Command::Chat(text)) => repl.chat(&text).await,
            (Frontend::CaptionOnly(_), Command::Chat(_)) => {
                println!(
                    "{}",
                    "Chat is not available with the caption-only backend. Use /upload instead."
                        .yellow()
                );
                Ok(())
            }
            (Frontend::VisionChat(repl), command) => repl.handle(command).await,
            (Frontend::CaptionOnly(repl), command) => repl.handle(command).await,
        }
    }

    async fn close(&self) -> Result<()> {
        match self {
            Frontend::VisionChat(repl) => repl.close().await,
            Frontend::CaptionOnly(repl) => repl.close().await,
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  /upload <path>...  upload png, jpg, jpeg or webp images");
    println!("  /images            list uploaded images (* marks the active one)");
    println!("  /select <n>        make image n active");
    println!("  /show              show the active image's annotation");
    println!("  /history           print the chat transcript");
    println!("  /sessions          list open sessions");
    println!("  /quit              exit");
    println!("  anything else      chat about the active image");
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // ===== Configuration =====
    let config_service = ConfigServiceImpl::new().context("Failed to locate config.toml")?;
    let secret_service = SecretServiceImpl::new().context("Failed to locate secret.json")?;
    let gateway_config = load_gateway_config(&config_service, &secret_service)
        .await
        .context("Failed to load gateway configuration")?;

    let frontend = Frontend::start(ConfiguredGateway::from_config(&gateway_config)).await;

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Glimpse ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Backend: {} ({}). Type /help for commands.",
            gateway_config.backend_kind, gateway_config.model_name
        )
        .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        let command = match Command::parse(trimmed) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.bright_black());
                continue;
            }
        };
        if command == Command::Quit {
            println!("{}", "Goodbye!".bright_green());
            break;
        }

        // Dropping the request future on CTRL-C cancels it before it writes.
        tokio::select! {
            result = frontend.handle(command) => {
                if let Err(err) = result {
                    eprintln!("{}", format!("Error: {err}").red());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Request cancelled.".yellow());
            }
        }
    }

    frontend.close().await?;
    Ok(())
}
