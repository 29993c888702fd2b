//! REPL command parsing.

use std::path::PathBuf;

pub const COMMANDS: [&str; 8] = [
    "/upload", "/images", "/select", "/show", "/history", "/sessions", "/help", "/quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upload one or more image files
    Upload(Vec<PathBuf>),
    /// List uploaded images
    Images,
    /// Make an image active (zero-based index)
    Select(usize),
    /// Show the active image's annotation
    Show,
    /// Print the chat transcript
    History,
    /// List open sessions
    Sessions,
    Help,
    Quit,
    /// Free text sent to the model
    Chat(String),
}

impl Command {
    /// Parses one input line. Returns an error message for bad commands.
    ///
    /// Image numbers are one-based on the command line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if !line.starts_with('/') {
            return Ok(Command::Chat(line.to_string()));
        }

        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match name {
            "/upload" if args.is_empty() => Err("Usage: /upload <path>...".into()),
            "/upload" => Ok(Command::Upload(args.into_iter().map(PathBuf::from).collect())),
            "/images" => Ok(Command::Images),
            "/select" => match args.as_slice() {
                [number] => match number.parse::<usize>() {
                    Ok(n) if n >= 1 => Ok(Command::Select(n - 1)),
                    _ => Err(format!("Invalid image number: {number}")),
                },
                _ => Err("Usage: /select <n>".into()),
            },
            "/show" => Ok(Command::Show),
            "/history" => Ok(Command::History),
            "/sessions" => Ok(Command::Sessions),
            "/help" => Ok(Command::Help),
            "/quit" | "/exit" => Ok(Command::Quit),
            other => Err(format!("Unknown command: {other}")),
        }
    }
}
