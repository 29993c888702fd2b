//! Terminal rendering of session state.

use colored::{ColoredString, Colorize};
use glimpse_core::inference::{InferenceReply, ReplyKind};
use glimpse_core::session::{Annotation, ChatEntry, Session, Speaker};

/// Reply text, dimmed and tagged when it is a placeholder.
pub fn reply(reply: &InferenceReply) -> ColoredString {
    match reply.kind {
        ReplyKind::Answer => reply.text.bright_blue(),
        kind => format!("{} ({})", reply.text, kind.label()).yellow(),
    }
}

pub fn annotation(annotation: &Annotation) -> Vec<String> {
    match annotation {
        Annotation::Caption(caption) => {
            vec![format!("{} {}", "Caption:".bold(), reply(caption))]
        }
        Annotation::Analysis(analysis) => analysis
            .fields()
            .map(|(field, value)| {
                format!("{} {}", format!("{}:", field.label()).bold(), reply(value))
            })
            .collect(),
    }
}

pub fn images(session: &Session) -> Vec<String> {
    session
        .images()
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let marker = if session.active_index() == Some(index) { "*" } else { " " };
            let status = if image.is_annotated() { "" } else { " (no annotation)" };
            format!(
                "{marker} {}. {} [{}, {} bytes]{status}",
                index + 1,
                image.name(),
                image.mime_type(),
                image.size()
            )
        })
        .collect()
}

pub fn chat_entry(entry: &ChatEntry) -> String {
    let label = format!("{}:", entry.speaker.label());
    match (entry.speaker, entry.kind) {
        (Speaker::User, _) => format!("{} {}", label.green().bold(), entry.text.green()),
        (Speaker::Assistant, Some(kind)) => {
            let text = InferenceReply {
                kind,
                text: entry.text.clone(),
            };
            format!("{} {}", label.bright_blue().bold(), reply(&text))
        }
        (Speaker::Assistant, None) => format!("{} {}", label.bright_blue().bold(), entry.text),
    }
}
