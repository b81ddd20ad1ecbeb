//! Plain-text rendering for the terminal client

use cluezy_core::{ChatPage, QuestionOutcome, Section, ToolInvocation, ToolOutput};
use serde_json::Value;

/// Width of the id prefix shown next to messages and chats
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// One-line description of a tool call as it starts
pub fn tool_call(invocation: &ToolInvocation) -> String {
    let args = &invocation.args;
    let subject = ["query", "url", "location", "timezone", "question"]
        .iter()
        .find_map(|key| args.get(*key).and_then(Value::as_str));
    match subject {
        Some(subject) => format!("[{}] {}", invocation.tool_name, subject),
        None => format!("[{}]", invocation.tool_name),
    }
}

/// One-line summary of a tool result
pub fn tool_result(output: &ToolOutput) -> String {
    match output {
        ToolOutput::Search(r) | ToolOutput::Retrieve(r) => count(r.results.len(), "result"),
        ToolOutput::AcademicSearch(r) => count(r.results.len(), "paper"),
        ToolOutput::VideoSearch(r) => count(r.videos.len(), "video"),
        ToolOutput::ProductSearch(r) => count(r.visual_matches.len(), "match"),
        ToolOutput::PdfSearch(r) | ToolOutput::DocSearch(r) | ToolOutput::PptSearch(r) => {
            count(r.results.len(), "document")
        }
        ToolOutput::Weather(w) => format!(
            "{}: {}, {:.0}° ({})",
            w.location, w.description, w.temperature, w.units
        ),
        ToolOutput::Datetime(d) => format!("{} ({})", d.datetime, d.timezone),
        ToolOutput::YoutubeVideoAnalysis(v) => match &v.analysis.error {
            Some(error) => format!("video {}: {}", v.video_id, error),
            None => format!("video {}: {} chapters", v.video_id, v.timestamps.len()),
        },
        ToolOutput::AskQuestion(answer) => match &answer.outcome {
            QuestionOutcome::Answered { selected, other } => {
                let mut parts = selected.clone();
                parts.extend(other.clone());
                format!("answered: {}", parts.join(", "))
            }
            QuestionOutcome::Declined => "declined".to_string(),
            QuestionOutcome::Skipped => "skipped".to_string(),
        },
        ToolOutput::Error { tool_name, result } => format!("{tool_name} failed: {}", result.error),
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else if noun.ends_with("ch") {
        format!("{n} {noun}es")
    } else {
        format!("{n} {noun}s")
    }
}

/// Clarifying question with numbered options
pub fn question(args: &Value) -> String {
    let mut out = args
        .get("question")
        .and_then(Value::as_str)
        .unwrap_or("The assistant needs more information.")
        .to_string();

    let options = args.get("options").and_then(Value::as_array);
    for (i, option) in options.into_iter().flatten().enumerate() {
        let label = option
            .get("label")
            .or_else(|| option.get("value"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        out.push_str(&format!("\n  {}. {}", i + 1, label));
    }
    out.push_str("\n(/answer <text>, /decline or /skip)");
    out
}

/// Map `/answer` text onto option values when it names options by number
///
/// `"1,3"` selects the first and third options. Anything else is a free-form
/// answer.
pub fn answer(args: &Value, text: &str) -> QuestionOutcome {
    let values: Vec<&str> = args
        .get("options")
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .map(|o| o.get("value").and_then(Value::as_str).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    let picked: Option<Vec<String>> = text
        .split(',')
        .map(|n| {
            n.trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| values.get(i))
                .map(|v| v.to_string())
        })
        .collect();

    match picked {
        Some(selected) if !selected.is_empty() => QuestionOutcome::Answered {
            selected,
            other: None,
        },
        _ => QuestionOutcome::answer(text),
    }
}

pub fn related(items: &[String]) -> String {
    let mut out = String::from("Related:");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, item));
    }
    out
}

pub fn history(page: &ChatPage) -> String {
    if page.chats.is_empty() {
        return "No saved chats.".to_string();
    }
    let mut out = String::new();
    for chat in &page.chats {
        out.push_str(&format!(
            "{}  {}  {}\n",
            short_id(&chat.id),
            chat.created_at.format("%Y-%m-%d %H:%M"),
            chat.title
        ));
    }
    if page.next_offset.is_some() {
        out.push_str("(/more for older chats)");
    }
    out.trim_end().to_string()
}

pub fn conversation(sections: &[Section<'_>]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&format!(
            "[{}] you: {}\n",
            short_id(section.id),
            section.user_message.content
        ));
        for message in &section.assistant_messages {
            for invocation in message.tool_invocations() {
                out.push_str(&format!("    {}\n", tool_call(invocation)));
            }
            if !message.content.is_empty() {
                out.push_str(&format!(
                    "[{}] assistant: {}\n",
                    short_id(&message.id),
                    message.content
                ));
            }
        }
    }
    out.trim_end().to_string()
}
