//! Parsing of one line of chat input

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain text to send
    Message(String),
    Edit { id: String, text: String },
    Reload { id: String },
    New,
    Search(Option<bool>),
    History,
    More,
    Open { id: String },
    Show,
    Rename { id: String, title: String },
    Delete { id: String },
    Answer(String),
    Decline,
    Skip,
    /// 1-based index into the related questions
    Related(usize),
    Help,
    Quit,
    /// Unknown command or bad arguments, with a usage hint
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  <text>                 ask a question
  /edit <id> <text>      rewrite a message and regenerate from it
  /reload <id>           regenerate the answer to a message
  /new                   start a new chat
  /search [on|off]       toggle or set search mode
  /history               list saved chats
  /more                  load more saved chats
  /open <id>             resume a saved chat
  /show                  print the conversation with message ids
  /rename <id> <title>   rename a saved chat
  /delete <id>           delete a saved chat
  /answer <text>         answer the pending clarifying question
  /decline               decline the pending question
  /skip                  skip the pending question
  /related <n>           ask the n-th related question
  /help                  show this help
  /quit                  exit";

fn split_first(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    match rest.split_once(char::is_whitespace) {
        Some((first, tail)) => Some((first, tail.trim())),
        None => Some((rest, "")),
    }
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Input::Message(line.to_string());
        };

        let (name, rest) = split_first(command).unwrap_or(("", ""));
        match name {
            "edit" => match split_first(rest) {
                Some((id, text)) if !text.is_empty() => Input::Edit {
                    id: id.to_string(),
                    text: text.to_string(),
                },
                _ => Input::Invalid("usage: /edit <id> <text>".into()),
            },
            "reload" => one_id(rest, "usage: /reload <id>", |id| Input::Reload { id }),
            "open" => one_id(rest, "usage: /open <id>", |id| Input::Open { id }),
            "delete" => one_id(rest, "usage: /delete <id>", |id| Input::Delete { id }),
            "rename" => match split_first(rest) {
                Some((id, title)) if !title.is_empty() => Input::Rename {
                    id: id.to_string(),
                    title: title.to_string(),
                },
                _ => Input::Invalid("usage: /rename <id> <title>".into()),
            },
            "new" => Input::New,
            "search" => match rest {
                "" => Input::Search(None),
                "on" => Input::Search(Some(true)),
                "off" => Input::Search(Some(false)),
                _ => Input::Invalid("usage: /search [on|off]".into()),
            },
            "history" => Input::History,
            "more" => Input::More,
            "show" => Input::Show,
            "answer" if !rest.is_empty() => Input::Answer(rest.to_string()),
            "answer" => Input::Invalid("usage: /answer <text>".into()),
            "decline" => Input::Decline,
            "skip" => Input::Skip,
            "related" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => Input::Related(n),
                _ => Input::Invalid("usage: /related <n>".into()),
            },
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            other => Input::Invalid(format!("unknown command /{other}; try /help")),
        }
    }
}

fn one_id(rest: &str, usage: &str, build: impl FnOnce(String) -> Input) -> Input {
    match split_first(rest) {
        Some((id, "")) => build(id.to_string()),
        _ => Input::Invalid(usage.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(
            Input::parse("  what is rust?  "),
            Input::Message("what is rust?".into())
        );
    }

    #[test]
    fn test_edit_keeps_whole_text() {
        assert_eq!(
            Input::parse("/edit ab12 tell me   more"),
            Input::Edit {
                id: "ab12".into(),
                text: "tell me   more".into()
            }
        );
        assert!(matches!(Input::parse("/edit ab12"), Input::Invalid(_)));
    }

    #[test]
    fn test_search_toggle() {
        assert_eq!(Input::parse("/search"), Input::Search(None));
        assert_eq!(Input::parse("/search off"), Input::Search(Some(false)));
        assert!(matches!(Input::parse("/search maybe"), Input::Invalid(_)));
    }

    #[test]
    fn test_related_is_one_based() {
        assert_eq!(Input::parse("/related 2"), Input::Related(2));
        assert!(matches!(Input::parse("/related 0"), Input::Invalid(_)));
        assert!(matches!(Input::parse("/related x"), Input::Invalid(_)));
    }

    #[test]
    fn test_single_id_commands_reject_extra_words() {
        assert_eq!(
            Input::parse("/delete c1"),
            Input::Delete { id: "c1".into() }
        );
        assert!(matches!(Input::parse("/delete c1 c2"), Input::Invalid(_)));
        assert!(matches!(Input::parse("/reload"), Input::Invalid(_)));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(Input::parse("/frobnicate"), Input::Invalid(_)));
        assert_eq!(Input::parse("/q"), Input::Quit);
    }
}
