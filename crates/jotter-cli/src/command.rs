use jotter_core::NoteId;
use thiserror::Error;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    /// Raw page entry, validated by the collection controller
    Page(String),
    Next,
    Prev,
    Search(String),
    Clear,
    New,
    Edit(NoteId),
    Title(String),
    Content(String),
    Save,
    Cancel,
    Delete(NoteId),
    Generate {
        total: Option<u32>,
        batch: Option<u32>,
    },
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command '{0}', type 'help' for a list of commands")]
    Unknown(String),

    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("'{value}' is not a valid {expected}")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((line, ""));

        match name.to_ascii_lowercase().as_str() {
            "list" | "ls" | "reload" => Ok(Command::List),
            "page" | "p" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "page",
                        expected: "a page number",
                    });
                }
                Ok(Command::Page(rest.to_string()))
            }
            "next" | "n" => Ok(Command::Next),
            "prev" => Ok(Command::Prev),
            "search" | "s" | "/" => Ok(Command::Search(rest.to_string())),
            "clear" => Ok(Command::Clear),
            "new" | "add" => Ok(Command::New),
            "edit" | "e" => Ok(Command::Edit(parse_id("edit", rest)?)),
            "title" => Ok(Command::Title(rest.to_string())),
            "content" | "body" => Ok(Command::Content(rest.to_string())),
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "delete" | "rm" => Ok(Command::Delete(parse_id("delete", rest)?)),
            "generate" | "gen" => {
                let mut args = rest.split_whitespace();
                let total = args.next().map(parse_count).transpose()?;
                let batch = args.next().map(parse_count).transpose()?;
                Ok(Command::Generate { total, batch })
            }
            "dismiss" | "ok" => Ok(Command::Dismiss),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(command: &'static str, arg: &str) -> Result<NoteId, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            expected: "a note id",
        });
    }
    arg.parse().map_err(|_| ParseError::InvalidArgument {
        value: arg.to_string(),
        expected: "note id",
    })
}

fn parse_count(arg: &str) -> Result<u32, ParseError> {
    match arg.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidArgument {
            value: arg.to_string(),
            expected: "positive count",
        }),
    }
}

pub const HELP: &str = "\
Commands:
  list                 reload the current page
  page <n>             jump to page n
  next | prev          move one page forward or back
  search <query>       search notes (empty query returns to the page)
  clear                leave search results
  new                  start a new note
  edit <id>            edit an existing note
  title <text>         set the title of the open note
  content <text>       set the content of the open note
  save | cancel        submit or discard the open note
  delete <id>          delete a note
  generate [n [batch]] create n dummy notes in batches
  dismiss              hide the current alert
  quit";
