//! Line-oriented editor for `sceneboard edit <id>`.
//!
//! Positions typed by the user are one-based; the session works with
//! zero-based indices.

use std::io::Write;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::adapter::inbound::cli::event::print_event;
use crate::adapter::inbound::cli::output;
use crate::application::editor::{Discard, EditSession};
use crate::domain::{EventId, Speaker};
use crate::error::Result;
use crate::port::outbound::store::EventStore;

const HELP: &str = "\
add [N]            insert a blank line at N (append without N)
text N TEXT        set the text of line N
speaker N left|right
toggle N           flip the speaker of line N
image N [PATH]     set or clear the image of line N
move FROM TO       move a line
up N / down N      move a line by one
dup N              duplicate line N
del N              delete line N
name TEXT          rename the event
show               print the event
save               write changes to the store
quit               leave (refuses with unsaved changes)
quit!              leave and discard unsaved changes";

/// One editor command, with zero-based positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Add(Option<usize>),
    Text(usize, String),
    Speaker(usize, Speaker),
    Toggle(usize),
    Image(usize, String),
    Move(usize, usize),
    Up(usize),
    Down(usize),
    Dup(usize),
    Del(usize),
    Name(String),
    Show,
    Save,
    Quit,
    ForceQuit,
    Help,
}

/// Why an input line was not understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a line number (lines start at 1)")]
    BadPosition(String),

    #[error("speaker must be left or right, got '{0}'")]
    BadSpeaker(String),
}

impl EditCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = split_word(line);

        let command = match word {
            "add" | "a" => Self::Add(match rest {
                "" => None,
                n => Some(position(n)?),
            }),
            "text" | "t" => {
                let (n, text) = split_word(rest);
                if n.is_empty() {
                    return Err(CommandError::Usage("text N TEXT"));
                }
                Self::Text(position(n)?, text.to_string())
            }
            "speaker" | "s" => {
                let (n, side) = split_word(rest);
                if n.is_empty() || side.is_empty() {
                    return Err(CommandError::Usage("speaker N left|right"));
                }
                let speaker = side
                    .parse()
                    .map_err(|_| CommandError::BadSpeaker(side.to_string()))?;
                Self::Speaker(position(n)?, speaker)
            }
            "toggle" => Self::Toggle(single(rest, "toggle N")?),
            "image" | "img" => {
                let (n, path) = split_word(rest);
                if n.is_empty() {
                    return Err(CommandError::Usage("image N [PATH]"));
                }
                Self::Image(position(n)?, path.to_string())
            }
            "move" | "mv" => {
                let (from, to) = split_word(rest);
                if from.is_empty() || to.is_empty() {
                    return Err(CommandError::Usage("move FROM TO"));
                }
                Self::Move(position(from)?, position(to)?)
            }
            "up" => Self::Up(single(rest, "up N")?),
            "down" => Self::Down(single(rest, "down N")?),
            "dup" => Self::Dup(single(rest, "dup N")?),
            "del" | "rm" => Self::Del(single(rest, "del N")?),
            "name" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("name TEXT"));
                }
                Self::Name(rest.to_string())
            }
            "show" | "ls" => Self::Show,
            "save" | "w" => Self::Save,
            "quit" | "q" => Self::Quit,
            "quit!" | "q!" => Self::ForceQuit,
            "help" | "?" => Self::Help,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}

fn position(raw: &str) -> std::result::Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::BadPosition(raw.to_string())),
    }
}

fn single(rest: &str, usage: &'static str) -> std::result::Result<usize, CommandError> {
    let (n, extra) = split_word(rest);
    if n.is_empty() || !extra.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    position(n)
}

/// Execute `edit`: open a session and read commands from stdin.
pub async fn execute(store: &dyn EventStore, id: &str) -> Result<()> {
    let session = EditSession::open(store, &EventId::new(id)).await?;
    print_event(session.event());
    output::hint("type 'help' for commands");
    run(session, store, BufReader::new(tokio::io::stdin())).await
}

/// Drive a session from `input` until quit or end of input.
pub async fn run<R>(mut session: EditSession, store: &dyn EventStore, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        prompt(&session);
        let Some(line) = lines.next_line().await? else {
            report_discard(session.discard());
            return Ok(());
        };

        let command = match EditCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                output::error(&err.to_string());
                continue;
            }
        };

        match command {
            EditCommand::Quit if session.is_dirty() => {
                output::warning(&format!(
                    "{} unsaved edit(s); 'save' first or 'quit!' to discard",
                    session.pending_edits()
                ));
            }
            EditCommand::Quit | EditCommand::ForceQuit => {
                report_discard(session.discard());
                return Ok(());
            }
            EditCommand::Save => match session.save(store).await {
                Ok(event) => output::action_done("Saved", event.id().as_str()),
                Err(err) => output::error(&format!("save failed, edits kept: {err}")),
            },
            command => {
                if let Err(err) = apply(&mut session, command) {
                    output::error(&err.to_string());
                }
            }
        }
    }
}

/// Apply a buffer-only command.
fn apply(session: &mut EditSession, command: EditCommand) -> Result<()> {
    match command {
        EditCommand::Add(at) => {
            let index = session.add_dialog(at)?;
            output::success(&format!("added line {}", index + 1));
        }
        EditCommand::Text(n, text) => session.set_text(n, text)?,
        EditCommand::Speaker(n, speaker) => session.set_speaker(n, speaker)?,
        EditCommand::Toggle(n) => {
            let speaker = session.toggle_speaker(n)?;
            output::success(&format!("line {} now {speaker}", n + 1));
        }
        EditCommand::Image(n, path) => session.set_image(n, path)?,
        EditCommand::Move(from, to) => session.move_dialog(from, to)?,
        EditCommand::Up(n) => {
            if !session.move_up(n)? {
                output::note("already first");
            }
        }
        EditCommand::Down(n) => {
            if !session.move_down(n)? {
                output::note("already last");
            }
        }
        EditCommand::Dup(n) => {
            let index = session.duplicate(n)?;
            output::success(&format!("copied to line {}", index + 1));
        }
        EditCommand::Del(n) => {
            session.delete_dialog(n)?;
        }
        EditCommand::Name(name) => session.rename(name),
        EditCommand::Show => print_event(session.event()),
        EditCommand::Help => output::lines(HELP),
        EditCommand::Save | EditCommand::Quit | EditCommand::ForceQuit => {}
    }
    Ok(())
}

fn prompt(session: &EditSession) {
    if output::is_json() || output::is_quiet() {
        return;
    }
    let marker = if session.is_dirty() { "*" } else { "" };
    print!("{}{marker}> ", session.id());
    let _ = std::io::stdout().flush();
}

fn report_discard(outcome: Discard) {
    if let Discard::Unsaved { id, pending_edits } = outcome {
        output::warning(&format!("discarded {pending_edits} unsaved edit(s) to {id}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::local::{LocalEventStore, DEFAULT_STORAGE_KEY};
    use crate::domain::EventDraft;

    #[test]
    fn parses_one_based_positions() {
        assert_eq!(EditCommand::parse("add").unwrap(), Some(EditCommand::Add(None)));
        assert_eq!(EditCommand::parse("add 1").unwrap(), Some(EditCommand::Add(Some(0))));
        assert_eq!(
            EditCommand::parse("move 3 1").unwrap(),
            Some(EditCommand::Move(2, 0))
        );
        assert_eq!(
            EditCommand::parse("del 0").unwrap_err(),
            CommandError::BadPosition("0".into())
        );
    }

    #[test]
    fn text_keeps_rest_of_line() {
        assert_eq!(
            EditCommand::parse("text 2   Hello,  world ").unwrap(),
            Some(EditCommand::Text(1, "Hello,  world".into()))
        );
        assert_eq!(
            EditCommand::parse("text 2").unwrap(),
            Some(EditCommand::Text(1, String::new()))
        );
    }

    #[test]
    fn speaker_and_image_forms() {
        assert_eq!(
            EditCommand::parse("speaker 1 R").unwrap(),
            Some(EditCommand::Speaker(0, Speaker::Right))
        );
        assert!(matches!(
            EditCommand::parse("speaker 1 up"),
            Err(CommandError::BadSpeaker(_))
        ));
        assert_eq!(
            EditCommand::parse("image 1").unwrap(),
            Some(EditCommand::Image(0, String::new()))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(EditCommand::parse("   ").unwrap(), None);
        assert!(matches!(
            EditCommand::parse("frobnicate"),
            Err(CommandError::Unknown(_))
        ));
        assert!(matches!(EditCommand::parse("up"), Err(CommandError::Usage(_))));
        assert!(matches!(EditCommand::parse("up 1 2"), Err(CommandError::Usage(_))));
        assert_eq!(EditCommand::parse("quit!").unwrap(), Some(EditCommand::ForceQuit));
    }

    #[tokio::test]
    async fn scripted_session_saves_on_save_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalEventStore::new(dir.path(), DEFAULT_STORAGE_KEY);
        let event = store.create(EventDraft::named("Scene")).await.unwrap();
        let session = EditSession::open(&store, event.id()).await.unwrap();

        let script = b"text 1 original\nadd 1\ntext 1 A\nadd\ntext 3 B\nmove 3 1\nsave\ntext 1 unsaved\nquit\nquit!\n";
        run(session, &store, &script[..]).await.unwrap();

        let stored = store.get(event.id()).await.unwrap().unwrap();
        let texts: Vec<&str> = stored.dialogs().iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["B", "A", "original"]);
    }

    #[tokio::test]
    async fn bad_commands_do_not_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalEventStore::new(dir.path(), DEFAULT_STORAGE_KEY);
        let event = store.create(EventDraft::named("Scene")).await.unwrap();
        let session = EditSession::open(&store, event.id()).await.unwrap();

        let script = b"del 1\ntext 9 nope\nbogus\nname Renamed\nsave\n";
        run(session, &store, &script[..]).await.unwrap();

        let stored = store.get(event.id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Renamed");
        assert_eq!(stored.dialogs().len(), 1);
    }
}
