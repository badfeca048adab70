//! Line-oriented surface for scripting: commands on stdin, one JSON snapshot
//! per line on stdout.

use std::io::{self, BufRead, Write};
use std::thread;

use segue::library::{Catalog, TrackStore};
use segue::playback::{Command, Player};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, PartialEq)]
enum Input {
    /// Play the library track at this (0-based) index.
    Play(usize),
    /// Search the library and play the matches.
    Find(String),
    Send(PlainCommand),
    Quit,
}

/// Commands that need no library lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PlainCommand {
    Pause,
    Resume,
    Next,
    Previous,
    Seek(i64),
    Stop,
}

impl From<PlainCommand> for Command {
    fn from(c: PlainCommand) -> Self {
        match c {
            PlainCommand::Pause => Command::Pause,
            PlainCommand::Resume => Command::Resume,
            PlainCommand::Next => Command::Next,
            PlainCommand::Previous => Command::Previous,
            PlainCommand::Seek(ms) => Command::Seek(ms),
            PlainCommand::Stop => Command::Stop,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
enum InputError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("`{0}` needs a number")]
    BadNumber(&'static str),
    #[error("`find` needs a query")]
    EmptyQuery,
}

/// Parse one stdin line. Blank lines yield `None`.
fn parse_input(line: &str) -> Option<Result<Input, InputError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let parsed = match word {
        "play" => rest
            .parse()
            .map(Input::Play)
            .map_err(|_| InputError::BadNumber("play")),
        "seek" => rest
            .parse()
            .map(|ms| Input::Send(PlainCommand::Seek(ms)))
            .map_err(|_| InputError::BadNumber("seek")),
        "find" if rest.is_empty() => Err(InputError::EmptyQuery),
        "find" => Ok(Input::Find(rest.to_string())),
        "pause" => Ok(Input::Send(PlainCommand::Pause)),
        "resume" => Ok(Input::Send(PlainCommand::Resume)),
        "next" => Ok(Input::Send(PlainCommand::Next)),
        "prev" | "previous" => Ok(Input::Send(PlainCommand::Previous)),
        "stop" => Ok(Input::Send(PlainCommand::Stop)),
        "quit" | "exit" => Ok(Input::Quit),
        other => Err(InputError::Unknown(other.to_string())),
    };
    Some(parsed)
}

/// Turn an input into the command to send, if any.
fn to_command(input: Input, store: &TrackStore) -> Option<Command> {
    match input {
        Input::Play(n) => {
            let Some(track) = store.list().get(n) else {
                warn!(index = n, len = store.len(), "no track at index");
                return None;
            };
            Some(Command::Load {
                track: track.clone(),
                playlist: store.list().to_vec(),
            })
        }
        Input::Find(query) => {
            let matches = store.search(&query);
            let Some(first) = matches.first().cloned() else {
                warn!(%query, "no matches");
                return None;
            };
            Some(Command::Load {
                track: first,
                playlist: matches,
            })
        }
        Input::Send(c) => Some(c.into()),
        Input::Quit => None,
    }
}

pub fn run(player: &Player, store: &TrackStore) -> Result<(), Box<dyn std::error::Error>> {
    let sub = player.subscribe();
    let sub_id = sub.id;
    let printer = thread::Builder::new()
        .name("segue-printer".into())
        .spawn(move || {
            let stdout = io::stdout();
            for state in sub.rx.iter() {
                let Ok(json) = serde_json::to_string(&state) else {
                    continue;
                };
                let mut out = stdout.lock();
                if writeln!(out, "{json}").and_then(|_| out.flush()).is_err() {
                    break;
                }
            }
            debug!("printer exited");
        })?;
    player.send(Command::Refresh)?;

    let result: Result<(), Box<dyn std::error::Error>> = (|| {
        for line in io::stdin().lock().lines() {
            let input = match parse_input(&line?) {
                None => continue,
                Some(Ok(input)) => input,
                Some(Err(e)) => {
                    eprintln!("segue: {e}");
                    continue;
                }
            };
            if input == Input::Quit {
                break;
            }
            if let Some(cmd) = to_command(input, store) {
                player.send(cmd)?;
            }
        }
        Ok(())
    })();

    player.shutdown();
    // The final snapshot is already queued; unsubscribing ends the printer after it.
    player.unsubscribe(sub_id);
    let _ = printer.join();
    result
}
