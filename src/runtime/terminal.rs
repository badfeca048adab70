use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, queue};
use segue::config::Settings;
use segue::library::Track;
use segue::playback::{Command, PlaybackState, Player, SessionStatus};

use super::status::status_line;

const HELP: &str = "space play/pause  n/p next/prev  h/l seek  s stop  q quit";

/// What a key press asks the runtime to do.
#[derive(Debug)]
enum Action {
    Send(Command),
    Quit,
    Nothing,
}

fn key_action(key: KeyEvent, latest: &PlaybackState, tracks: &[Track], scrub_ms: i64) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char(' ') => match latest.status {
            SessionStatus::Playing | SessionStatus::Paused => Action::Send(Command::TogglePause),
            SessionStatus::Loading => Action::Nothing,
            SessionStatus::Idle | SessionStatus::Error => {
                let i = latest.active_track_index.unwrap_or(0);
                match tracks.get(i).or_else(|| tracks.first()) {
                    Some(track) => Action::Send(Command::Load {
                        track: track.clone(),
                        playlist: tracks.to_vec(),
                    }),
                    None => Action::Nothing,
                }
            }
        },
        KeyCode::Char('n') => Action::Send(Command::Next),
        KeyCode::Char('p') => Action::Send(Command::Previous),
        KeyCode::Char('l') | KeyCode::Right => Action::Send(Command::SeekBy(scrub_ms)),
        KeyCode::Char('h') | KeyCode::Left => Action::Send(Command::SeekBy(-scrub_ms)),
        KeyCode::Char('s') => Action::Send(Command::Stop),
        _ => Action::Nothing,
    }
}

fn redraw(out: &mut impl Write, line: &str) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(line))?;
    out.flush()
}

/// Interactive one-line surface. Returns when the user quits.
pub fn run(
    player: &Player,
    tracks: &[Track],
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let sub = player.subscribe();
    player.send(Command::Refresh)?;

    let mut stdout = io::stdout();
    println!("{HELP}");
    enable_raw_mode()?;

    let result: Result<(), Box<dyn std::error::Error>> = (|| {
        let scrub_ms = i64::try_from(settings.controls.scrub_seconds)
            .unwrap_or(i64::MAX / 1000)
            .saturating_mul(1000);
        let mut latest = player.latest();
        redraw(&mut stdout, &status_line(&latest, tracks))?;

        loop {
            if let Some(state) = sub.rx.try_iter().last() {
                latest = state;
                redraw(&mut stdout, &status_line(&latest, tracks))?;
            }

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key_action(key, &latest, tracks, scrub_ms) {
                Action::Quit => return Ok(()),
                Action::Send(cmd) => player.send(cmd)?,
                Action::Nothing => {}
            }
        }
    })();

    disable_raw_mode()?;
    execute!(stdout, Print("\r\n"))?;
    player.unsubscribe(sub.id);

    result
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use segue::library::TrackId;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tracks() -> Vec<Track> {
        vec![
            Track::local("a", Path::new("/m/a.mp3"), "A", ""),
            Track::local("b", Path::new("/m/b.mp3"), "B", ""),
        ]
    }

    #[test]
    fn space_when_idle_loads_first_track() {
        let action = key_action(press(KeyCode::Char(' ')), &PlaybackState::default(), &tracks(), 5_000);
        match action {
            Action::Send(Command::Load { track, playlist }) => {
                assert_eq!(track.id, TrackId::from("a"));
                assert_eq!(playlist.len(), 2);
            }
            other => panic!("expected a load, got {other:?}"),
        }
    }

    #[test]
    fn space_after_stop_reloads_the_cursor_track() {
        let state = PlaybackState {
            active_track_index: Some(1),
            ..PlaybackState::default()
        };
        let action = key_action(press(KeyCode::Char(' ')), &state, &tracks(), 5_000);
        match action {
            Action::Send(Command::Load { track, .. }) => assert_eq!(track.id, TrackId::from("b")),
            other => panic!("expected a load, got {other:?}"),
        }
    }

    #[test]
    fn space_toggles_while_playing() {
        let state = PlaybackState {
            status: SessionStatus::Playing,
            ..PlaybackState::default()
        };
        assert!(matches!(
            key_action(press(KeyCode::Char(' ')), &state, &tracks(), 5_000),
            Action::Send(Command::TogglePause)
        ));
    }

    #[test]
    fn space_with_empty_library_does_nothing() {
        assert!(matches!(
            key_action(press(KeyCode::Char(' ')), &PlaybackState::default(), &[], 5_000),
            Action::Nothing
        ));
    }

    #[test]
    fn scrub_keys_seek_relative() {
        let idle = PlaybackState::default();
        assert!(matches!(
            key_action(press(KeyCode::Char('l')), &idle, &tracks(), 5_000),
            Action::Send(Command::SeekBy(5_000))
        ));
        assert!(matches!(
            key_action(press(KeyCode::Char('h')), &idle, &tracks(), 5_000),
            Action::Send(Command::SeekBy(-5_000))
        ));
    }

    #[test]
    fn quit_keys() {
        let idle = PlaybackState::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for key in [press(KeyCode::Char('q')), press(KeyCode::Esc), ctrl_c] {
            assert!(matches!(key_action(key, &idle, &tracks(), 1), Action::Quit));
        }
    }
}
