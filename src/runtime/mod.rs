use std::env;
use std::path::{Path, PathBuf};

use segue::audio::RodioBackend;
use segue::library::{TrackStore, scan};
use segue::logging::init_logging;
use segue::playback::Player;
use tracing::{info, warn};

mod headless;
mod settings;
mod startup;
mod status;
mod terminal;

/// Command-line arguments: `segue [--headless] [DIR]`.
#[derive(Debug, Default, PartialEq)]
struct Args {
    headless: bool,
    dir: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut parsed = Args::default();
        for arg in args {
            match arg.as_str() {
                "--headless" => parsed.headless = true,
                _ if parsed.dir.is_none() => parsed.dir = Some(PathBuf::from(arg)),
                _ => eprintln!("segue: ignoring extra argument {arg:?}"),
            }
        }
        parsed
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(env::args().skip(1));
    let (settings, fallback) = settings::load_settings();
    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("segue: could not open log file, logging disabled: {e}");
    }
    if let Some(note) = fallback {
        warn!("{note}");
    }

    let dir = args.dir.unwrap_or_else(|| {
        env::current_dir().unwrap_or_else(|_| PathBuf::from("Music"))
    });

    let store = TrackStore::from_tracks(scan(Path::new(&dir), &settings.library));
    info!(dir = %dir.display(), tracks = store.len(), "library scanned");

    let player = Player::spawn(RodioBackend::open_default)?;
    startup::apply_autoplay(&player, store.list(), &settings.playback)?;

    let result = if args.headless {
        headless::run(&player, &store)
    } else {
        terminal::run(&player, store.list(), &settings)
    };

    player.shutdown();
    result
}
