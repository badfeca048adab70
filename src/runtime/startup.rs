use segue::config::PlaybackSettings;
use segue::error::Result;
use segue::library::Track;
use segue::playback::{Command, Player};
use tracing::info;

/// Start the first track when `playback.autoplay` is set.
pub fn apply_autoplay(player: &Player, tracks: &[Track], settings: &PlaybackSettings) -> Result<()> {
    if !settings.autoplay {
        return Ok(());
    }
    let Some(first) = tracks.first() else {
        return Ok(());
    };

    info!(id = %first.id, "autoplay");
    player.send(Command::Load {
        track: first.clone(),
        playlist: tracks.to_vec(),
    })
}
