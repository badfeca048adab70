//! Opening and decoding local files into `rodio` sources and sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use crate::error::BackendError;

pub(super) type FileSource = Decoder<BufReader<File>>;

/// Create a paused, empty `Sink` on `mixer`.
pub(super) fn paused_sink(mixer: &Mixer) -> Sink {
    let sink = Sink::connect_new(mixer);
    sink.pause();
    sink
}

/// Open and decode `path`, returning the source and its length when the
/// container reports one.
pub(super) fn decode_file(path: &Path) -> Result<(FileSource, Option<Duration>), BackendError> {
    let file = File::open(path).map_err(|e| BackendError::Open {
        locator: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| BackendError::Unsupported(format!("{}: {e}", path.display())))?;
    let total = source.total_duration();
    Ok((source, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(&dir.path().join("nope.flac")).err().expect("expected an error");
        assert!(matches!(err, BackendError::Open { .. }));
        assert!(err.is_prepare_failure());
    }

    #[test]
    fn garbage_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();
        let err = decode_file(&path).err().expect("expected an error");
        assert!(matches!(err, BackendError::Unsupported(_)));
    }
}
