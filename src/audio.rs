//! Background music playback

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

const THEME_FILE: &str = "theme.wav";

/// Failure to start the music player
#[derive(Debug)]
pub enum AudioError {
    /// No output device could be opened
    NoDevice(rodio::StreamError),
    /// No `assets/bgm` directory was found
    AssetsNotFound,
    /// The theme file could not be opened
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The theme file is not a supported audio format
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    /// A playback sink could not be created
    Sink(rodio::PlayError),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoDevice(e) => write!(f, "no audio output device: {e}"),
            AudioError::AssetsNotFound => write!(f, "could not find assets/bgm directory"),
            AudioError::Open { path, source } => {
                write!(f, "failed to open {}: {source}", path.display())
            }
            AudioError::Decode { path, source } => {
                write!(f, "failed to decode {}: {source}", path.display())
            }
            AudioError::Sink(e) => write!(f, "failed to create audio sink: {e}"),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AudioError::NoDevice(e) => Some(e),
            AudioError::AssetsNotFound => None,
            AudioError::Open { source, .. } => Some(source),
            AudioError::Decode { source, .. } => Some(source),
            AudioError::Sink(e) => Some(e),
        }
    }
}

/// Loops the theme track and lets the player pause it
pub struct MusicPlayer {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Sink,
}

impl MusicPlayer {
    /// Open the default output, load the theme and start it looping.
    /// `volume` is a percentage.
    pub fn start(volume: u32) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default().map_err(AudioError::NoDevice)?;
        let path = find_assets_path()
            .ok_or(AudioError::AssetsNotFound)?
            .join("bgm")
            .join(THEME_FILE);

        let file = File::open(&path).map_err(|source| AudioError::Open {
            path: path.clone(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
            path: path.clone(),
            source,
        })?;
        let sink = Sink::try_new(&stream_handle).map_err(AudioError::Sink)?;

        sink.set_volume(volume_fraction(volume));
        sink.append(decoder.repeat_infinite());
        tracing::info!(path = %path.display(), "music started");

        Ok(Self {
            _stream: stream,
            _stream_handle: stream_handle,
            sink,
        })
    }

    pub fn is_playing(&self) -> bool {
        !self.sink.is_paused()
    }

    /// Pause if playing, resume if paused
    pub fn toggle(&mut self) {
        if self.sink.is_paused() {
            self.sink.play();
        } else {
            self.sink.pause();
        }
        tracing::debug!(playing = self.is_playing(), "music toggled");
    }
}

fn volume_fraction(volume: u32) -> f32 {
    volume.min(100) as f32 / 100.0
}

fn find_assets_path() -> Option<PathBuf> {
    let mut paths = vec![PathBuf::from("assets")];
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        paths.push(dir.join("assets"));
    }

    paths.into_iter().find(|p| p.join("bgm").is_dir())
}
