use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the audio thread reports elapsed time (milliseconds).
    pub tick_ms: u64,
    /// Volume used when no persisted state exists, in `[0, 1]`.
    pub default_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            default_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled (persisted state wins).
    pub shuffle: bool,
    /// Whether repeat starts enabled (persisted state wins).
    pub repeat: bool,
    /// How the next track is picked while shuffling.
    pub shuffle_policy: ShufflePolicy,
    /// `prev` restarts the current track instead of going back once playback
    /// is past this many seconds.
    pub restart_threshold_secs: f64,
    /// Maximum number of entries kept in the recently-played list.
    pub recent_limit: usize,
    /// Delay before skipping a track the transport failed to play (milliseconds).
    pub error_skip_delay_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: false,
            shuffle_policy: ShufflePolicy::Recency,
            restart_threshold_secs: 3.0,
            recent_limit: 20,
            error_skip_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShufflePolicy {
    /// Avoid recently played tracks; repeats are possible before full coverage.
    #[default]
    #[serde(alias = "recent", alias = "approximate")]
    Recency,
    /// Visit every queued track exactly once per cycle.
    #[serde(alias = "permutation", alias = "without-replacement")]
    Cycle,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Duration,
    Source,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Copy explicitly imported files into the blob directory so playback
    /// survives the original being moved.
    pub stage_imports: bool,

    /// Which fields the console uses to list a track, and in what order.
    pub display_fields: Vec<TrackDisplayField>,
    /// Separator used to join `display_fields`.
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
                "flac".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            stage_imports: false,
            display_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
            display_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the player state is persisted. Defaults to the XDG data dir.
    pub state_path: Option<PathBuf>,
    /// Where staged imports are copied. Defaults to `blobs/` next to the state file.
    pub blob_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: String,
    /// Directory for the rolling log file.
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "cadenza=info,warn".to_string(),
            directory: PathBuf::from(".logs"),
        }
    }
}
