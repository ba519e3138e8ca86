use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::library::{BlobStore, TrackId, scan};
use crate::logging;
use crate::notify::ConsoleNotifier;
use crate::player::{PlaybackController, PlaybackRules, Reducer, Store};
use crate::storage::{PersistedState, RestoreDefaults, StateFile};
use crate::transport::RodioTransport;

mod command;
mod console;
mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    if let Err(e) = logging::init_logging(&settings.logging) {
        eprintln!("cadenza: logging disabled: {e}");
    }

    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"));

    let seeds = scan(&dir, &settings.library);
    let seed_ids: HashSet<TrackId> = seeds.iter().map(|t| t.id.clone()).collect();

    let state_file = settings.state_path().map(StateFile::new);
    let persisted = state_file
        .as_ref()
        .map(StateFile::load_or_default)
        .unwrap_or_else(PersistedState::default);
    let state = persisted.restore(
        seeds,
        RestoreDefaults {
            volume: settings.audio.default_volume,
            repeat: settings.playback.repeat,
            shuffle: settings.playback.shuffle,
        },
    );
    tracing::info!(
        catalog = state.catalog.len(),
        current = ?state.current_id().map(TrackId::as_str),
        "state restored"
    );

    let reducer = Reducer::new(PlaybackRules::from(&settings.playback));
    let mut store = Store::new(state, reducer, Box::new(ConsoleNotifier));
    match state_file {
        Some(file) => {
            tracing::info!(path = %file.path().display(), "persisting player state");
            store = store.with_persistence(file, seed_ids);
        }
        None => tracing::warn!("no data directory; player state will not be saved"),
    }

    let (transport, events) = RodioTransport::new(&settings.audio);
    let mut player = PlaybackController::new(
        store,
        transport,
        Duration::from_millis(settings.playback.error_skip_delay_ms),
    );

    let blobs = if settings.library.stage_imports {
        settings.blob_dir().map(BlobStore::new)
    } else {
        None
    };
    if let Some(b) = &blobs {
        tracing::info!(dir = %b.dir().display(), "staging imports");
    }
    let console = console::Console::new(&settings, blobs);

    println!(
        "cadenza: {} tracks from {}. Type `help` for commands.",
        player.store().state().catalog.len(),
        dir.display()
    );

    let result = event_loop::run(&mut player, &events, &console);

    player.flush();
    player.transport().shutdown();
    tracing::info!("shutdown complete");
    result
}
