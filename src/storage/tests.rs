use super::*;
use crate::library::{Track, TrackDraft, TrackId};
use crate::player::PlayerState;
use crate::playlists::PlaylistId;
use std::collections::HashSet;
use std::fs;
use tempfile::tempdir;

fn track(id: &str, duration: f64) -> Track {
    Track::try_from(TrackDraft {
        id: Some(id.into()),
        title: Some(id.to_uppercase()),
        file_path: Some(format!("/music/{id}.mp3")),
        duration: Some(duration),
        ..TrackDraft::default()
    })
    .unwrap()
}

fn defaults() -> RestoreDefaults {
    RestoreDefaults {
        volume: 0.8,
        repeat: false,
        shuffle: false,
    }
}

#[test]
fn missing_file_loads_as_none_and_default() {
    let dir = tempdir().unwrap();
    let file = StateFile::new(dir.path().join("nope.json"));
    assert!(file.load().unwrap().is_none());
    assert_eq!(file.load_or_default(), PersistedState::default());
}

#[test]
fn corrupt_file_falls_back_to_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, b"{ not json").unwrap();

    let file = StateFile::new(path);
    assert!(file.load().is_err());
    assert_eq!(file.load_or_default(), PersistedState::default());
}

#[test]
fn save_creates_parent_dirs_and_reads_back() {
    let dir = tempdir().unwrap();
    let file = StateFile::new(dir.path().join("nested").join("state.json"));

    let mut state = PersistedState {
        volume: Some(0.3),
        repeat: Some(true),
        current_track_id: Some("a".into()),
        current_time: 42.0,
        ..PersistedState::default()
    };
    state.playlists.toggle_favorite(TrackId::new("a").unwrap());

    file.save(&state).unwrap();
    assert_eq!(file.load().unwrap(), Some(state));
    assert!(!file.path().with_extension("json.tmp").exists());
}

#[test]
fn file_uses_camel_case_keys() {
    let dir = tempdir().unwrap();
    let file = StateFile::new(dir.path().join("state.json"));
    file.save(&PersistedState {
        current_track_id: Some("a".into()),
        ..PersistedState::default()
    })
    .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(raw["currentTrackId"], "a");
    assert!(raw.get("customTracks").is_some());
}

#[test]
fn partial_file_uses_defaults_for_missing_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, br#"{ "repeat": true }"#).unwrap();

    let restored = StateFile::new(path)
        .load_or_default()
        .restore(vec![track("a", 10.0)], defaults());

    assert!(restored.repeat);
    assert!(!restored.shuffle);
    assert_eq!(restored.volume, 0.8);
    assert_eq!(restored.queue().len(), 1);
    assert!(restored.current_track().is_none());
}

#[test]
fn capture_skips_seeded_tracks_and_restore_brings_custom_ones_back() {
    let seeds = vec![track("a", 100.0), track("b", 100.0)];
    let seed_ids: HashSet<TrackId> = seeds.iter().map(|t| t.id.clone()).collect();

    let mut catalog_tracks = seeds.clone();
    catalog_tracks.push(track("custom", 60.0));
    let state = PlayerState::new(crate::library::Catalog::new(catalog_tracks.clone()))
        .with_queue(catalog_tracks, Some(&TrackId::new("custom").unwrap()), 12.0);

    let snapshot = PersistedState::capture(&state, &seed_ids);
    assert_eq!(snapshot.custom_tracks.len(), 1);
    assert_eq!(snapshot.custom_tracks[0].id.as_deref(), Some("custom"));
    assert_eq!(snapshot.current_track_id.as_deref(), Some("custom"));

    let restored = snapshot.restore(seeds, defaults());
    assert_eq!(restored.catalog.len(), 3);
    assert_eq!(restored.current_id().unwrap().as_str(), "custom");
    assert_eq!(restored.current_time, 12.0);
    assert!(!restored.is_playing);
}

#[test]
fn restore_drops_dangling_playlist_entries_and_clamps_time() {
    let mut snapshot = PersistedState {
        volume: Some(7.0),
        current_track_id: Some("a".into()),
        current_time: 500.0,
        ..PersistedState::default()
    };
    snapshot.playlists.toggle_favorite(TrackId::new("gone").unwrap());
    snapshot.playlists.toggle_favorite(TrackId::new("a").unwrap());
    snapshot.playlists.push_recent(TrackId::new("gone").unwrap(), 20);
    snapshot
        .playlists
        .create(PlaylistId::new("p"), "P");
    snapshot
        .playlists
        .add_to(&PlaylistId::new("p"), TrackId::new("gone").unwrap());

    let restored = snapshot.restore(vec![track("a", 100.0)], defaults());

    assert_eq!(restored.playlists.favorites, vec![TrackId::new("a").unwrap()]);
    assert!(restored.playlists.recently_played.is_empty());
    assert!(
        restored
            .playlists
            .get(&PlaylistId::new("p"))
            .unwrap()
            .tracks
            .is_empty()
    );
    assert_eq!(restored.volume, 1.0);
    assert_eq!(restored.current_time, 100.0);
}

#[test]
fn staged_tracks_round_trip_as_blobs() {
    let dir = tempdir().unwrap();
    let staged = dir.path().join("blob.mp3");
    fs::write(&staged, b"x").unwrap();

    let snapshot = PersistedState {
        custom_tracks: vec![TrackDraft {
            id: Some("s".into()),
            title: Some("Staged".into()),
            file_path: Some(staged.display().to_string()),
            staged: true,
            ..TrackDraft::default()
        }],
        ..PersistedState::default()
    };

    let file = StateFile::new(dir.path().join("state.json"));
    file.save(&snapshot).unwrap();
    let restored = file.load_or_default().restore(Vec::new(), defaults());

    let t = restored.catalog.get(&TrackId::new("s").unwrap()).unwrap();
    assert_eq!(t.source.blob().unwrap().path(), staged.as_path());
}
