use super::*;
use crate::library::TrackId;

fn id(s: &str) -> TrackId {
    TrackId::new(s).unwrap()
}

#[test]
fn toggle_favorite_adds_then_removes() {
    let mut p = Playlists::default();
    assert!(p.toggle_favorite(id("a")));
    assert_eq!(p.favorites, vec![id("a")]);
    assert!(!p.toggle_favorite(id("a")));
    assert!(p.favorites.is_empty());
}

#[test]
fn push_recent_dedups_orders_and_caps() {
    let mut p = Playlists::default();
    for i in 0..30 {
        p.push_recent(id(&format!("t{i}")), 20);
    }
    p.push_recent(id("t15"), 20);

    assert_eq!(p.recently_played.len(), 20);
    assert_eq!(p.recently_played[0], id("t15"));
    assert_eq!(p.recently_played[1], id("t29"));
    let mut seen = std::collections::HashSet::new();
    assert!(p.recently_played.iter().all(|r| seen.insert(r.clone())));
}

#[test]
fn playlist_crud_dedups_on_add() {
    let mut p = Playlists::default();
    let pl = PlaylistId::new("road");
    p.create(pl.clone(), "Road trip");

    assert!(p.add_to(&pl, id("a")));
    assert!(!p.add_to(&pl, id("a")));
    assert!(p.add_to(&pl, id("b")));
    assert_eq!(p.get(&pl).unwrap().tracks, vec![id("a"), id("b")]);

    assert!(p.remove_from(&pl, &id("a")));
    assert!(!p.remove_from(&pl, &id("a")));
    assert!(!p.add_to(&PlaylistId::new("missing"), id("a")));

    assert_eq!(p.delete(&pl).unwrap().name, "Road trip");
    assert!(p.get(&pl).is_none());
}

#[test]
fn forget_cascades_to_every_set() {
    let mut p = Playlists::default();
    p.toggle_favorite(id("a"));
    p.push_recent(id("a"), 20);
    p.push_recent(id("b"), 20);
    p.create(PlaylistId::new("x"), "X");
    p.create(PlaylistId::new("y"), "Y");
    p.add_to(&PlaylistId::new("x"), id("a"));
    p.add_to(&PlaylistId::new("y"), id("a"));
    p.add_to(&PlaylistId::new("y"), id("b"));

    p.forget(&id("a"));

    assert!(!p.is_favorite(&id("a")));
    assert_eq!(p.recently_played, vec![id("b")]);
    for playlist in p.custom.values() {
        assert!(!playlist.tracks.contains(&id("a")));
    }
    assert_eq!(p.get(&PlaylistId::new("y")).unwrap().tracks, vec![id("b")]);
}

#[test]
fn bucket_imported_creates_the_synthetic_playlist_once() {
    let mut p = Playlists::default();
    p.bucket_imported([id("a"), id("b")]);
    p.bucket_imported([id("b"), id("c")]);

    let imported = p.get(&PlaylistId::imported()).unwrap();
    assert_eq!(imported.name, "Imported");
    assert_eq!(imported.tracks, vec![id("a"), id("b"), id("c")]);
    assert_eq!(p.custom.len(), 1);
}

#[test]
fn serialized_shape_uses_camel_case_keys() {
    let mut p = Playlists::default();
    p.push_recent(id("a"), 20);
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["recentlyPlayed"], serde_json::json!(["a"]));
    assert!(json["custom"].as_object().unwrap().is_empty());
}
