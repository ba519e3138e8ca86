use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadenza_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", "/tmp/cadenza-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cadenza-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_data_dir_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/share/cadenza")
    );
}

#[test]
fn blob_dir_defaults_next_to_state_file() {
    let mut s = Settings::default();
    s.storage.state_path = Some("/tmp/cadenza/state.json".into());
    assert_eq!(
        s.blob_dir().unwrap(),
        std::path::PathBuf::from("/tmp/cadenza/blobs")
    );

    s.storage.blob_dir = Some("/elsewhere".into());
    assert_eq!(s.blob_dir().unwrap(), std::path::PathBuf::from("/elsewhere"));
}

#[test]
fn settings_load_from_config_file_and_parse_policy_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat = true
shuffle_policy = "without-replacement"
restart_threshold_secs = 5.0
recent_limit = 7
error_skip_delay_ms = 10

[audio]
tick_ms = 100
default_volume = 0.5

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
stage_imports = true
display_fields = ["title", "duration"]
display_separator = " | "

[storage]
state_path = "/tmp/somewhere/state.json"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENZA__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(s.playback.repeat);
    assert_eq!(s.playback.shuffle_policy, ShufflePolicy::Cycle);
    assert_eq!(s.playback.restart_threshold_secs, 5.0);
    assert_eq!(s.playback.recent_limit, 7);
    assert_eq!(s.playback.error_skip_delay_ms, 10);
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.audio.default_volume, 0.5);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(s.library.stage_imports);
    assert_eq!(
        s.library.display_fields,
        vec![TrackDisplayField::Title, TrackDisplayField::Duration]
    );
    assert_eq!(s.library.display_separator, " | ");
    assert_eq!(
        s.state_path().unwrap(),
        std::path::PathBuf::from("/tmp/somewhere/state.json")
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
recent_limit = 20
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CADENZA__PLAYBACK__RECENT_LIMIT", "5");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.recent_limit, 5);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.default_volume = 1.5;
    assert!(s.validate().is_err());
    s.audio.default_volume = 1.0;

    s.playback.recent_limit = 0;
    assert!(s.validate().is_err());
    s.playback.recent_limit = 20;

    s.playback.restart_threshold_secs = -1.0;
    assert!(s.validate().is_err());
}

#[test]
fn effective_settings_render_as_toml() {
    let rendered = Settings::default().to_toml().unwrap();
    assert!(rendered.contains("[playback]"));
    assert!(rendered.contains("shuffle_policy = \"recency\""));
}
