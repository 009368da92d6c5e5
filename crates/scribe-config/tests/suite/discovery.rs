use scribe_config::{
    discover_config_path, load_for_root, with_config_env_lock, ScribeConfig, SCRIBE_CONFIG_ENV_VAR,
};
use tempfile::tempdir;

#[test]
fn discovers_scribe_toml_in_root() {
    with_config_env_lock(|| {
        std::env::remove_var(SCRIBE_CONFIG_ENV_VAR);
        let dir = tempdir().unwrap();
        assert_eq!(discover_config_path(dir.path()), None);

        std::fs::write(dir.path().join(".scribe.toml"), "[hints]\nmax_words = 2\n").unwrap();
        let found = discover_config_path(dir.path()).unwrap();
        assert!(found.ends_with(".scribe.toml"));

        let (config, path) = load_for_root(dir.path()).unwrap();
        assert_eq!(config.hints.max_words, 2);
        assert_eq!(path, Some(found));
    });
}

#[test]
fn env_var_overrides_discovery() {
    with_config_env_lock(|| {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("scribe.toml"), "[hints]\nmax_words = 2\n").unwrap();
        std::fs::write(dir.path().join("custom.toml"), "[hints]\nmax_words = 4\n").unwrap();

        std::env::set_var(SCRIBE_CONFIG_ENV_VAR, "custom.toml");
        let loaded = load_for_root(dir.path());
        std::env::remove_var(SCRIBE_CONFIG_ENV_VAR);

        let (config, path) = loaded.unwrap();
        assert_eq!(config.hints.max_words, 4);
        assert!(path.unwrap().ends_with("custom.toml"));
    });
}

#[test]
fn missing_config_yields_defaults() {
    with_config_env_lock(|| {
        std::env::remove_var(SCRIBE_CONFIG_ENV_VAR);
        let dir = tempdir().unwrap();
        let (config, path) = load_for_root(dir.path()).unwrap();
        assert_eq!(config, ScribeConfig::default());
        assert!(path.is_none());
    });
}
