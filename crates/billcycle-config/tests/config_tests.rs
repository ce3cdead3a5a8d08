use billcycle_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_alert_thresholds() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.invoice_alert_days, 5);
    assert_eq!(cfg.bill_alert_days, 3);
    assert_eq!(cfg.card_usage_alert_percent, 80.0);
    assert!(cfg.resolve_data_root().ends_with("Billcycle/books"));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let cfg = manager.load().expect("load config");

    assert_eq!(cfg.book_name, Config::default_book_name());
    assert!(!manager.config_path().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.set("currency", "brl").expect("currency");
    cfg.set("bill_alert_days", "7").expect("bill days");
    cfg.set("data_root", "/tmp/books").expect("data root");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "BRL");
    assert_eq!(loaded.bill_alert_days, 7);
    assert_eq!(loaded.resolve_data_root(), std::path::PathBuf::from("/tmp/books"));
}

#[test]
fn older_files_fill_in_missing_fields() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "locale": "pt-BR", "currency": "BRL" }"#).expect("write");

    let cfg = ConfigManager::new(path).load().expect("load config");

    assert_eq!(cfg.locale, "pt-BR");
    assert_eq!(cfg.backup_retention, 5);
    assert!(cfg.ui_color_enabled);
}

#[test]
fn invalid_settings_are_rejected() {
    let mut cfg = Config::default();

    let err = cfg.set("card_usage_alert_percent", "140").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert!(cfg.set("backup_retention", "0").is_err());
    assert!(cfg.set("theme", "dark").is_err());
    assert_eq!(cfg.card_usage_alert_percent, 80.0);
}
