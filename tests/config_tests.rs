mod common;

use common::{logged_in_manager, temp_store, EMAIL};
use coop_core::{
    config::{Config, ConfigManager},
    core::FarmManager,
    ledger::TransactionKind,
};
use tempfile::TempDir;

#[test]
fn missing_file_loads_defaults() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().join("nested")).unwrap();
    assert!(!manager.config_path().exists());
    let config = manager.load().unwrap();
    assert_eq!(config.locale, "pt-BR");
    assert_eq!(config.currency, "BRL");
    assert!(config.last_email.is_none());
}

#[test]
fn partial_file_fills_in_defaults() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    std::fs::write(
        manager.config_path(),
        r#"{"locale":"en-US","currency":"USD","last_email":"granja@example.com"}"#,
    )
    .unwrap();

    let config = manager.load().unwrap();
    assert_eq!(config.locale, "en-US");
    assert_eq!(config.last_email.as_deref(), Some("granja@example.com"));
    assert_eq!(config.default_feed_grams_per_bird, 110.0);
    assert_eq!(config.ingredients.len(), 5);
}

#[test]
fn settings_survive_a_save() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let mut config = Config::default();
    config.set("currency", "usd").unwrap();
    config.set("admin_email", "Dono@Example.com").unwrap();
    config.set("request_timeout_secs", "15").unwrap();
    manager.save(&config).unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded.currency, "USD");
    assert_eq!(loaded.admin_email.as_deref(), Some("dono@example.com"));
    assert_eq!(loaded.request_timeout_secs, Some(15));
}

#[tokio::test]
async fn local_lists_round_trip_through_config() {
    let mut farm = logged_in_manager().await;
    farm.add_custom_category(TransactionKind::Outflow, "Vacinas")
        .unwrap();
    farm.add_catalog_item("Dúzia caipira", "dz", 14.0, TransactionKind::Inflow)
        .unwrap();
    farm.set_ingredient_price("milho grão", 1.75).unwrap();

    let mut config = Config::default();
    farm.export_to_config(&mut config);
    assert_eq!(config.last_email.as_deref(), Some(EMAIL));
    assert_eq!(config.catalog.len(), 1);

    let mut restored = FarmManager::new(Box::new(temp_store()));
    restored.apply_config(&config);
    assert!(restored
        .categories(TransactionKind::Outflow)
        .contains(&"Vacinas".to_string()));
    assert_eq!(restored.state().catalog[0].name, "Dúzia caipira");
    let milho = restored
        .state()
        .ingredients
        .iter()
        .find(|ingredient| ingredient.name == "Milho Grão")
        .unwrap();
    assert_eq!(milho.price_per_kg, 1.75);
}
