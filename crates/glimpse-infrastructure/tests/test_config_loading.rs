use glimpse_core::config::BackendKind;
use glimpse_core::GlimpseError;
use glimpse_infrastructure::storage::{ConfigStorage, SecretStorage};
use glimpse_infrastructure::{ConfigServiceImpl, SecretServiceImpl, load_gateway_config};
use std::time::Duration;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[tokio::test]
async fn test_resolves_vision_chat_from_files() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let secret_path = temp_dir.path().join("secret.json");
    std::fs::write(&config_path, "request_timeout_secs = 12\nanalysis_budget_secs = 40\n").unwrap();
    std::fs::write(&secret_path, r#"{"gemini": {"api_key": "g-123"}}"#).unwrap();

    let config_service =
        ConfigServiceImpl::with_storage(ConfigStorage::with_path(config_path), no_env);
    let secret_service =
        SecretServiceImpl::with_storage(SecretStorage::with_path(secret_path), no_env);

    let resolved = load_gateway_config(&config_service, &secret_service)
        .await
        .expect("configuration should resolve");

    assert_eq!(resolved.backend_kind, BackendKind::VisionChat);
    assert_eq!(resolved.api_key, "g-123");
    assert_eq!(resolved.model_name, "gemini-1.5-flash");
    assert_eq!(resolved.settings.request_timeout, Duration::from_secs(12));
    assert_eq!(resolved.settings.analysis_budget, Some(Duration::from_secs(40)));
}

#[tokio::test]
async fn test_missing_key_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let config_service = ConfigServiceImpl::with_storage(
        ConfigStorage::with_path(temp_dir.path().join("config.toml")),
        |key| (key == "GLIMPSE_BACKEND").then(|| "caption_only".to_string()),
    );
    let secret_service = SecretServiceImpl::with_storage(
        SecretStorage::with_path(temp_dir.path().join("secret.json")),
        no_env,
    );

    let err = load_gateway_config(&config_service, &secret_service)
        .await
        .unwrap_err();
    assert!(matches!(err, GlimpseError::ConfigurationMissing(_)));
}
