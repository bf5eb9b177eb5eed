//! Configuration validation tests
//!
//! Loads full TOML files from disk and checks the startup path from config
//! to fee payer.

use crate::config::Config;
use crate::wallet::{load_fee_payer, FeePayer};
use solana_sdk::{signature::Keypair, signer::Signer};
use std::io::Write;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_file() {
    let file = write_temp(
        r#"
        [server]
        host = "127.0.0.1"
        port = 3001
        anchor_timeout_ms = 2500

        [rpc]
        endpoints = ["https://api.devnet.solana.com"]
        commitment = "processed"
        timeout_ms = 1500
        failure_threshold = 5
        cooldown_secs = 10

        [wallet]
        keypair_path = "/run/secrets/payer.json"
        secret_env = "PAYER_SECRET"

        [monitoring]
        enable_metrics = false
        json_logs = true
        "#,
    );

    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.bind_addr(), "127.0.0.1:3001");
    assert_eq!(config.server.anchor_timeout_ms, 2500);
    assert_eq!(config.rpc.failure_threshold, 5);
    assert_eq!(
        config.rpc.commitment_config().unwrap(),
        solana_sdk::commitment_config::CommitmentConfig::processed()
    );
    assert_eq!(config.wallet.secret_env.as_deref(), Some("PAYER_SECRET"));
    assert!(!config.monitoring.enable_metrics);
    assert!(config.monitoring.json_logs);
}

#[test]
fn test_malformed_toml_rejected() {
    let file = write_temp("[server\nport = 1");
    assert!(Config::from_file(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_missing_config_file_is_error() {
    assert!(Config::from_file("/nonexistent/fraction-assembler.toml").is_err());
}

#[test]
fn test_zero_rpc_timeout_rejected() {
    let err = Config::from_toml("[rpc]\nendpoints = [\"https://a.example\"]\ntimeout_ms = 0\n")
        .unwrap_err();
    assert!(format!("{:#}", err).contains("timeout_ms must be greater than zero"));
}

#[test]
fn test_non_http_endpoint_rejected() {
    let err = Config::from_toml("[rpc]\nendpoints = [\"wss://a.example\"]\n").unwrap_err();
    assert!(format!("{:#}", err).contains("endpoint must be an http(s) URL"));
}

#[test]
fn test_fee_payer_from_configured_file() {
    let keypair = Keypair::new();
    let file = write_temp(&serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap());

    let config = Config::from_toml(&format!(
        "[wallet]\nkeypair_path = \"{}\"\nsecret_env = \"FRACTION_ASSEMBLER_TEST_UNSET_SECRET\"\n",
        file.path().display()
    ))
    .unwrap();

    let fee_payer: FeePayer = load_fee_payer(&config.wallet).unwrap();
    assert_eq!(fee_payer.pubkey(), keypair.pubkey());
}

#[test]
fn test_fee_payer_from_env_wins_over_file() {
    let from_env = Keypair::new();
    let var = "FRACTION_ASSEMBLER_TEST_ENV_SECRET";
    std::env::set_var(var, bs58::encode(from_env.to_bytes()).into_string());

    let config = Config::from_toml(&format!(
        "[wallet]\nkeypair_path = \"/nonexistent/payer.json\"\nsecret_env = \"{}\"\n",
        var
    ))
    .unwrap();

    let fee_payer = load_fee_payer(&config.wallet).unwrap();
    std::env::remove_var(var);
    assert_eq!(fee_payer.pubkey(), from_env.pubkey());
}
