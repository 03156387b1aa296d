//! Integration tests for configuration loading.

use aes_conformance::common::HarnessError;
use aes_conformance::config::HarnessConfig;
use aes_conformance::sim::nets;

/// Tests that an empty document yields every default.
#[test]
fn test_empty_config_defaults() {
    let config = HarnessConfig::from_toml_str("").unwrap();
    assert_eq!(config.clock.period_ps, 1_000);
    assert_eq!(config.clock.reset_cycles, 2);
    assert_eq!(config.timeouts.completion_ns, 1_000);
    assert_eq!(config.timeouts.handshake_ns, 100);
    assert_eq!(config.stimulus.seed, None);
    assert_eq!(config.stimulus.iterations, 1);
    assert_eq!(
        config.master_key().unwrap().to_hex(),
        "2b7e151628aed2a6abf7158809cf4f3c"
    );
    assert_eq!(config.signals.top.aes_done, nets::AES_DONE);
    assert_eq!(config.signals.subbytes.state_in, nets::SUBBYTES.state_in);
    assert_eq!(config.signals.mixcolumns.done, nets::MIXCOLUMNS.done);
    assert_eq!(config.signals.keysched.round_in, nets::KEYSCHED.round_in);
    assert_eq!(config.signals.core.add_key_encoding, -3);
}

/// Tests partial sections: given fields override, the rest default.
#[test]
fn test_partial_overrides() {
    let text = r#"
        [clock]
        period_ps = 2000

        [stimulus]
        seed = 42
        iterations = 5

        [signals.top]
        aes_done = "tb.dut.done"

        [signals.core]
        add_key_encoding = 6

        [signals.subbytes]
        state_in = "tb.dut.sb.state_in"

        [signals.mixcolumns]
        done = "tb.dut.mc.done"
    "#;
    let config = HarnessConfig::from_toml_str(text).unwrap();
    assert_eq!(config.clock.period_ps, 2_000);
    assert_eq!(config.clock.reset_cycles, 2);
    assert_eq!(config.stimulus.seed, Some(42));
    assert_eq!(config.stimulus.iterations, 5);
    assert_eq!(config.signals.top.aes_done, "tb.dut.done");
    assert_eq!(config.signals.top.aes_dout, nets::AES_DOUT);
    assert_eq!(config.signals.core.add_key_encoding, 6);
    assert_eq!(config.signals.core.key, nets::KEY);
    assert_eq!(config.signals.subbytes.state_in, "tb.dut.sb.state_in");
    assert_eq!(config.signals.subbytes.ena, nets::SUBBYTES.ena);
    assert_eq!(config.signals.subbytes.done, nets::SUBBYTES.done);
    assert_eq!(config.signals.mixcolumns.done, "tb.dut.mc.done");
    assert_eq!(config.signals.mixcolumns.state_in, nets::MIXCOLUMNS.state_in);
    assert_eq!(config.signals.shiftrows.clk, nets::SHIFTROWS.clk);
}

/// Tests that the shipped configuration parses.
#[test]
fn test_shipped_default_config() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/default.toml");
    let config = HarnessConfig::load(path).unwrap();
    assert_eq!(config.clock.period_ps, 1_000);
    assert!(config.master_key().is_ok());
}

/// Tests configuration error reporting.
#[test]
fn test_config_errors() {
    assert!(matches!(
        HarnessConfig::from_toml_str("[clock]\nperiod_ps = \"fast\""),
        Err(HarnessError::Config(_))
    ));
    let config = HarnessConfig::from_toml_str("[stimulus]\nkey = \"abcd\"").unwrap();
    assert!(matches!(config.master_key(), Err(HarnessError::Config(_))));
    let config =
        HarnessConfig::from_toml_str("[stimulus]\nkey = \"+b7e151628aed2a6abf7158809cf4f3c\"")
            .unwrap();
    assert!(matches!(config.master_key(), Err(HarnessError::Config(_))));
    assert_eq!(
        HarnessConfig::from_toml_str("[stimulus]\niterations = 0").unwrap_err(),
        HarnessError::Config("stimulus.iterations: must be at least 1".to_string())
    );
    assert!(matches!(
        HarnessConfig::load("/nonexistent/harness.toml"),
        Err(HarnessError::Io(_))
    ));
}
