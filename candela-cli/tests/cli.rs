use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use assert_cmd::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

/// 2024-01-05T00:00:00Z
const JAN_5_2024: i64 = 1_704_412_800;
const DAY: i64 = 86_400;

fn candela(config_dir: &Path, args: &[&str]) -> Command {
    let binary = assert_cmd::cargo::cargo_bin!("candela");
    let mut cmd = Command::new(binary);
    cmd.env_remove("RUST_LOG")
        .arg("--config-dir")
        .arg(config_dir)
        .args(args);
    cmd
}

fn run_json(config_dir: &Path, args: &[&str]) -> Result<Value> {
    let output = candela(config_dir, args).assert().success().get_output().clone();
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn generates_seeded_walk_ending_on_start_date() -> Result<()> {
    let temp = tempdir()?;
    let args = [
        "generate", "--kind", "walk", "--count", "5", "--seed", "7", "--start", "2024-01-05",
    ];
    let first = run_json(temp.path(), &args)?;
    let second = run_json(temp.path(), &args)?;
    assert_eq!(first, second);

    let points = first.as_array().expect("walk is a JSON array");
    assert_eq!(points.len(), 5);
    assert_eq!(points[4]["time"].as_i64(), Some(JAN_5_2024));
    assert_eq!(points[0]["time"].as_i64(), Some(JAN_5_2024 - 4 * DAY));
    Ok(())
}

#[test]
fn extends_walk_with_live_points() -> Result<()> {
    let temp = tempdir()?;
    let walk = run_json(
        temp.path(),
        &[
            "generate", "--count", "3", "--seed", "1", "--start", "2024-01-05", "--extend", "2",
        ],
    )?;
    let points = walk.as_array().expect("walk is a JSON array");
    assert_eq!(points.len(), 5);
    assert_eq!(points[4]["time"].as_i64(), Some(JAN_5_2024 + 2 * DAY));
    Ok(())
}

#[test]
fn ohlc_candles_respect_bar_invariant() -> Result<()> {
    let temp = tempdir()?;
    let candles = run_json(
        temp.path(),
        &["generate", "--kind", "ohlc", "--count", "30", "--seed", "3"],
    )?;
    for bar in candles.as_array().expect("candles are a JSON array") {
        let get = |field: &str| bar[field].as_f64().expect("numeric price");
        assert!(get("low") <= get("open").min(get("close")));
        assert!(get("high") >= get("open").max(get("close")));
    }
    Ok(())
}

#[test]
fn sma_output_keeps_sentinels_for_warmup() -> Result<()> {
    let temp = tempdir()?;
    let output = run_json(
        temp.path(),
        &[
            "indicators", "--kind", "sma", "--period", "3", "--count", "10", "--seed", "5",
        ],
    )?;
    let sma = output["indicators"]["sma_3"]
        .as_array()
        .expect("sma_3 line present");
    assert_eq!(sma.len(), 10);
    assert!(sma[0]["value"].is_null());
    assert!(sma[1]["value"].is_null());
    assert!(sma[2]["value"].is_f64());
    assert_eq!(output["input"].as_array().map(Vec::len), Some(10));
    Ok(())
}

#[test]
fn all_indicators_use_configured_periods() -> Result<()> {
    let temp = tempdir()?;
    fs::write(
        temp.path().join("default.toml"),
        "[indicators]\nsma_periods = [2, 4]\n",
    )?;
    let output = run_json(
        temp.path(),
        &["indicators", "--source", "ohlc", "--count", "40", "--seed", "11"],
    )?;
    let indicators = output["indicators"].as_object().expect("indicator map");
    for key in ["sma_2", "sma_4", "ema_12", "rsi", "macd", "bollinger"] {
        assert!(indicators.contains_key(key), "missing {key}");
    }
    assert_eq!(indicators["rsi"]["overbought"].as_f64(), Some(70.0));
    assert_eq!(indicators["macd"]["signal_line"].as_array().map(Vec::len), Some(40));
    Ok(())
}

#[test]
fn formats_currency_and_volume() -> Result<()> {
    let temp = tempdir()?;
    let currency = run_json(
        temp.path(),
        &["format", "--kind", "currency", "--symbol", "¥", "1234.5"],
    )?;
    assert_eq!(currency["formatted"], "¥1,234.50");

    let volume = run_json(temp.path(), &["format", "--kind", "volume", "1260000"])?;
    assert_eq!(volume["formatted"], "1.3M");
    Ok(())
}

#[test]
fn formats_huge_values_without_crashing() -> Result<()> {
    let temp = tempdir()?;
    let price = run_json(temp.path(), &["format", "1e27"])?;
    assert_eq!(price["formatted"], 1e27f64.to_string());

    let percent = run_json(temp.path(), &["format", "--kind", "percent", "1e27"])?;
    assert_eq!(percent["formatted"], format!("{}%", 1e27f64));
    Ok(())
}

#[test]
fn config_command_renders_overrides() -> Result<()> {
    let temp = tempdir()?;
    fs::write(temp.path().join("default.toml"), "[generator]\nfloor = 5.0\n")?;
    fs::write(temp.path().join("staging.toml"), "[telemetry]\nlog_level = \"warn\"\n")?;
    let output = candela(temp.path(), &["--env", "staging", "config"])
        .assert()
        .success()
        .get_output()
        .clone();
    let rendered = String::from_utf8(output.stdout)?;
    assert!(rendered.contains("floor = 5.0"));
    assert!(rendered.contains("log_level = \"warn\""));
    Ok(())
}

#[test]
fn rejects_invalid_arguments() -> Result<()> {
    let temp = tempdir()?;
    let output = candela(temp.path(), &["generate", "--count", "0"])
        .assert()
        .failure()
        .get_output()
        .clone();
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid argument"));

    candela(temp.path(), &["indicators", "--kind", "rsi", "--period", "0"])
        .assert()
        .failure();

    fs::write(
        temp.path().join("default.toml"),
        "[indicators.bollinger]\nmultiplier = -1.0\n",
    )?;
    candela(temp.path(), &["config"]).assert().failure();
    Ok(())
}
