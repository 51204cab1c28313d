//! End-to-end: CSV directory in, saved artifacts out.

use std::io::Write;

use pairlab_runner::{
    export_json, import_json, load_artifacts, load_price_dir, run_pipeline, save_artifacts,
    summarize, ModeConfig, RunConfig, SCHEMA_VERSION,
};

fn noise(i: usize, salt: f64) -> f64 {
    let x = ((i as f64 + salt) * 12.9898).sin() * 43758.5453;
    x.fract().abs() - 0.5
}

/// Write a CSV universe: BASE is a random walk, PART tracks 0.6 * BASE, and
/// LONE walks on its own.
fn write_universe(dir: &std::path::Path, days: usize) {
    let start = chrono::NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();

    let mut base = vec![100.0_f64];
    let mut lone = vec![70.0_f64];
    for i in 1..days {
        base.push(base[i - 1] + noise(i, 1.0));
        lone.push(lone[i - 1] + noise(i, 900.0));
    }
    let part: Vec<f64> = base
        .iter()
        .enumerate()
        .map(|(i, v)| 0.6 * v + 10.0 + 0.2 * noise(i, 7.0))
        .collect();

    for (name, closes) in [
        ("Quote-Equity-BASE-EQ-export.csv", &base),
        ("part.csv", &part),
        ("lone.csv", &lone),
    ] {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        writeln!(file, "Date,Close").unwrap();
        for (i, close) in closes.iter().enumerate() {
            let date = start + chrono::Duration::days(i as i64);
            writeln!(file, "{date},{close}").unwrap();
        }
    }
}

#[test]
fn csv_directory_to_artifacts() {
    let data_dir = tempfile::tempdir().unwrap();
    write_universe(data_dir.path(), 300);

    let table = load_price_dir(data_dir.path()).unwrap();
    assert_eq!(
        table.symbols(),
        &["BASE".to_string(), "LONE".to_string(), "PART".to_string()]
    );

    let report = run_pipeline(&table, &RunConfig::default()).unwrap();

    // The cointegrated pair wins over the lone walker.
    let mut legs = [report.symbol_a.clone(), report.symbol_b.clone()];
    legs.sort();
    assert_eq!(legs, ["BASE".to_string(), "PART".to_string()]);

    let out_dir = tempfile::tempdir().unwrap();
    let run_dir = save_artifacts(&report, out_dir.path()).unwrap();
    let loaded = load_artifacts(&run_dir).unwrap();
    assert_eq!(loaded.schema_version, SCHEMA_VERSION);
    assert_eq!(loaded.symbol_a, report.symbol_a);
    assert_eq!(loaded.zscore, report.zscore);
    assert_eq!(loaded.trades.len(), report.trades.len());
}

#[test]
fn exported_json_is_strictly_finite() {
    let data_dir = tempfile::tempdir().unwrap();
    write_universe(data_dir.path(), 260);

    let table = load_price_dir(data_dir.path()).unwrap();
    let report = run_pipeline(&table, &RunConfig::default()).unwrap();
    let json = export_json(&report).unwrap();

    // serde_json would emit bare `null` for a non-finite f64; the sanitized
    // report must never contain one in a numeric series.
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in [
        "prices_a",
        "prices_b",
        "spread",
        "rolling_mean",
        "rolling_std",
        "zscore",
        "rolling_correlation",
    ] {
        let series = value[key].as_array().unwrap();
        assert!(
            series.iter().all(|v| v.is_f64() || v.is_i64()),
            "{key} contains a non-numeric entry"
        );
    }

    assert!(import_json(&json).is_ok());
}

#[test]
fn anchored_run_from_toml_config() {
    let data_dir = tempfile::tempdir().unwrap();
    write_universe(data_dir.path(), 300);

    let config_file = data_dir.path().join("run.toml");
    std::fs::write(
        &config_file,
        r#"
            window = 15
            rank_by = "SCORE"

            [mode]
            type = "ANCHOR"
            anchor = "PART"
        "#,
    )
    .unwrap();
    let config = RunConfig::load(&config_file).unwrap();
    assert_eq!(config.window, 15);

    let table = load_price_dir(data_dir.path()).unwrap();
    let report = run_pipeline(&table, &config).unwrap();
    assert_eq!(report.symbol_a, "PART");
    assert_eq!(report.symbol_b, "BASE");
    assert_eq!(
        report.mode,
        ModeConfig::Anchor {
            anchor: "PART".into()
        }
    );

    let summary = summarize(&report);
    assert_eq!(summary.pair, "PART - BASE");
}
