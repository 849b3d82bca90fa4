use super::*;

use std::{
    env,
    io,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_match_endpoint_contract() {
    let policy = Settings::default().word_source_policy();
    assert_eq!(policy.min_delay, Duration::from_millis(500));
    assert_eq!(policy.delay_spread_ms, 1000);
    assert_eq!(policy.failure_rate, 0.15);
}

#[test]
fn app_prefixed_bind_wins_over_legacy_name() {
    let mut settings = Settings::default();
    let mut issues = Vec::new();
    apply_env_overrides(
        &mut settings,
        env_from(&[("SERVER_BIND", "0.0.0.0:1"), ("APP__BIND_ADDR", "0.0.0.0:2")]),
        &mut issues,
    );
    assert!(issues.is_empty());
    assert_eq!(settings.server_bind, "0.0.0.0:2");
}

#[test]
fn numeric_overrides_are_parsed_and_invalid_values_ignored() {
    let mut settings = Settings::default();
    let mut issues = Vec::new();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("APP__MIN_DELAY_MS", "0"),
            ("APP__DELAY_SPREAD_MS", "not-a-number"),
            ("APP__FAILURE_RATE", " 0.5 "),
            ("APP__RANDOM_SEED", "42"),
        ]),
        &mut issues,
    );
    assert_eq!(settings.min_delay_ms, 0);
    assert_eq!(settings.delay_spread_ms, 1000);
    assert_eq!(settings.failure_rate, 0.5);
    assert_eq!(settings.random_seed, Some(42));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].key, "APP__DELAY_SPREAD_MS");
    assert_eq!(issues[0].raw, "not-a-number");
}

#[test]
fn failure_rate_is_clamped_into_probability_range() {
    let settings = Settings {
        failure_rate: 3.0,
        ..Settings::default()
    };
    assert_eq!(settings.word_source_policy().failure_rate, 1.0);
}

#[test]
fn non_finite_failure_rate_is_rejected() {
    for raw in ["NaN", "inf", "-inf"] {
        let mut settings = Settings::default();
        let mut issues = Vec::new();
        apply_env_overrides(
            &mut settings,
            env_from(&[("APP__FAILURE_RATE", raw)]),
            &mut issues,
        );
        assert_eq!(settings.failure_rate, 0.15, "{raw}");
        assert_eq!(issues.len(), 1, "{raw}");
        assert_eq!(issues[0].key, "APP__FAILURE_RATE");
    }

    let mut file_settings = Settings::default();
    let mut issues = Vec::new();
    let file_cfg = HashMap::from([("failure_rate".to_string(), "NaN".to_string())]);
    apply_file_overrides(&mut file_settings, &file_cfg, &mut issues);
    assert_eq!(file_settings.failure_rate, 0.15);
    assert_eq!(issues.len(), 1);
}

#[test]
fn nan_failure_rate_never_reaches_the_word_source() {
    let settings = Settings {
        failure_rate: f64::NAN,
        ..Settings::default()
    };
    assert_eq!(settings.word_source_policy().failure_rate, 0.15);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

#[test]
fn collected_issues_are_logged_as_warnings() {
    let mut settings = Settings::default();
    let mut issues = Vec::new();
    apply_env_overrides(
        &mut settings,
        env_from(&[("APP__FAILURE_RATE", "abc")]),
        &mut issues,
    );

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || report_issues(&issues));

    let text = logs.text();
    assert!(text.contains("WARN"), "{text}");
    assert!(text.contains("ignoring invalid setting"), "{text}");
    assert!(text.contains("APP__FAILURE_RATE"), "{text}");
    assert!(text.contains("abc"), "{text}");
}

#[test]
fn file_overrides_apply_known_keys() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("random_word_server_config_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("server.toml");
    fs::write(
        &path,
        "bind_addr = \"127.0.0.1:9000\"\nlog_filter = \"debug\"\nfailure_rate = \"0.25\"\n",
    )
    .expect("write settings");

    let file_cfg = read_settings_file(&path)
        .expect("read settings")
        .expect("file present");
    let mut settings = Settings::default();
    let mut issues = Vec::new();
    apply_file_overrides(&mut settings, &file_cfg, &mut issues);
    assert!(issues.is_empty());

    assert_eq!(settings.server_bind, "127.0.0.1:9000");
    assert_eq!(settings.log_filter, "debug");
    assert_eq!(settings.failure_rate, 0.25);

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_settings_file_is_not_an_error() {
    let path = env::temp_dir().join("random_word_server_config_absent/server.toml");
    assert!(read_settings_file(&path).expect("read").is_none());
}

#[test]
fn malformed_settings_file_reports_context() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("random_word_server_bad_config_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("server.toml");
    fs::write(&path, "failure_rate = 0.25\n").expect("write settings");

    let err = read_settings_file(&path).expect_err("non-string value");
    assert!(format!("{err:#}").contains("flat string table"));

    fs::remove_dir_all(temp_root).expect("cleanup");
}
