//! Unit tests for settings parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|&(name, value)| (name.to_owned(), value.to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[rstest]
fn defaults_apply_when_nothing_is_set() {
    let settings = settings_from_env(&mock_env(&[]), false).expect("defaults");

    assert_eq!(settings.port, 5001);
    assert_eq!(settings.db_path, PathBuf::from("test.db"));
    assert!(settings.allowed_origins.allows("http://localhost:3000"));
    assert!(!settings.allowed_origins.allows("https://example.com"));
    assert!(!settings.debug);
    assert!(!settings.containerised);
    assert_eq!(
        settings.bind_addr(),
        "0.0.0.0:5001".parse::<SocketAddr>().expect("socket address")
    );
}

#[rstest]
fn explicit_values_are_used() {
    let env = mock_env(&[
        ("PORT", "8080"),
        ("DB_PATH", "/data/users.db"),
        ("ALLOWED_ORIGINS", "https://a.example.com,https://b.example.com"),
    ]);
    let settings = settings_from_env(&env, false).expect("settings");

    assert_eq!(settings.port, 8080);
    assert_eq!(settings.db_path, PathBuf::from("/data/users.db"));
    assert!(settings.allowed_origins.allows("https://b.example.com"));
    assert!(!settings.allowed_origins.allows("http://localhost:3000"));
}

#[rstest]
#[case("eighty")]
#[case("70000")]
#[case("-1")]
fn invalid_port_is_rejected(#[case] value: &str) {
    let err = settings_from_env(&mock_env(&[("PORT", value)]), false).expect_err("bad port");
    assert!(matches!(err, SettingsError::InvalidEnv { name: PORT_ENV, .. }));
}

#[rstest]
#[case("sometimes")]
#[case("")]
#[case("enabled")]
fn unrecognised_debug_flag_means_off(#[case] value: &str) {
    let settings =
        settings_from_env(&mock_env(&[("DEBUG", value)]), false).expect("settings still load");
    assert!(!settings.debug);
    assert!(!settings.dev_mode());
}

#[rstest]
#[case("TRUE")]
#[case("1")]
#[case(" yes ")]
fn recognised_debug_flags_enable_dev_mode(#[case] value: &str) {
    let settings = settings_from_env(&mock_env(&[("DEBUG", value)]), false).expect("settings");
    assert!(settings.dev_mode());
}

#[rstest]
#[case(&[("DEBUG", "true")], false, true)]
#[case(&[("DEBUG", "FALSE")], false, false)]
#[case(&[("DEBUG", "true"), ("DOCKER_ENV", "true")], false, false)]
#[case(&[("DEBUG", "true")], true, false)]
#[case(&[("DEBUG", "true"), ("DOCKER_ENV", "no")], false, true)]
fn dev_mode_never_applies_in_containers(
    #[case] vars: &[(&str, &str)],
    #[case] dockerenv: bool,
    #[case] expected: bool,
) {
    let settings = settings_from_env(&mock_env(vars), dockerenv).expect("settings");
    assert_eq!(settings.dev_mode(), expected);
    assert_eq!(settings.stats_options().dev_mode, expected);
}

#[rstest]
fn blank_db_path_falls_back_to_default() {
    let settings = settings_from_env(&mock_env(&[("DB_PATH", "  ")]), false).expect("settings");
    assert_eq!(settings.db_path, PathBuf::from("test.db"));
}
