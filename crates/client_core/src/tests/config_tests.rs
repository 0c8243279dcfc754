use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_are_valid_urls() {
    Settings::default().validate().expect("defaults validate");
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    settings
        .apply_file(
            r#"
            search_base_url = "https://puzzles.example/search/"
            image_base_url = "https://cdn.example/img/"
            unknown_key = "ignored"
            "#,
        )
        .expect("apply file");

    assert_eq!(settings.search_base_url, "https://puzzles.example/search/");
    assert_eq!(settings.image_base_url, "https://cdn.example/img/");
    assert_eq!(
        settings.filter_base_url,
        Settings::default().filter_base_url
    );
}

#[test]
fn non_string_file_values_are_rejected() {
    let mut settings = Settings::default();
    let err = settings
        .apply_file("filter_base_url = 42")
        .expect_err("must fail");
    assert!(err.to_string().contains("flat table of strings"));
}

#[test]
fn prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    settings.apply_env(lookup_from(&[
        ("FILTER_BASE_URL", "http://plain.example/filter"),
        ("APP__FILTER_BASE_URL", "http://prefixed.example/filter"),
        ("ML_RECOMMENDATION_BASE_URL", "http://ml.example/rec"),
    ]));

    assert_eq!(settings.filter_base_url, "http://prefixed.example/filter");
    assert_eq!(settings.ml_recommendation_base_url, "http://ml.example/rec");
    assert_eq!(settings.recommendation_url(Backend::Ml), "http://ml.example/rec");
}

#[test]
fn validate_names_the_bad_key() {
    let settings = Settings {
        filter_game_state_ml_base_url: "not a url".into(),
        ..Settings::default()
    };

    let err = settings.validate().expect_err("must fail");
    assert!(
        err.to_string().contains("filter_game_state_ml_base_url"),
        "unexpected error: {err:#}"
    );
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("explorer_missing_{suffix}.toml"));

    let err = load_settings(Some(path.as_path())).expect_err("must fail");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("explorer_config_{suffix}.toml"));
    fs::write(&path, "initial_base_url = \"http://10.0.0.2:8080/start\"\n").expect("write");

    let settings = load_settings(Some(path.as_path())).expect("load");

    fs::remove_file(&path).expect("cleanup");
    if env::var("INITIAL_BASE_URL").is_err() && env::var("APP__INITIAL_BASE_URL").is_err() {
        assert_eq!(settings.initial_base_url, "http://10.0.0.2:8080/start");
    }
}
