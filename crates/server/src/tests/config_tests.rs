use super::*;

use std::path::Path;

#[test]
fn defaults_bind_stream_and_reflector_ports() {
    let settings = Settings::default();
    assert_eq!(settings.events_bind, "0.0.0.0:8000");
    assert_eq!(settings.reflector_bind, "0.0.0.0:8001");
    assert_eq!(settings.channel_capacity, 256);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    settings.apply_file(
        r#"
events_bind = "127.0.0.1:9000"
static_dir = "/srv/podvis/static"
channel_capacity = 32
unrelated = "ignored"
"#,
    );

    assert_eq!(settings.events_bind, "127.0.0.1:9000");
    assert_eq!(settings.reflector_bind, "0.0.0.0:8001");
    assert_eq!(settings.static_dir, Path::new("/srv/podvis/static"));
    assert_eq!(settings.channel_capacity, 32);
}

#[test]
fn unparsable_file_leaves_settings_untouched() {
    let mut settings = Settings::default();
    settings.apply_file("events_bind = ");
    assert_eq!(settings, Settings::default());
}

#[test]
fn env_overrides_file() {
    let mut settings = Settings::default();
    settings.apply_file(r#"reflector_bind = "127.0.0.1:7001""#);
    settings.apply_env(|key| match key {
        "PODVIS__REFLECTOR_BIND" => Some("127.0.0.1:9001".to_string()),
        "PODVIS__INDEX_PATH" => Some("/srv/index.html".to_string()),
        _ => None,
    });

    assert_eq!(settings.reflector_bind, "127.0.0.1:9001");
    assert_eq!(settings.index_path, Path::new("/srv/index.html"));
}

#[test]
fn zero_or_garbage_capacity_is_ignored() {
    let mut settings = Settings::default();
    settings.apply_env(|key| (key == "PODVIS__CHANNEL_CAPACITY").then(|| "0".to_string()));
    assert_eq!(settings.channel_capacity, 256);

    settings.apply_env(|key| (key == "PODVIS__CHANNEL_CAPACITY").then(|| "many".to_string()));
    assert_eq!(settings.channel_capacity, 256);
}
