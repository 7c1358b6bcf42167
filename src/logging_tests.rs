use super::*;

#[test]
fn test_log_config_default() {
    let config = LogConfig::default();
    assert_eq!(config.log_level, Level::INFO);
    assert!(!config.json_format);
    assert!(config.log_dir.ends_with("logs"));
}

#[test]
fn test_log_config_default_log_dir_under_data_dir() {
    let config = LogConfig::default();
    assert!(config.log_dir.starts_with(default_data_dir()));
    assert!(config.log_dir.to_string_lossy().contains(".workboard"));
}

#[test]
fn test_parse_rotation_hourly() {
    let rotation = parse_rotation("hourly");
    // Rotation doesn't impl PartialEq, so use debug
    let debug = format!("{rotation:?}");
    assert!(debug.contains("Hourly") || debug.contains("hourly") || debug.contains("3600"));
}

#[test]
fn test_parse_rotation_never() {
    let rotation = parse_rotation("never");
    let debug = format!("{rotation:?}");
    assert!(debug.contains("Never") || debug.contains("never"));
}

#[test]
fn test_parse_rotation_unknown_defaults_to_daily() {
    let weekly = format!("{:?}", parse_rotation("weekly"));
    let daily = format!("{:?}", parse_rotation("DAILY"));
    assert_eq!(weekly, daily);
}

#[test]
fn test_log_filename_constant() {
    assert_eq!(LOG_FILENAME, "workboard-daemon.log");
}
