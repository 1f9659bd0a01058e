use rtagclock::config::Config;
use rtagclock::errors::{AppError, ErrorCategory};
use rtagclock::terminal::Backoff;
use std::time::Duration;

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    let cfg = Config::from_yaml("database: /tmp/x.sqlite\n").unwrap();

    assert_eq!(cfg.database, "/tmp/x.sqlite");
    assert_eq!(cfg.device, "-");
    assert_eq!(cfg.read_timeout_ms, 20_000);
    assert_eq!(cfg.opening_hour, 6);
    assert_eq!(cfg.closing_hour, 21);
    assert_eq!(cfg.standard_daily_minutes, 470);
    assert_eq!(cfg.friday_daily_minutes, 370);
    assert_eq!(cfg.behind_margin_minutes, 120);
    assert_eq!(cfg.retry_delay_secs, 10);
    assert_eq!(cfg.max_retry_delay_secs, 300);
}

#[test]
fn test_explicit_values_are_kept() {
    let yaml = "
database: /var/lib/rtagclock/db.sqlite
device: /dev/ttyUSB0
read_timeout_ms: 5000
opening_hour: 7
closing_hour: 19
standard_daily_minutes: 450
friday_daily_minutes: 300
";
    let cfg = Config::from_yaml(yaml).unwrap();

    assert_eq!(cfg.device, "/dev/ttyUSB0");
    assert_eq!(cfg.read_timeout_ms, 5000);
    assert_eq!(cfg.opening_hour, 7);
    assert_eq!(cfg.closing_hour, 19);
    assert_eq!(cfg.standard_daily_minutes, 450);
    assert_eq!(cfg.friday_daily_minutes, 300);
}

#[test]
fn test_invalid_hours_are_rejected() {
    let err = Config::from_yaml("database: x\nopening_hour: 22\nclosing_hour: 21\n").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert_eq!(err.category(), ErrorCategory::Configuration);

    assert!(Config::from_yaml("database: x\nclosing_hour: 24\n").is_err());
    assert!(Config::from_yaml("database: x\nread_timeout_ms: 0\n").is_err());
}

#[test]
fn test_retry_delays_must_back_off() {
    let err = Config::from_yaml("database: x\nretry_delay_secs: 0\nmax_retry_delay_secs: 0\n")
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);

    assert!(
        Config::from_yaml("database: x\nretry_delay_secs: 30\nmax_retry_delay_secs: 10\n")
            .is_err()
    );

    let cfg =
        Config::from_yaml("database: x\nretry_delay_secs: 5\nmax_retry_delay_secs: 5\n").unwrap();
    let mut backoff = Backoff::from_config(&cfg);
    assert_eq!(backoff.next_delay(), Duration::from_secs(5));
    assert_eq!(backoff.next_delay(), Duration::from_secs(5));
}

#[test]
fn test_unparsable_yaml_is_a_config_error() {
    let err = Config::from_yaml("database: [unterminated").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}
