use rtagclock::core::export::ExportLogic;
use rtagclock::export::{ExportFormat, parse_range};
use rtagclock::models::status::Status;
use std::fs;

mod common;
use common::{add_user, day, open_test_db, record, temp_out};

#[test]
fn test_parse_range_forms() {
    assert_eq!(
        parse_range("2025").unwrap(),
        (day("2025-01-01"), day("2025-12-31"))
    );
    assert_eq!(
        parse_range("2024-02").unwrap(),
        (day("2024-02-01"), day("2024-02-29"))
    );
    assert_eq!(
        parse_range("2025-03-01:2025-03-07").unwrap(),
        (day("2025-03-01"), day("2025-03-07"))
    );
    assert_eq!(
        parse_range("2025-01:2025-02").unwrap(),
        (day("2025-01-01"), day("2025-02-28"))
    );

    assert!(parse_range("2025-03:2025-03-07").is_err());
    assert!(parse_range("2025-03-07:2025-03-01").is_err());
    assert!(parse_range("03/2025").is_err());
}

#[test]
fn test_export_only_events_in_range() {
    let (_db, mut pool) = open_test_db("export_range");
    let uid = add_user(&pool, "Aino", "fi");
    record(&pool, uid, Status::LOGGED_IN, "2025-02-28 08:00:00");
    record(&pool, uid, Status::LOGGED_OUT, "2025-02-28 16:00:00");
    record(&pool, uid, Status::LOGGED_IN, "2025-03-03 08:00:00");
    record(&pool, uid, Status::AUTO_LOG_OUT, "2025-03-03 21:00:00");

    let out = temp_out("export_range", "csv");
    let n = ExportLogic::export(&mut pool, ExportFormat::Csv, &out, Some("2025-03"), true).unwrap();
    assert_eq!(n, 2);

    let csv = fs::read_to_string(&out).unwrap();
    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("2025-03-03 08:00:00"));
    assert!(rows[1].contains("2025-03-03 21:00:00"));
    // auto_logout column
    assert!(rows[1].contains(",out,true,false,2"));
}

#[test]
fn test_empty_range_writes_nothing() {
    let (_db, mut pool) = open_test_db("export_empty");
    let out = temp_out("export_empty", "json");

    let n = ExportLogic::export(&mut pool, ExportFormat::Json, &out, Some("2019"), true).unwrap();
    assert_eq!(n, 0);
    assert!(fs::metadata(&out).is_err());
}
