use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{rti, setup_test_db, temp_out};

fn init(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));
}

/// Fresh DB with user 1 ("Aino", fi) bound to tag 0001
fn init_with_user(db_path: &str) {
    init(db_path);

    rti()
        .args(["--db", db_path, "user", "add", "--name", "Aino", "--country", "fi"])
        .assert()
        .success()
        .stdout(contains("User 1 created"));

    rti()
        .args(["--db", db_path, "tag", "assign", "0001", "1"])
        .assert()
        .success()
        .stdout(contains("Tag 0001 assigned to user 1"));
}

fn tap(db_path: &str, tag: &str) -> assert_cmd::assert::Assert {
    rti()
        .args(["--db", db_path, "tap", tag, "--ignore-hours"])
        .assert()
        .success()
}

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");
    init(&db_path);

    rti()
        .args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Users:").and(contains("Ledger events:")));

    rti()
        .args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_user_add_rejects_unknown_country() {
    let db_path = setup_test_db("cli_bad_country");
    init(&db_path);

    rti()
        .args(["--db", &db_path, "user", "add", "--name", "Hans", "--country", "de"])
        .assert()
        .failure()
        .stderr(contains("Invalid country code: de"));
}

#[test]
fn test_tag_assign_requires_existing_user() {
    let db_path = setup_test_db("cli_tag_no_user");
    init(&db_path);

    rti()
        .args(["--db", &db_path, "tag", "assign", "0001", "7"])
        .assert()
        .failure()
        .stderr(contains("Unknown user id: 7"));
}

#[test]
fn test_tap_logs_in_and_out() {
    let db_path = setup_test_db("cli_tap");
    init_with_user(&db_path);

    tap(&db_path, "0001")
        .stdout(contains("Aino").and(contains(" logged in on ")).and(contains("Tervetuloa.")))
        .stdout(contains("Your week so far:"));

    tap(&db_path, "0001").stdout(contains(" logged out on ").and(contains("Näkemiin.")));

    rti()
        .args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(contains("Aino").and(contains("out")));
}

#[test]
fn test_tap_unknown_tag() {
    let db_path = setup_test_db("cli_tap_unknown");
    init(&db_path);

    tap(&db_path, "ABC123")
        .stdout(contains("Previously unknown tag inserted into database."))
        .stdout(contains("This tag isn't assigned to anyone."));

    // second time it is known, but still unassigned
    tap(&db_path, "ABC123").stdout(
        contains("This tag isn't assigned to anyone.")
            .and(contains("Previously unknown tag").not()),
    );

    rti()
        .args(["--db", &db_path, "tag", "list"])
        .assert()
        .success()
        .stdout(contains("ABC123"));
}

#[test]
fn test_sweep_and_notice_next_time() {
    let db_path = setup_test_db("cli_sweep");
    init_with_user(&db_path);

    rti()
        .args(["--db", &db_path, "sweep"])
        .assert()
        .success()
        .stdout(contains("Nobody is logged in."));

    tap(&db_path, "0001");

    rti()
        .args(["--db", &db_path, "sweep"])
        .assert()
        .success()
        .stdout(contains("Closing time!").and(contains("was automatically logged out on")));

    rti()
        .args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(contains("out+auto"));

    tap(&db_path, "0001")
        .stdout(contains("Seems like you were automatically logged out last time."));

    tap(&db_path, "0001").stdout(
        contains("Seems like you were automatically logged out last time.").not(),
    );
}

#[test]
fn test_admin_status_marks_the_event() {
    let db_path = setup_test_db("cli_admin");
    init_with_user(&db_path);

    rti()
        .args(["--db", &db_path, "admin", "status", "1", "--in"])
        .assert()
        .success()
        .stdout(contains("User 1 logged in by admin"));

    rti()
        .args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(contains("in+admin"));

    rti()
        .args(["--db", &db_path, "admin", "status", "1"])
        .assert()
        .failure();
}

#[test]
fn test_holidays_and_report() {
    let db_path = setup_test_db("cli_holidays");
    init_with_user(&db_path);

    rti()
        .args(["--db", &db_path, "holiday", "add", "2025-03-07", "--country", "fi"])
        .assert()
        .success();

    rti()
        .args([
            "--db", &db_path, "holiday", "add", "2025-03-06", "--country", "fi", "--minutes",
            "120",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "holiday", "list", "--country", "fi"])
        .assert()
        .success()
        .stdout(contains("2025-03-07").and(contains("whole day")).and(contains("02h 00m")));

    // Mon-Thu 4 x 470 min, minus 120 min on Thursday, Friday off
    rti()
        .args(["--db", &db_path, "report", "1", "--date", "2025-03-05"])
        .assert()
        .success()
        .stdout(contains("Your week so far:").and(contains("29h 20m")));

    rti()
        .args(["--db", &db_path, "report", "1", "--date", "05/03/2025"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_export_csv_and_json() {
    let db_path = setup_test_db("cli_export");
    init_with_user(&db_path);
    tap(&db_path, "0001");
    tap(&db_path, "0001");

    let csv_out = temp_out("cli_export", "csv");
    rti()
        .args(["--db", &db_path, "export", "--format", "csv", "--file", &csv_out])
        .assert()
        .success();
    let csv = fs::read_to_string(&csv_out).expect("csv written");
    assert!(csv.starts_with("event_id,user_id,user_name,timestamp,state"));
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("Aino"));

    let json_out = temp_out("cli_export", "json");
    rti()
        .args(["--db", &db_path, "export", "--format", "json", "--file", &json_out])
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).expect("json written")).unwrap();
    assert_eq!(json.as_array().map(|a| a.len()), Some(2));
    assert_eq!(json[0]["state"], "in");
    assert_eq!(json[1]["state"], "out");
}

#[test]
fn test_backup_and_log() {
    let db_path = setup_test_db("cli_backup");
    init_with_user(&db_path);
    tap(&db_path, "0001");

    let backup = temp_out("cli_backup", "sqlite");
    rti()
        .args(["--db", &db_path, "backup", "--file", &backup])
        .assert()
        .success()
        .stdout(contains("Backup created"));
    assert!(fs::metadata(&backup).is_ok());

    // refuses to overwrite
    rti()
        .args(["--db", &db_path, "backup", "--file", &backup])
        .assert()
        .failure();

    let zipped = temp_out("cli_backup_zip", "sqlite");
    let zip_path = temp_out("cli_backup_zip", "zip");
    rti()
        .args(["--db", &db_path, "backup", "--file", &zipped, "--compress"])
        .assert()
        .success()
        .stdout(contains("Compressed"));
    assert!(fs::metadata(&zip_path).is_ok());
    assert!(fs::metadata(&zipped).is_err());

    rti()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied").and(contains("toggle")).and(contains("backup")));
}
