use chrono::Duration;
use rtagclock::core::attendance::{AttendanceEngine, Progress, ToggleOutcome, Weekly};
use rtagclock::core::calculator::accumulated::accumulated_time;
use rtagclock::db::ledger::Stamp;
use rtagclock::errors::{AppError, ErrorCategory};
use rtagclock::models::country::Country;
use rtagclock::models::status::Status;
use rtagclock::ui::report::{AUTO_LOGOUT_NOTICE, COUNTRY_WARNING, NOT_ASSIGNED, render_toggle};
use rtagclock::ui::sink::MemorySink;

mod common;
use common::{
    add_user, bind_tag, event_count, open_test_db, record, test_config, ts, user_status,
};

fn toggled(outcome: ToggleOutcome) -> Box<rtagclock::core::attendance::Toggled> {
    match outcome {
        ToggleOutcome::Toggled(t) => t,
        other => panic!("expected a toggle, got {other:?}"),
    }
}

#[test]
fn test_unknown_tag_is_stored_unassigned_without_events() {
    let (db, mut pool) = open_test_db("att_unknown_tag");
    let engine = AttendanceEngine::new(&test_config(&db));
    let now = ts("2025-03-03 09:00:00");

    let outcome = engine.toggle(&mut pool, "ABC123", now).unwrap();
    match &outcome {
        ToggleOutcome::UnknownTag {
            tag,
            serial,
            inserted,
        } => {
            assert_eq!(tag, "ABC123");
            assert!(serial.starts_with("2025-03-03T09:00:00"));
            assert!(inserted);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let user_id: Option<i64> = pool
        .conn
        .query_row("SELECT user_id FROM tags WHERE rfid_id = 'ABC123'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(user_id, None);
    assert_eq!(event_count(&pool), 0);

    let mut sink = MemorySink::new();
    render_toggle(&mut sink, &outcome);
    assert!(sink.contains("Previously unknown tag inserted into database."));
    assert!(sink.contains(NOT_ASSIGNED));

    // second read of the same tag: known but unassigned
    let again = engine.toggle(&mut pool, "ABC123", now).unwrap();
    assert!(matches!(again, ToggleOutcome::Unassigned { .. }));
    assert_eq!(event_count(&pool), 0);
}

#[test]
fn test_toggle_twice_logs_in_then_out() {
    let (db, mut pool) = open_test_db("att_toggle_twice");
    let uid = add_user(&pool, "Aino", "fi");
    bind_tag(&pool, "0001", uid);
    let engine = AttendanceEngine::new(&test_config(&db));
    let now = ts("2025-03-03 09:00:00");

    let first = toggled(engine.toggle(&mut pool, "0001", now).unwrap());
    assert!(first.logged_in());
    assert!(matches!(first.stamp, Stamp::Ledger(_)));
    assert_eq!(first.country, Some(Country::Finland));
    assert_eq!(user_status(&pool, uid), Status::LOGGED_IN);

    let second = toggled(engine.toggle(&mut pool, "0001", now).unwrap());
    assert!(!second.logged_in());
    assert!(second.event_id > first.event_id);
    assert!(second.stamp.time() >= first.stamp.time());
    assert_eq!(user_status(&pool, uid), Status::LOGGED_OUT);
    assert_eq!(event_count(&pool), 2);

    let mut sink = MemorySink::new();
    render_toggle(&mut sink, &ToggleOutcome::Toggled(first));
    assert!(sink.contains("Aino"));
    assert!(sink.contains("logged in on"));
    assert!(sink.contains("Tervetuloa."));
}

#[test]
fn test_worked_time_equals_gap_between_ledger_stamps() {
    let (db, mut pool) = open_test_db("att_elapsed_gap");
    let uid = add_user(&pool, "Aino", "fi");
    bind_tag(&pool, "0001", uid);
    let engine = AttendanceEngine::new(&test_config(&db));
    let now = ts("2025-03-03 09:00:00");

    let login = toggled(engine.toggle(&mut pool, "0001", now).unwrap());
    // store timestamps have one-second resolution
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let logout = toggled(engine.toggle(&mut pool, "0001", now).unwrap());

    assert!(matches!(login.stamp, Stamp::Ledger(_)));
    assert!(matches!(logout.stamp, Stamp::Ledger(_)));
    let gap = logout.stamp.time() - login.stamp.time();
    assert!(gap >= Duration::seconds(1));

    let acc = accumulated_time(
        &pool.conn,
        uid,
        login.stamp.time(),
        logout.stamp.time() + Duration::seconds(1),
    )
    .unwrap();
    assert_eq!(acc.worked, gap);
    assert!(!acc.was_kicked);
}

#[test]
fn test_admin_flag_is_cleared_by_own_toggle() {
    let (db, mut pool) = open_test_db("att_admin_flag");
    let uid = add_user(&pool, "Aino", "fi");
    bind_tag(&pool, "0001", uid);
    record(
        &pool,
        uid,
        Status::LOGGED_IN | Status::LOGGED_BY_ADMIN,
        "2025-03-03 08:00:00",
    );
    let engine = AttendanceEngine::new(&test_config(&db));

    let t = toggled(engine.toggle(&mut pool, "0001", ts("2025-03-03 16:00:00")).unwrap());
    assert_eq!(t.status, Status::LOGGED_OUT);
    assert_eq!(user_status(&pool, uid), Status::LOGGED_OUT);
}

#[test]
fn test_finnish_monday_scenario_is_ahead() {
    let (db, pool) = open_test_db("att_fi_monday");
    let uid = add_user(&pool, "Aino", "fi");
    record(&pool, uid, Status::LOGGED_IN, "2025-03-03 08:00:00");
    record(&pool, uid, Status::LOGGED_OUT, "2025-03-03 16:00:00");
    let engine = AttendanceEngine::new(&test_config(&db));

    let report = engine
        .weekly_report(&pool.conn, uid, Country::Finland, ts("2025-03-03 16:00:00"))
        .unwrap();

    assert_eq!(report.accumulated, Duration::hours(8));
    assert_eq!(report.norm_to_date, Duration::minutes(470));
    assert_eq!(report.week_norm, Duration::minutes(4 * 470 + 370));
    assert_eq!(report.progress, Progress::Ahead);

    assert_eq!(report.days.len(), 5);
    assert_eq!(report.days[0].done, Duration::hours(8));
    assert_eq!(report.days[0].progress, Some(Progress::Ahead));
    assert_eq!(report.days[1].progress, None);
    assert_eq!(report.days[4].norm, Duration::minutes(370));
}

#[test]
fn test_behind_when_far_short_of_norm() {
    let (db, pool) = open_test_db("att_behind");
    let uid = add_user(&pool, "Bo", "se");
    record(&pool, uid, Status::LOGGED_IN, "2025-03-04 08:00:00");
    record(&pool, uid, Status::LOGGED_OUT, "2025-03-04 10:00:00");
    let engine = AttendanceEngine::new(&test_config(&db));

    let report = engine
        .weekly_report(&pool.conn, uid, Country::Sweden, ts("2025-03-04 10:00:00"))
        .unwrap();

    assert_eq!(report.norm_to_date, Duration::minutes(2 * 470));
    assert_eq!(report.progress, Progress::Behind);
    assert_eq!(report.days[0].progress, Some(Progress::Behind));
}

#[test]
fn test_auto_logout_notice_is_shown_once() {
    let (db, mut pool) = open_test_db("att_auto_notice");
    let uid = add_user(&pool, "Aino", "fi");
    bind_tag(&pool, "0001", uid);
    record(&pool, uid, Status::LOGGED_IN, "2025-03-03 08:00:00");
    record(&pool, uid, Status::AUTO_LOG_OUT, "2025-03-03 21:00:00");
    let engine = AttendanceEngine::new(&test_config(&db));

    let morning = toggled(engine.toggle(&mut pool, "0001", ts("2025-03-04 08:00:00")).unwrap());
    assert!(morning.auto_logout_notice);
    assert_eq!(morning.status, Status::LOGGED_IN);

    let mut sink = MemorySink::new();
    render_toggle(&mut sink, &ToggleOutcome::Toggled(morning));
    assert_eq!(sink.count(AUTO_LOGOUT_NOTICE.trim_end()), 1);
    // the notice comes after the weekly report
    let text = sink.text();
    let report_at = text.find("Your week so far:").unwrap();
    let notice_at = text.find(AUTO_LOGOUT_NOTICE).unwrap();
    assert!(notice_at > report_at);

    let evening = toggled(engine.toggle(&mut pool, "0001", ts("2025-03-04 16:00:00")).unwrap());
    assert!(!evening.auto_logout_notice);

    let mut sink = MemorySink::new();
    render_toggle(&mut sink, &ToggleOutcome::Toggled(evening));
    assert!(!sink.contains(AUTO_LOGOUT_NOTICE));
}

#[test]
fn test_unknown_country_still_records_the_event() {
    let (db, mut pool) = open_test_db("att_unknown_country");
    let uid = add_user(&pool, "Hans", "de");
    bind_tag(&pool, "0042", uid);
    let engine = AttendanceEngine::new(&test_config(&db));

    let t = toggled(engine.toggle(&mut pool, "0042", ts("2025-03-03 09:00:00")).unwrap());
    assert!(matches!(t.weekly, Weekly::UnknownCountry(ref c) if c == "de"));
    assert_eq!(event_count(&pool), 1);

    let mut sink = MemorySink::new();
    render_toggle(&mut sink, &ToggleOutcome::Toggled(t));
    assert!(sink.contains("Welcome."));
    assert!(sink.contains(COUNTRY_WARNING));
    assert!(!sink.contains("Your week so far:"));
}

#[test]
fn test_tag_bound_to_missing_user_is_an_integrity_error() {
    let (db, mut pool) = open_test_db("att_missing_user");
    pool.conn
        .pragma_update(None, "foreign_keys", "OFF")
        .unwrap();
    bind_tag(&pool, "0099", 99);
    let engine = AttendanceEngine::new(&test_config(&db));

    let err = engine
        .toggle(&mut pool, "0099", ts("2025-03-03 09:00:00"))
        .unwrap_err();

    assert!(matches!(err, AppError::MissingUser { user_id: 99, .. }));
    assert_eq!(err.category(), ErrorCategory::Integrity);
    assert_eq!(event_count(&pool), 0);
}

#[test]
fn test_opening_hours() {
    let engine = AttendanceEngine::new(&test_config("unused"));

    assert!(!engine.accepts_logins_at(ts("2025-03-03 05:59:59")));
    assert!(engine.accepts_logins_at(ts("2025-03-03 06:00:00")));
    assert!(engine.accepts_logins_at(ts("2025-03-03 20:59:59")));
    assert!(!engine.accepts_logins_at(ts("2025-03-03 21:00:00")));
}
