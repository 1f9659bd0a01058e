use rtagclock::db::ledger::{compare_and_append, events_for_user};
use rtagclock::errors::{AppError, ErrorCategory};
use rtagclock::models::status::Status;

mod common;
use common::{add_user, event_count, open_test_db, record, ts, user_status};

#[test]
fn test_append_updates_cached_status_and_reads_time_back() {
    let (_db, mut pool) = open_test_db("ledger_append");
    let uid = add_user(&pool, "Aino", "fi");

    let appended =
        compare_and_append(&mut pool.conn, uid, Status::LOGGED_OUT, Status::LOGGED_IN).unwrap();

    assert!(appended.event_id > 0);
    assert!(appended.at.is_some());
    assert_eq!(user_status(&pool, uid), Status::LOGGED_IN);
    assert_eq!(event_count(&pool), 1);
}

#[test]
fn test_stale_expected_status_is_a_conflict() {
    let (_db, mut pool) = open_test_db("ledger_conflict");
    let uid = add_user(&pool, "Aino", "fi");
    record(&pool, uid, Status::LOGGED_IN, "2025-03-03 08:00:00");

    let err = compare_and_append(&mut pool.conn, uid, Status::LOGGED_OUT, Status::LOGGED_IN)
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::AppendConflict {
            expected: 0,
            found: 1,
            ..
        }
    ));
    assert_eq!(err.category(), ErrorCategory::Integrity);
    // nothing was appended
    assert_eq!(event_count(&pool), 1);
}

#[test]
fn test_unknown_user_is_rejected() {
    let (_db, mut pool) = open_test_db("ledger_unknown_user");

    let err =
        compare_and_append(&mut pool.conn, 42, Status::LOGGED_OUT, Status::LOGGED_IN).unwrap_err();

    assert!(matches!(err, AppError::UnknownUser(42)));
    assert_eq!(event_count(&pool), 0);
}

#[test]
fn test_ledger_rows_cannot_be_changed() {
    let (_db, pool) = open_test_db("ledger_append_only");
    let uid = add_user(&pool, "Aino", "fi");
    let id = record(&pool, uid, Status::LOGGED_IN, "2025-03-03 08:00:00");

    assert!(
        pool.conn
            .execute("UPDATE loggings SET new_status = 0 WHERE event_id = ?1", [id])
            .is_err()
    );
    assert!(
        pool.conn
            .execute("DELETE FROM loggings WHERE event_id = ?1", [id])
            .is_err()
    );
    assert_eq!(event_count(&pool), 1);
}

#[test]
fn test_events_come_back_in_order() {
    let (_db, pool) = open_test_db("ledger_order");
    let uid = add_user(&pool, "Aino", "fi");
    let other = add_user(&pool, "Bo", "se");
    record(&pool, uid, Status::LOGGED_IN, "2025-03-03 08:00:00");
    record(&pool, other, Status::LOGGED_IN, "2025-03-03 08:05:00");
    record(&pool, uid, Status::LOGGED_OUT, "2025-03-03 16:00:00");

    let events = events_for_user(&pool.conn, uid, ts("2025-03-03 00:00:00"), None).unwrap();

    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.user_id == uid));
    assert_eq!(events[0].at, ts("2025-03-03 08:00:00"));
    assert_eq!(events[1].status, Status::LOGGED_OUT);
}

#[test]
fn test_time_going_backwards_is_detected() {
    let (_db, pool) = open_test_db("ledger_out_of_order");
    let uid = add_user(&pool, "Aino", "fi");
    record(&pool, uid, Status::LOGGED_IN, "2025-03-03 12:00:00");
    // later event id, earlier timestamp
    record(&pool, uid, Status::LOGGED_OUT, "2025-03-03 09:00:00");

    let err = events_for_user(&pool.conn, uid, ts("2025-03-03 00:00:00"), None).unwrap_err();

    assert!(matches!(err, AppError::LedgerOutOfOrder { .. }));
    assert_eq!(err.category(), ErrorCategory::Integrity);
}

#[test]
fn test_unparsable_timestamp_is_reported() {
    let (_db, pool) = open_test_db("ledger_bad_ts");
    let uid = add_user(&pool, "Aino", "fi");
    record(&pool, uid, Status::LOGGED_IN, "2025-03-03 yesterday");

    let err = events_for_user(&pool.conn, uid, ts("2025-03-03 00:00:00"), None).unwrap_err();
    assert!(matches!(err, AppError::InvalidTimestamp(_)));
}

#[test]
fn test_status_bits() {
    let s = Status::LOGGED_IN | Status::LOGGED_BY_ADMIN;
    assert!(s.is_logged_in());
    assert!(s.is_logged_by_admin());
    assert_eq!(s.toggled().normalized(), Status::LOGGED_OUT);

    let auto = Status::AUTO_LOG_OUT;
    assert_eq!(auto.toggled().normalized(), Status::LOGGED_IN);

    let forced = s.forced_logout();
    assert_eq!(forced, Status::AUTO_LOG_OUT);
    assert!(!forced.is_logged_in());
    assert_eq!(forced.to_string(), "out+auto");
}

#[test]
fn test_consistency_check_spots_stale_cached_status() {
    use rtagclock::db::stats::{missing_ledger_guards, status_mismatches};

    let (_db, pool) = open_test_db("ledger_consistency");
    let aino = add_user(&pool, "Aino", "fi");
    let erik = add_user(&pool, "Erik", "se");
    add_user(&pool, "Nobody yet", "no");

    record(&pool, aino, Status::LOGGED_IN, "2025-03-03 08:00:00");
    record(&pool, erik, Status::LOGGED_IN, "2025-03-03 08:05:00");
    assert!(status_mismatches(&pool).unwrap().is_empty());
    assert!(missing_ledger_guards(&pool).unwrap().is_empty());

    // cached status edited behind the ledger's back
    pool.conn
        .execute("UPDATE users SET status = 0 WHERE id = ?1", [erik])
        .unwrap();

    assert_eq!(
        status_mismatches(&pool).unwrap(),
        vec![(erik, Status::LOGGED_OUT, Status::LOGGED_IN)]
    );
}
