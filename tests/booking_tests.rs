use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{dmd, init_signed_in, run_at, with_packages};

const NOW: &str = "2025-05-10T09:00";

#[test]
fn test_checkin_prices_and_listing() {
    let db_path = init_signed_in("booking_checkin", NOW);
    with_packages(&db_path, NOW);

    dmd()
        .args([
            "--db", &db_path, "--now", NOW, "booking", "checkin", "Ana Reyes", "--package", "2",
            "--hours", "3", "--student", "--seat", "A1",
        ])
        .assert()
        .success()
        .stdout(contains("₱135"));

    dmd()
        .args([
            "--db", &db_path, "--now", NOW, "booking", "checkin", "Ben Cruz", "--package", "1",
            "--loyalty",
        ])
        .assert()
        .success()
        .stdout(contains("₱0"));

    dmd()
        .args(["--db", &db_path, "booking", "list"])
        .assert()
        .success()
        .stdout(contains("Ana Reyes"))
        .stdout(contains("Ben Cruz"))
        .stdout(contains("student"))
        .stdout(contains("loyalty"))
        .stdout(contains("Page 1/1 (2 rows)"));

    dmd()
        .args([
            "--db", &db_path, "--now", NOW, "booking", "list", "--search", "ana",
        ])
        .assert()
        .success()
        .stdout(contains("Ana Reyes").and(contains("Ben Cruz").not()));

    // the 3 h booking ran out at noon
    dmd()
        .args(["--db", &db_path, "--now", "2025-05-10T12:30", "booking", "list"])
        .assert()
        .success()
        .stdout(contains("#1 Ana Reyes was due out"))
        .stdout(contains("#2 Ben Cruz was due out").not());
}

#[test]
fn test_hourly_package_needs_hours() {
    let db_path = init_signed_in("booking_hourly_hours", NOW);
    with_packages(&db_path, NOW);

    dmd()
        .args([
            "--db", &db_path, "--now", NOW, "booking", "checkin", "Ana", "--package", "2",
        ])
        .assert()
        .failure()
        .stderr(contains("billed per hour"));
}

#[test]
fn test_extend_then_checkout() {
    let db_path = init_signed_in("booking_extend", NOW);
    with_packages(&db_path, NOW);

    run_at(
        &db_path,
        NOW,
        &["booking", "checkin", "Carla", "--package", "1"],
    );

    dmd()
        .args([
            "--db",
            &db_path,
            "--now",
            "2025-05-10T16:00",
            "booking",
            "extend",
            "1",
            "--hours",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("₱98"))
        .stdout(contains("₱397"));

    run_at(&db_path, "2025-05-10T18:30", &["booking", "checkout", "1"]);

    // completed bookings cannot be extended
    dmd()
        .args([
            "--db",
            &db_path,
            "--now",
            "2025-05-10T18:40",
            "booking",
            "extend",
            "1",
            "--hours",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("already completed"));
}

#[test]
fn test_deleted_package_keeps_booking_name() {
    let db_path = init_signed_in("booking_pkg_deleted", NOW);
    with_packages(&db_path, NOW);

    run_at(&db_path, NOW, &["booking", "checkin", "Dino", "--package", "1"]);
    run_at(&db_path, NOW, &["package", "del", "1", "--yes"]);

    dmd()
        .args(["--db", &db_path, "booking", "list"])
        .assert()
        .success()
        .stdout(contains("Daily Pass"));
}

#[test]
fn test_delete_booking() {
    let db_path = init_signed_in("booking_delete", NOW);
    with_packages(&db_path, NOW);

    run_at(&db_path, NOW, &["booking", "checkin", "Eli", "--package", "1"]);

    dmd()
        .args(["--db", &db_path, "--now", NOW, "booking", "del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("deleted"));

    dmd()
        .args(["--db", &db_path, "booking", "list"])
        .assert()
        .success()
        .stdout(contains("No bookings found"));
}

#[test]
fn test_out_of_range_hours_fail_cleanly() {
    let db_path = init_signed_in("booking_hours_range", NOW);
    with_packages(&db_path, NOW);

    for bad in ["1e10", "inf", "NaN", "25"] {
        dmd()
            .args([
                "--db", &db_path, "--now", NOW, "booking", "checkin", "Ana", "--package", "2",
                "--hours", bad,
            ])
            .assert()
            .code(1)
            .stderr(contains("at most 24 hours"));
    }

    run_at(&db_path, NOW, &["booking", "checkin", "Ben", "--package", "1"]);

    dmd()
        .args([
            "--db", &db_path, "--now", NOW, "booking", "extend", "1", "--hours", "inf",
        ])
        .assert()
        .code(1)
        .stderr(contains("at most 24 hours"));

    dmd()
        .args(["--db", &db_path, "booking", "list"])
        .assert()
        .success()
        .stdout(contains("Ana").not())
        .stdout(contains("Page 1/1 (1 rows)"));
}
