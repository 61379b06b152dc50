use predicates::str::contains;

mod common;
use common::{dmd, init_signed_in, run_at};

const NOW: &str = "2025-06-01T08:00";

#[test]
fn test_grind_visit_consumes_balance() {
    let db_path = init_signed_in("flexi_grind", NOW);

    dmd()
        .args([
            "--db", &db_path, "--now", NOW, "flexi", "register", "Juan Dela Cruz", "--plan",
            "grind",
        ])
        .assert()
        .success()
        .stdout(contains("₱2,609"))
        .stdout(contains("60 h left"));

    run_at(&db_path, "2025-06-02T09:00", &["flexi", "checkin", "1"]);

    dmd()
        .args([
            "--db",
            &db_path,
            "--now",
            "2025-06-02T09:30",
            "flexi",
            "checkin",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("already checked in"));

    dmd()
        .args([
            "--db",
            &db_path,
            "--now",
            "2025-06-02T13:30",
            "flexi",
            "checkout",
            "1",
        ])
        .assert()
        .success()
        .stdout(contains("4.5 h"))
        .stdout(contains("55.5 h left"));

    // a second checkout is a no-op
    dmd()
        .args([
            "--db",
            &db_path,
            "--now",
            "2025-06-02T14:00",
            "flexi",
            "checkout",
            "1",
        ])
        .assert()
        .success()
        .stdout(contains("not checked in"));

    dmd()
        .args(["--db", &db_path, "flexi", "history", "1"])
        .assert()
        .success()
        .stdout(contains("Total: 4.5 h over 1 visit(s)"));
}

#[test]
fn test_expired_membership_cannot_check_in() {
    let db_path = init_signed_in("flexi_expired", NOW);

    run_at(
        &db_path,
        NOW,
        &["flexi", "register", "Ana", "--plan", "grind", "--start", "2025-04-01"],
    );

    dmd()
        .args([
            "--db",
            &db_path,
            "--now",
            "2025-06-01T09:00",
            "flexi",
            "checkin",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("expired"));
}

#[test]
fn test_focus_long_visit_warns() {
    let db_path = init_signed_in("flexi_focus_cap", NOW);

    run_at(
        &db_path,
        NOW,
        &["flexi", "register", "Ben", "--plan", "focus"],
    );
    run_at(&db_path, "2025-06-01T09:00", &["flexi", "checkin", "1"]);

    dmd()
        .args([
            "--db",
            &db_path,
            "--now",
            "2025-06-01T15:00",
            "flexi",
            "checkout",
            "1",
        ])
        .assert()
        .success()
        .stdout(contains("Unlimited"))
        .stdout(contains("session limit"));
}

#[test]
fn test_unknown_plan_is_rejected() {
    let db_path = init_signed_in("flexi_bad_plan", NOW);

    dmd()
        .args([
            "--db", &db_path, "--now", NOW, "flexi", "register", "Ana", "--plan", "weekly",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid plan"));
}
