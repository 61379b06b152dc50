use predicates::str::contains;

mod common;
use common::{dmd, init_signed_in, run_at, temp_out, with_packages};
use std::fs;

const NOW: &str = "2025-09-01T08:00";

fn with_bookings(name: &str) -> String {
    let db_path = init_signed_in(name, NOW);
    with_packages(&db_path, NOW);
    run_at(
        &db_path,
        "2025-09-01T09:00",
        &["booking", "checkin", "Ana Reyes", "--package", "1"],
    );
    run_at(
        &db_path,
        "2025-09-15T09:00",
        &["booking", "checkin", "Ben Cruz", "--package", "1"],
    );
    db_path
}

#[test]
fn test_export_bookings_csv_all() {
    let db_path = with_bookings("export_bookings_csv");
    let out = temp_out("export_bookings_csv", "csv");

    dmd()
        .args([
            "--db", &db_path, "export", "--what", "bookings", "--format", "csv", "--file", &out,
        ])
        .assert()
        .success()
        .stdout(contains("2 rows"));

    let content = fs::read_to_string(&out).expect("read exported csv");
    assert!(content.starts_with("id,customer_name,seat_number,package"));
    assert!(content.contains("2025-09-01T09:00:00"));
    assert!(content.contains("2025-09-15T09:00:00"));
}

#[test]
fn test_export_bookings_json_range() {
    let db_path = with_bookings("export_bookings_json");
    let out = temp_out("export_bookings_json", "json");

    dmd()
        .args([
            "--db", &db_path, "export", "--what", "bookings", "--format", "json", "--file", &out,
            "--range", "2025-09-10:2025-09-20",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let rows: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let rows = rows.as_array().expect("json array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["customer_name"], "Ben Cruz");
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = with_bookings("export_relative_path");

    dmd()
        .args([
            "--db", &db_path, "export", "--what", "bookings", "--file", "bookings.csv",
        ])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_export_invalid_range() {
    let db_path = with_bookings("export_bad_range");
    let out = temp_out("export_bad_range", "csv");

    dmd()
        .args([
            "--db", &db_path, "export", "--what", "bookings", "--file", &out, "--range",
            "2025-13",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn test_backup_copies_database() {
    let db_path = with_bookings("export_backup");
    let out = temp_out("export_backup", "sqlite");

    dmd()
        .args(["--db", &db_path, "backup", "--file", &out, "--yes"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(fs::metadata(&out).is_ok());
}
