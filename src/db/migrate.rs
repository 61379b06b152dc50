use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// One schema step. `version` is recorded in the `log` table as
/// `migration_applied` once the step has run.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250101_0001_create_packages",
        description: "Created packages table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS packages (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            price      INTEGER NOT NULL DEFAULT 0,
            duration   REAL NOT NULL DEFAULT 0,
            is_hourly  INTEGER NOT NULL DEFAULT 0 CHECK(is_hourly IN (0,1))
        );
        "#,
    },
    Migration {
        version: "20250101_0002_create_bookings",
        description: "Created bookings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_name  TEXT NOT NULL,
            seat_number    TEXT NOT NULL DEFAULT '',
            package_id     INTEGER REFERENCES packages(id) ON DELETE SET NULL,
            package_name   TEXT NOT NULL DEFAULT '',
            duration_hours REAL NOT NULL DEFAULT 0,
            check_in       TEXT NOT NULL,
            check_out      TEXT,
            amount_paid    INTEGER NOT NULL DEFAULT 0,
            status         TEXT NOT NULL DEFAULT 'Active' CHECK(status IN ('Active','Completed')),
            is_student     INTEGER NOT NULL DEFAULT 0,
            is_examinee    INTEGER NOT NULL DEFAULT 0,
            is_group       INTEGER NOT NULL DEFAULT 0,
            is_loyalty     INTEGER NOT NULL DEFAULT 0,
            rentals        TEXT NOT NULL DEFAULT '',
            notes          TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_bookings_check_in ON bookings(check_in);
        CREATE INDEX IF NOT EXISTS idx_bookings_customer ON bookings(customer_name);
        "#,
    },
    Migration {
        version: "20250101_0003_create_exclusive_bookings",
        description: "Created exclusive_bookings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS exclusive_bookings (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            client_name    TEXT NOT NULL,
            booking_date   TEXT NOT NULL,
            start_time     TEXT NOT NULL,
            end_date       TEXT NOT NULL,
            end_time       TEXT NOT NULL,
            duration_hours REAL NOT NULL DEFAULT 0,
            pax            INTEGER NOT NULL DEFAULT 1,
            guest_list     TEXT NOT NULL DEFAULT '',
            amount_paid    INTEGER NOT NULL DEFAULT 0,
            status         TEXT NOT NULL DEFAULT 'Confirmed' CHECK(status IN ('Confirmed','Completed')),
            notes          TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_exclusive_date ON exclusive_bookings(booking_date);
        "#,
    },
    Migration {
        version: "20250101_0004_create_flexi",
        description: "Created flexi_accounts and flexi_logs tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS flexi_accounts (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            client_name       TEXT NOT NULL,
            plan              TEXT NOT NULL CHECK(plan IN ('DMD Flexi Grind','Monthly Focus')),
            start_date        TEXT NOT NULL,
            expiry_date       TEXT NOT NULL,
            total_hours_limit REAL,
            remaining_hours   REAL,
            amount_paid       INTEGER NOT NULL DEFAULT 0,
            status            TEXT NOT NULL DEFAULT 'Inactive' CHECK(status IN ('Inactive','Checked In')),
            last_check_in     TEXT,
            notes             TEXT NOT NULL DEFAULT '',
            created_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS flexi_logs (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id     INTEGER NOT NULL REFERENCES flexi_accounts(id) ON DELETE CASCADE,
            check_in       TEXT NOT NULL,
            check_out      TEXT NOT NULL,
            duration_hours REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_flexi_logs_account ON flexi_logs(account_id);
        "#,
    },
    Migration {
        version: "20250101_0005_create_pantry",
        description: "Created pantry_items and pantry_transactions tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS pantry_items (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            category      TEXT NOT NULL DEFAULT '',
            price         INTEGER NOT NULL DEFAULT 0,
            is_available  INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS pantry_transactions (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at     TEXT NOT NULL,
            items_summary  TEXT NOT NULL,
            total_quantity INTEGER NOT NULL DEFAULT 0,
            total_amount   INTEGER NOT NULL DEFAULT 0
        );
        "#,
    },
    Migration {
        version: "20250215_0006_create_sessions",
        description: "Created sessions table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            operator    TEXT NOT NULL,
            started_at  TEXT NOT NULL,
            expires_at  TEXT NOT NULL,
            ended_at    TEXT
        );
        "#,
    },
];

/// Ensure that the `log` table exists. Migrations are tracked inside it.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    conn.execute_batch(&format!("BEGIN;\n{}\nCOMMIT;", m.sql))
        .map_err(|e| {
            let _ = conn.execute_batch("ROLLBACK;");
            AppError::Migration(format!("{}: {}", m.version, e))
        })?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

/// Versions not yet recorded in the log table.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Called by `db::initialize::init_db()` and by `db --migrate`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Apply in declaration order
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}
