use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE announcements (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL,
                category        TEXT NOT NULL,
                author_name     TEXT NOT NULL,
                author_contact  TEXT NOT NULL,
                tier            TEXT NOT NULL,
                status          TEXT NOT NULL DEFAULT 'pending_payment',
                payment_amount  INTEGER NOT NULL,
                views           INTEGER NOT NULL DEFAULT 0,
                expires_at      TEXT,
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_announcements_status
                ON announcements(status, created_at);

            CREATE TABLE responses (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                announcement_id   INTEGER NOT NULL
                    REFERENCES announcements(id) ON DELETE CASCADE,
                responder_name    TEXT NOT NULL,
                responder_contact TEXT NOT NULL,
                message           TEXT NOT NULL,
                status            TEXT NOT NULL DEFAULT 'new',
                created_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_responses_announcement
                ON responses(announcement_id, created_at);

            CREATE TABLE messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                response_id INTEGER NOT NULL
                    REFERENCES responses(id) ON DELETE CASCADE,
                sender_name TEXT NOT NULL,
                message     TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_messages_response
                ON messages(response_id, created_at);

            CREATE TABLE donations (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                donor_name     TEXT NOT NULL,
                donor_contact  TEXT NOT NULL DEFAULT '',
                amount         INTEGER NOT NULL,
                message        TEXT NOT NULL DEFAULT '',
                payment_status TEXT NOT NULL DEFAULT 'paid',
                assigned_to    TEXT,
                admin_notes    TEXT,
                created_at     TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE celebrity_requests (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                requester_name    TEXT NOT NULL,
                requester_contact TEXT NOT NULL DEFAULT '',
                celebrity_name    TEXT NOT NULL,
                request_text      TEXT NOT NULL,
                status            TEXT NOT NULL DEFAULT 'pending',
                admin_notes       TEXT,
                created_at        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE visits (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                visitor_key TEXT NOT NULL,
                visited_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_visits_day ON visits(visited_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
