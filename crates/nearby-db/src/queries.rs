use crate::Database;
use crate::models::{
    AnnouncementRow, CelebrityRequestRow, DonationRow, MessageRow, ResponseRow, VisitStatsRow,
};
use anyhow::Result;
use rusqlite::Connection;

/// Feed filter. The public feed sees published listings only; an author
/// filter bypasses the status gate for that author's own records, and the
/// admin view bypasses it globally.
#[derive(Debug, Default)]
pub struct AnnouncementFilter {
    pub author: Option<String>,
    pub tier: Option<String>,
    pub include_unpublished: bool,
}

impl Database {
    // -- Announcements --

    #[allow(clippy::too_many_arguments)]
    pub fn create_announcement(
        &self,
        title: &str,
        description: &str,
        category: &str,
        author_name: &str,
        author_contact: &str,
        tier: &str,
        payment_amount: i64,
        expires_days: Option<i64>,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO announcements
                     (title, description, category, author_name, author_contact,
                      tier, payment_amount, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7,
                     CASE WHEN ?8 IS NULL THEN NULL
                          ELSE datetime('now', '+' || ?8 || ' days') END)",
                rusqlite::params![
                    title,
                    description,
                    category,
                    author_name,
                    author_contact,
                    tier,
                    payment_amount,
                    expires_days,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_announcements(&self, filter: &AnnouncementFilter) -> Result<Vec<AnnouncementRow>> {
        self.with_conn(|conn| query_announcements(conn, filter))
    }

    pub fn get_announcement(&self, id: i64) -> Result<Option<AnnouncementRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ANNOUNCEMENT_COLS} FROM announcements WHERE id = ?1"
            ))?;
            let row = stmt.query_row([id], map_announcement).optional()?;
            Ok(row)
        })
    }

    /// published -> closed. Returns 0 if the listing is missing or not
    /// currently published.
    pub fn close_announcement(&self, id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE announcements SET status = 'closed'
                 WHERE id = ?1 AND status = 'published'",
                [id],
            )?;
            Ok(n)
        })
    }

    /// pending_payment -> published. Returns 0 if the listing is missing or
    /// not awaiting payment.
    pub fn confirm_payment(&self, id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE announcements SET status = 'published'
                 WHERE id = ?1 AND status = 'pending_payment'",
                [id],
            )?;
            Ok(n)
        })
    }

    /// Removes the listing; responses and their messages go with it
    /// (ON DELETE CASCADE).
    pub fn delete_announcement(&self, id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM announcements WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    pub fn increment_views(&self, id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE announcements SET views = views + 1 WHERE id = ?1",
                [id],
            )?;
            Ok(n)
        })
    }

    // -- Visits / stats --

    pub fn record_visit(&self, visitor_key: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("INSERT INTO visits (visitor_key) VALUES (?1)", [visitor_key])?;
            Ok(())
        })
    }

    pub fn visit_stats(&self) -> Result<VisitStatsRow> {
        self.with_conn(|conn| {
            let total_visits: i64 =
                conn.query_row("SELECT COUNT(*) FROM visits", [], |r| r.get(0))?;
            let unique_visitors: i64 = conn.query_row(
                "SELECT COUNT(DISTINCT visitor_key) FROM visits",
                [],
                |r| r.get(0),
            )?;
            let today_visits: i64 = conn.query_row(
                "SELECT COUNT(*) FROM visits WHERE date(visited_at) = date('now')",
                [],
                |r| r.get(0),
            )?;
            let total_announcement_views: i64 = conn.query_row(
                "SELECT COALESCE(SUM(views), 0) FROM announcements",
                [],
                |r| r.get(0),
            )?;
            Ok(VisitStatsRow {
                total_visits,
                unique_visitors,
                today_visits,
                total_announcement_views,
            })
        })
    }

    // -- Responses --

    pub fn announcement_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM announcements WHERE id = ?1)",
                [id],
                |r| r.get(0),
            )?;
            Ok(exists)
        })
    }

    pub fn create_response(
        &self,
        announcement_id: i64,
        responder_name: &str,
        responder_contact: &str,
        message: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO responses
                     (announcement_id, responder_name, responder_contact, message)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![announcement_id, responder_name, responder_contact, message],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_responses(&self, announcement_id: i64) -> Result<Vec<ResponseRow>> {
        self.with_conn(|conn| query_responses(conn, announcement_id))
    }

    pub fn response_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM responses WHERE id = ?1)",
                [id],
                |r| r.get(0),
            )?;
            Ok(exists)
        })
    }

    // -- Messages --

    pub fn create_message(&self, response_id: i64, sender_name: &str, message: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO messages (response_id, sender_name, message) VALUES (?1, ?2, ?3)",
                rusqlite::params![response_id, sender_name, message],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_messages(&self, response_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, response_id))
    }

    // -- Donations --

    pub fn create_donation(
        &self,
        donor_name: &str,
        donor_contact: &str,
        amount: i64,
        message: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO donations (donor_name, donor_contact, amount, message)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![donor_name, donor_contact, amount, message],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_donations_admin(&self) -> Result<Vec<DonationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DONATION_COLS} FROM donations ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt
                .query_map([], map_donation)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_donations_public(&self, limit: u32) -> Result<Vec<DonationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DONATION_COLS} FROM donations
                 WHERE payment_status = 'paid'
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1"
            ))?;
            let rows = stmt
                .query_map([limit], map_donation)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn assign_donation(&self, id: i64, assigned_to: &str, admin_notes: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE donations SET assigned_to = ?1, admin_notes = ?2 WHERE id = ?3",
                rusqlite::params![assigned_to, admin_notes, id],
            )?;
            Ok(n)
        })
    }

    // -- Celebrity requests --

    pub fn create_celebrity_request(
        &self,
        requester_name: &str,
        requester_contact: &str,
        celebrity_name: &str,
        request_text: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO celebrity_requests
                     (requester_name, requester_contact, celebrity_name, request_text)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![requester_name, requester_contact, celebrity_name, request_text],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_celebrity_requests_admin(&self) -> Result<Vec<CelebrityRequestRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CELEBRITY_COLS} FROM celebrity_requests
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt
                .query_map([], map_celebrity_request)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_celebrity_requests_public(&self, limit: u32) -> Result<Vec<CelebrityRequestRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CELEBRITY_COLS} FROM celebrity_requests
                 WHERE status != 'rejected'
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1"
            ))?;
            let rows = stmt
                .query_map([limit], map_celebrity_request)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_celebrity_status(
        &self,
        id: i64,
        status: &str,
        admin_notes: &str,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE celebrity_requests SET status = ?1, admin_notes = ?2 WHERE id = ?3",
                rusqlite::params![status, admin_notes, id],
            )?;
            Ok(n)
        })
    }
}

const ANNOUNCEMENT_COLS: &str = "id, title, description, category, author_name, author_contact, \
     tier, status, payment_amount, views, expires_at, created_at";

const DONATION_COLS: &str = "id, donor_name, donor_contact, amount, message, payment_status, \
     assigned_to, admin_notes, created_at";

const CELEBRITY_COLS: &str = "id, requester_name, requester_contact, celebrity_name, \
     request_text, status, admin_notes, created_at";

fn map_announcement(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnnouncementRow> {
    Ok(AnnouncementRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        author_name: row.get(4)?,
        author_contact: row.get(5)?,
        tier: row.get(6)?,
        status: row.get(7)?,
        payment_amount: row.get(8)?,
        views: row.get(9)?,
        expires_at: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn map_donation(row: &rusqlite::Row<'_>) -> rusqlite::Result<DonationRow> {
    Ok(DonationRow {
        id: row.get(0)?,
        donor_name: row.get(1)?,
        donor_contact: row.get(2)?,
        amount: row.get(3)?,
        message: row.get(4)?,
        payment_status: row.get(5)?,
        assigned_to: row.get(6)?,
        admin_notes: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn map_celebrity_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<CelebrityRequestRow> {
    Ok(CelebrityRequestRow {
        id: row.get(0)?,
        requester_name: row.get(1)?,
        requester_contact: row.get(2)?,
        celebrity_name: row.get(3)?,
        request_text: row.get(4)?,
        status: row.get(5)?,
        admin_notes: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn query_announcements(
    conn: &Connection,
    filter: &AnnouncementFilter,
) -> Result<Vec<AnnouncementRow>> {
    let mut sql = format!("SELECT {ANNOUNCEMENT_COLS} FROM announcements");
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if !filter.include_unpublished && filter.author.is_none() {
        clauses.push("status = 'published'".to_string());
    }
    if let Some(author) = &filter.author {
        clauses.push(format!("author_name = ?{}", params.len() + 1));
        params.push(Box::new(author.clone()));
    }
    if let Some(tier) = &filter.tier {
        clauses.push(format!("tier = ?{}", params.len() + 1));
        params.push(Box::new(tier.clone()));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        params.iter().map(|p| p.as_ref()).collect();

    let rows = stmt
        .query_map(param_refs.as_slice(), map_announcement)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_responses(conn: &Connection, announcement_id: i64) -> Result<Vec<ResponseRow>> {
    // Subquery computes message_count in a single pass (no N+1)
    let mut stmt = conn.prepare(
        "SELECT r.id, r.announcement_id, r.responder_name, r.responder_contact,
                r.message, r.status, r.created_at,
                (SELECT COUNT(*) FROM messages WHERE response_id = r.id) AS message_count
         FROM responses r
         WHERE r.announcement_id = ?1
         ORDER BY r.created_at DESC, r.id DESC",
    )?;

    let rows = stmt
        .query_map([announcement_id], |row| {
            Ok(ResponseRow {
                id: row.get(0)?,
                announcement_id: row.get(1)?,
                responder_name: row.get(2)?,
                responder_contact: row.get(3)?,
                message: row.get(4)?,
                status: row.get(5)?,
                created_at: row.get(6)?,
                message_count: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_messages(conn: &Connection, response_id: i64) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, response_id, sender_name, message, created_at
         FROM messages
         WHERE response_id = ?1
         ORDER BY created_at ASC, id ASC",
    )?;

    let rows = stmt
        .query_map([response_id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                response_id: row.get(1)?,
                sender_name: row.get(2)?,
                message: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
