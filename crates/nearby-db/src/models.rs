/// Database row types — these map directly to SQLite rows.
/// Distinct from nearby-types wire models to keep the DB layer independent;
/// timestamps stay as the TEXT SQLite stores.

pub struct AnnouncementRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author_name: String,
    pub author_contact: String,
    pub tier: String,
    pub status: String,
    pub payment_amount: i64,
    pub views: i64,
    pub expires_at: Option<String>,
    pub created_at: String,
}

pub struct ResponseRow {
    pub id: i64,
    pub announcement_id: i64,
    pub responder_name: String,
    pub responder_contact: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
    /// Count of messages in this response's thread, computed at read time.
    pub message_count: i64,
}

pub struct MessageRow {
    pub id: i64,
    pub response_id: i64,
    pub sender_name: String,
    pub message: String,
    pub created_at: String,
}

pub struct DonationRow {
    pub id: i64,
    pub donor_name: String,
    pub donor_contact: String,
    pub amount: i64,
    pub message: String,
    pub payment_status: String,
    pub assigned_to: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: String,
}

pub struct CelebrityRequestRow {
    pub id: i64,
    pub requester_name: String,
    pub requester_contact: String,
    pub celebrity_name: String,
    pub request_text: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: String,
}

pub struct VisitStatsRow {
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub today_visits: i64,
    pub total_announcement_views: i64,
}
