//! Row-to-wire conversions shared by the resource handlers.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use nearby_db::models::{
    AnnouncementRow, CelebrityRequestRow, DonationRow, MessageRow, ResponseRow,
};
use nearby_types::models::{
    Announcement, CelebrityRequest, CelebrityRequestPublic, ChatMessage, Donation, DonationPublic,
    Response, Tier,
};

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Try RFC 3339 first, then parse as naive UTC and convert.
pub(crate) fn parse_db_datetime(raw: &str, what: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on {} {}: {}", raw, what, id, e);
            DateTime::default()
        })
}

/// `unlocked` is true for admin listings: it surfaces the author's contact
/// and the VIP expiry; the public feed carries neither.
pub(crate) fn announcement(row: AnnouncementRow, unlocked: bool) -> Announcement {
    let tier = Tier::parse(&row.tier).unwrap_or_else(|| {
        warn!("Corrupt tier '{}' on announcement {}", row.tier, row.id);
        Tier::Regular
    });

    Announcement {
        id: row.id,
        title: row.title,
        description: row.description,
        category: row.category,
        author: row.author_name,
        author_contact: unlocked.then_some(row.author_contact),
        date: parse_db_datetime(&row.created_at, "announcement", row.id),
        tier,
        status: row.status,
        views: row.views,
        expires_at: if unlocked {
            row.expires_at
                .map(|raw| parse_db_datetime(&raw, "announcement expiry", row.id))
        } else {
            None
        },
    }
}

pub(crate) fn response(row: ResponseRow) -> Response {
    Response {
        id: row.id,
        announcement_id: row.announcement_id,
        responder_name: row.responder_name,
        responder_contact: row.responder_contact,
        message: row.message,
        created_at: parse_db_datetime(&row.created_at, "response", row.id),
        status: row.status,
        message_count: row.message_count,
    }
}

pub(crate) fn message(row: MessageRow) -> ChatMessage {
    ChatMessage {
        id: row.id,
        sender: row.sender_name,
        message: row.message,
        created_at: parse_db_datetime(&row.created_at, "message", row.id),
    }
}

pub(crate) fn donation(row: DonationRow) -> Donation {
    Donation {
        id: row.id,
        donor_name: row.donor_name,
        donor_contact: row.donor_contact,
        amount: row.amount,
        message: row.message,
        payment_status: row.payment_status,
        assigned_to: row.assigned_to,
        admin_notes: row.admin_notes,
        created_at: parse_db_datetime(&row.created_at, "donation", row.id),
    }
}

pub(crate) fn donation_public(row: DonationRow) -> DonationPublic {
    DonationPublic {
        id: row.id,
        donor_name: row.donor_name,
        amount: row.amount,
        message: row.message,
        created_at: parse_db_datetime(&row.created_at, "donation", row.id),
    }
}

pub(crate) fn celebrity_request(row: CelebrityRequestRow) -> CelebrityRequest {
    CelebrityRequest {
        id: row.id,
        requester_name: row.requester_name,
        requester_contact: row.requester_contact,
        celebrity_name: row.celebrity_name,
        request_text: row.request_text,
        status: row.status,
        admin_notes: row.admin_notes,
        created_at: parse_db_datetime(&row.created_at, "celebrity request", row.id),
    }
}

pub(crate) fn celebrity_request_public(row: CelebrityRequestRow) -> CelebrityRequestPublic {
    CelebrityRequestPublic {
        id: row.id,
        requester_name: row.requester_name,
        celebrity_name: row.celebrity_name,
        request_text: row.request_text,
        status: row.status,
        created_at: parse_db_datetime(&row.created_at, "celebrity request", row.id),
    }
}
