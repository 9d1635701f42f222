use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pricing/visibility class of an announcement. Fixed at creation —
/// no API path mutates it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Regular,
    Boosted,
    Vip,
}

impl Tier {
    /// Listing price in whole currency units.
    pub fn price(self) -> i64 {
        match self {
            Tier::Regular => 10,
            Tier::Boosted => 20,
            Tier::Vip => 100,
        }
    }

    /// Feed ranking weight — lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Tier::Vip => 0,
            Tier::Boosted => 1,
            Tier::Regular => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Regular => "regular",
            Tier::Boosted => "boosted",
            Tier::Vip => "vip",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Tier::Regular),
            "boosted" => Some(Tier::Boosted),
            "vip" => Some(Tier::Vip),
            _ => None,
        }
    }
}

/// Announcement lifecycle states. Transitions allowed through the API:
/// pending_payment -> published (admin confirmation) and
/// published -> closed (owner/admin). Deletion removes the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementStatus {
    PendingPayment,
    Published,
    Closed,
}

impl AnnouncementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnouncementStatus::PendingPayment => "pending_payment",
            AnnouncementStatus::Published => "published",
            AnnouncementStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CelebrityStatus {
    Pending,
    Approved,
    Sent,
    Rejected,
}

impl CelebrityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CelebrityStatus::Pending => "pending",
            CelebrityStatus::Approved => "approved",
            CelebrityStatus::Sent => "sent",
            CelebrityStatus::Rejected => "rejected",
        }
    }
}

/// A help-request listing.
///
/// `author_contact` and `expires_at` are only present in admin listings;
/// the public feed omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_contact: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub tier: Tier,
    pub status: String,
    pub views: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A reply to an announcement from a prospective helper.
/// `message_count` is the size of its chat thread at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: i64,
    pub announcement_id: i64,
    pub responder_name: String,
    pub responder_contact: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub message_count: i64,
}

/// One entry in a response's 1:1 chat thread. Ordered by `created_at`
/// ascending; `sender` is either participant's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Full donation record — admin listings only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub donor_name: String,
    pub donor_contact: String,
    pub amount: i64,
    pub message: String,
    pub payment_status: String,
    pub assigned_to: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public donation feed entry — no contact or assignment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationPublic {
    pub id: i64,
    pub donor_name: String,
    pub amount: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Full celebrity-outreach record — admin listings only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelebrityRequest {
    pub id: i64,
    pub requester_name: String,
    pub requester_contact: String,
    pub celebrity_name: String,
    pub request_text: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelebrityRequestPublic {
    pub id: i64,
    pub requester_name: String,
    pub celebrity_name: String,
    pub request_text: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters maintained server-side, exposed read-only to the
/// admin panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VisitStats {
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub today_visits: i64,
    pub total_announcement_views: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_pricing_is_fixed() {
        assert_eq!(Tier::Regular.price(), 10);
        assert_eq!(Tier::Boosted.price(), 20);
        assert_eq!(Tier::Vip.price(), 100);
    }

    #[test]
    fn tier_wire_names_round_trip() {
        for tier in [Tier::Regular, Tier::Boosted, Tier::Vip] {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.as_str()));
            let back: Tier = serde_json::from_str(&json).unwrap();
            assert_eq!(back, tier);
        }
    }

    #[test]
    fn vip_ranks_ahead_of_boosted_and_regular() {
        assert!(Tier::Vip.rank() < Tier::Boosted.rank());
        assert!(Tier::Boosted.rank() < Tier::Regular.rank());
    }

    #[test]
    fn unknown_celebrity_status_is_rejected() {
        assert!(serde_json::from_str::<CelebrityStatus>("\"archived\"").is_err());
    }
}
