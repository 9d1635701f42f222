//! Wire contract for the five resource endpoints.
//!
//! Reads are GET with query parameters; every mutation is a POST whose JSON
//! body carries an `action` discriminator. The enums below deserialize that
//! shape directly, so an unknown action is rejected at the boundary.

use serde::{Deserialize, Serialize};

use crate::models::{CelebrityStatus, Tier};

// -- Announcements --

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AnnouncementAction {
    Close {
        id: i64,
    },
    Delete {
        id: i64,
        admin_code: String,
    },
    TrackView {
        id: i64,
    },
    TrackVisit {
        #[serde(default)]
        visitor_key: Option<String>,
    },
    GetStats {
        admin_code: String,
    },
}

// -- Payments --

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PaymentAction {
    CreatePayment {
        title: String,
        description: String,
        category: String,
        author_name: String,
        author_contact: String,
        #[serde(rename = "type")]
        tier: Tier,
    },
    CheckPayment {
        announcement_id: i64,
    },
    ConfirmPayment {
        announcement_id: i64,
        admin_code: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePaymentAck {
    pub success: bool,
    pub announcement_id: i64,
    pub amount: i64,
    pub payment_card: String,
    pub payment_status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub payment_status: String,
    pub amount: i64,
}

// -- Responses / chat --

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ResponseAction {
    CreateResponse {
        announcement_id: i64,
        responder_name: String,
        responder_contact: String,
        message: String,
    },
    SendMessage {
        response_id: i64,
        sender_name: String,
        message: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponseAck {
    pub success: bool,
    pub response_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageAck {
    pub success: bool,
    pub message_id: i64,
}

// -- Donations --

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DonationAction {
    CreateDonation {
        donor_name: String,
        #[serde(default)]
        donor_contact: String,
        amount: i64,
        #[serde(default)]
        message: String,
    },
    AssignDonation {
        donation_id: i64,
        assigned_to: String,
        #[serde(default)]
        admin_notes: String,
        admin_code: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDonationAck {
    pub success: bool,
    pub donation_id: i64,
    pub payment_card: String,
    pub payment_url: String,
}

// -- Celebrity requests --

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CelebrityAction {
    CreateRequest {
        requester_name: String,
        #[serde(default)]
        requester_contact: String,
        celebrity_name: String,
        request_text: String,
    },
    UpdateStatus {
        request_id: i64,
        status: CelebrityStatus,
        #[serde(default)]
        admin_notes: String,
        admin_code: String,
    },
}

/// Flat fee for relaying a message to a public figure.
pub const CELEBRITY_REQUEST_FEE: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCelebrityAck {
    pub success: bool,
    pub request_id: i64,
    pub amount: i64,
    pub payment_card: String,
}

// -- Shared --

#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}
