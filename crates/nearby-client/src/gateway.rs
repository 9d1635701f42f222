use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use uuid::Uuid;

use nearby_types::api::{
    Ack, AnnouncementAction, CelebrityAction, CreateCelebrityAck, CreateDonationAck,
    CreatePaymentAck, CreateResponseAck, DonationAction, PaymentAction, PaymentStatus,
    ResponseAction, SendMessageAck,
};
use nearby_types::models::{
    Announcement, CelebrityRequest, CelebrityRequestPublic, CelebrityStatus, ChatMessage,
    Donation, DonationPublic, Response, Tier, VisitStats,
};

use crate::error::GatewayError;

/// Input for a new paid listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub category: String,
    pub author_name: String,
    pub author_contact: String,
    pub tier: Tier,
}

/// Typed access to the backend: one method per operation, no local cache.
/// Mutating callers re-fetch their working set afterwards; the backend
/// commits before responding.
pub struct Gateway {
    http: reqwest::Client,
    base: String,
    /// Anonymous key identifying this client in the visit statistics.
    visitor_key: String,
}

impl Gateway {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base,
            visitor_key: Uuid::new_v4().to_string(),
        }
    }

    // -- Announcements --

    /// The public browse feed: published listings, newest first. Apply
    /// [`crate::feed::rank`] for the tier-prioritized presentation order.
    pub async fn announcements(&self) -> Result<Vec<Announcement>, GatewayError> {
        self.get_json("announcements", &[]).await
    }

    /// All of one author's listings, in every lifecycle state.
    pub async fn announcements_by_author(
        &self,
        author: &str,
    ) -> Result<Vec<Announcement>, GatewayError> {
        self.get_json("announcements", &[("author", author.to_string())])
            .await
    }

    pub async fn announcements_by_tier(
        &self,
        tier: Tier,
    ) -> Result<Vec<Announcement>, GatewayError> {
        self.get_json("announcements", &[("type", tier.as_str().to_string())])
            .await
    }

    pub async fn announcements_admin(
        &self,
        admin_code: &str,
    ) -> Result<Vec<Announcement>, GatewayError> {
        self.get_json("announcements", &[("admin_code", admin_code.to_string())])
            .await
    }

    pub async fn close_announcement(&self, id: i64) -> Result<(), GatewayError> {
        let _: Ack = self
            .post_json("announcements", &AnnouncementAction::Close { id })
            .await?;
        Ok(())
    }

    pub async fn delete_announcement(
        &self,
        id: i64,
        admin_code: &str,
    ) -> Result<(), GatewayError> {
        let _: Ack = self
            .post_json(
                "announcements",
                &AnnouncementAction::Delete {
                    id,
                    admin_code: admin_code.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    /// Best-effort view tracking. Never fails the caller; a lost beacon is
    /// logged so systemic tracking failures stay visible to operators.
    pub async fn track_view(&self, id: i64) {
        let result: Result<Ack, _> = self
            .post_json("announcements", &AnnouncementAction::TrackView { id })
            .await;
        if let Err(e) = result {
            warn!("View tracking failed for announcement {}: {}", id, e);
        }
    }

    /// Best-effort site-visit tracking, same contract as [`track_view`].
    ///
    /// [`track_view`]: Gateway::track_view
    pub async fn track_visit(&self) {
        let result: Result<Ack, _> = self
            .post_json(
                "announcements",
                &AnnouncementAction::TrackVisit {
                    visitor_key: Some(self.visitor_key.clone()),
                },
            )
            .await;
        if let Err(e) = result {
            warn!("Visit tracking failed: {}", e);
        }
    }

    pub async fn stats(&self, admin_code: &str) -> Result<VisitStats, GatewayError> {
        self.post_json(
            "announcements",
            &AnnouncementAction::GetStats {
                admin_code: admin_code.to_string(),
            },
        )
        .await
    }

    // -- Payments --

    pub async fn create_payment(
        &self,
        listing: &NewListing,
    ) -> Result<CreatePaymentAck, GatewayError> {
        if listing.title.trim().is_empty() {
            return Err(GatewayError::Invalid("title is required"));
        }
        if listing.description.trim().is_empty() {
            return Err(GatewayError::Invalid("description is required"));
        }
        if listing.category.trim().is_empty() {
            return Err(GatewayError::Invalid("category is required"));
        }
        if listing.author_name.trim().is_empty() {
            return Err(GatewayError::Invalid("author name is required"));
        }

        self.post_json(
            "payments",
            &PaymentAction::CreatePayment {
                title: listing.title.clone(),
                description: listing.description.clone(),
                category: listing.category.clone(),
                author_name: listing.author_name.clone(),
                author_contact: listing.author_contact.clone(),
                tier: listing.tier,
            },
        )
        .await
    }

    pub async fn check_payment(
        &self,
        announcement_id: i64,
    ) -> Result<PaymentStatus, GatewayError> {
        self.post_json("payments", &PaymentAction::CheckPayment { announcement_id })
            .await
    }

    pub async fn confirm_payment(
        &self,
        announcement_id: i64,
        admin_code: &str,
    ) -> Result<(), GatewayError> {
        let _: Ack = self
            .post_json(
                "payments",
                &PaymentAction::ConfirmPayment {
                    announcement_id,
                    admin_code: admin_code.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    // -- Responses / chat --

    pub async fn responses(&self, announcement_id: i64) -> Result<Vec<Response>, GatewayError> {
        self.get_json(
            "responses",
            &[("announcement_id", announcement_id.to_string())],
        )
        .await
    }

    pub async fn create_response(
        &self,
        announcement_id: i64,
        responder_name: &str,
        responder_contact: &str,
        message: &str,
    ) -> Result<i64, GatewayError> {
        if responder_name.trim().is_empty() {
            return Err(GatewayError::Invalid("responder name is required"));
        }
        if responder_contact.trim().is_empty() {
            return Err(GatewayError::Invalid("responder contact is required"));
        }
        if message.trim().is_empty() {
            return Err(GatewayError::Invalid("message is required"));
        }

        let ack: CreateResponseAck = self
            .post_json(
                "responses",
                &ResponseAction::CreateResponse {
                    announcement_id,
                    responder_name: responder_name.to_string(),
                    responder_contact: responder_contact.to_string(),
                    message: message.to_string(),
                },
            )
            .await?;
        Ok(ack.response_id)
    }

    /// One thread's messages, oldest first.
    pub async fn messages(&self, response_id: i64) -> Result<Vec<ChatMessage>, GatewayError> {
        self.get_json("responses", &[("response_id", response_id.to_string())])
            .await
    }

    pub async fn send_message(
        &self,
        response_id: i64,
        sender_name: &str,
        message: &str,
    ) -> Result<i64, GatewayError> {
        if sender_name.trim().is_empty() {
            return Err(GatewayError::Invalid("sender name is required"));
        }
        if message.trim().is_empty() {
            return Err(GatewayError::Invalid("message is required"));
        }

        let ack: SendMessageAck = self
            .post_json(
                "responses",
                &ResponseAction::SendMessage {
                    response_id,
                    sender_name: sender_name.to_string(),
                    message: message.to_string(),
                },
            )
            .await?;
        Ok(ack.message_id)
    }

    // -- Donations --

    pub async fn donations(&self) -> Result<Vec<DonationPublic>, GatewayError> {
        self.get_json("donations", &[]).await
    }

    pub async fn donations_admin(&self, admin_code: &str) -> Result<Vec<Donation>, GatewayError> {
        self.get_json("donations", &[("admin_code", admin_code.to_string())])
            .await
    }

    pub async fn create_donation(
        &self,
        donor_name: &str,
        donor_contact: &str,
        amount: i64,
        message: &str,
    ) -> Result<CreateDonationAck, GatewayError> {
        if donor_name.trim().is_empty() {
            return Err(GatewayError::Invalid("donor name is required"));
        }
        if amount <= 0 {
            return Err(GatewayError::Invalid("amount must be positive"));
        }

        self.post_json(
            "donations",
            &DonationAction::CreateDonation {
                donor_name: donor_name.to_string(),
                donor_contact: donor_contact.to_string(),
                amount,
                message: message.to_string(),
            },
        )
        .await
    }

    pub async fn assign_donation(
        &self,
        donation_id: i64,
        assigned_to: &str,
        admin_notes: &str,
        admin_code: &str,
    ) -> Result<(), GatewayError> {
        let _: Ack = self
            .post_json(
                "donations",
                &DonationAction::AssignDonation {
                    donation_id,
                    assigned_to: assigned_to.to_string(),
                    admin_notes: admin_notes.to_string(),
                    admin_code: admin_code.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    // -- Celebrity requests --

    pub async fn celebrity_requests(
        &self,
    ) -> Result<Vec<CelebrityRequestPublic>, GatewayError> {
        self.get_json("celebrities", &[]).await
    }

    pub async fn celebrity_requests_admin(
        &self,
        admin_code: &str,
    ) -> Result<Vec<CelebrityRequest>, GatewayError> {
        self.get_json("celebrities", &[("admin_code", admin_code.to_string())])
            .await
    }

    pub async fn create_celebrity_request(
        &self,
        requester_name: &str,
        requester_contact: &str,
        celebrity_name: &str,
        request_text: &str,
    ) -> Result<CreateCelebrityAck, GatewayError> {
        if requester_name.trim().is_empty() {
            return Err(GatewayError::Invalid("requester name is required"));
        }
        if celebrity_name.trim().is_empty() {
            return Err(GatewayError::Invalid("celebrity name is required"));
        }
        if request_text.trim().is_empty() {
            return Err(GatewayError::Invalid("request text is required"));
        }

        self.post_json(
            "celebrities",
            &CelebrityAction::CreateRequest {
                requester_name: requester_name.to_string(),
                requester_contact: requester_contact.to_string(),
                celebrity_name: celebrity_name.to_string(),
                request_text: request_text.to_string(),
            },
        )
        .await
    }

    pub async fn update_celebrity_status(
        &self,
        request_id: i64,
        status: CelebrityStatus,
        admin_notes: &str,
        admin_code: &str,
    ) -> Result<(), GatewayError> {
        let _: Ack = self
            .post_json(
                "celebrities",
                &CelebrityAction::UpdateStatus {
                    request_id,
                    status,
                    admin_notes: admin_notes.to_string(),
                    admin_code: admin_code.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    // -- Plumbing --

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let resp = self.http.get(self.url(path)).query(query).send().await?;
        Ok(check(resp)?.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        Ok(check(resp)?.json().await?)
    }
}

fn check(resp: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else if status.is_client_error() {
        Err(GatewayError::Rejected(status))
    } else {
        Err(GatewayError::Server(status))
    }
}
