//! Per-form medication draft.
//!
//! Each form owns one `DraftSession`; nothing is shared between forms.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiClient, ClientError};
use crate::models::{DosageDay, MedicationRecord, TimeOfDay};

/// The medication being entered, in the shape the server accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDraft {
    pub pill_name: String,
    pub pill_description: String,
    pub dosage_days: Vec<DosageDay>,
    pub dosage_times: Vec<TimeOfDay>,
    pub dosage_amount: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Default for MedicationDraft {
    /// Empty form starting today (local date).
    fn default() -> Self {
        Self {
            pill_name: String::new(),
            pill_description: String::new(),
            dosage_days: Vec::new(),
            dosage_times: Vec::new(),
            dosage_amount: String::new(),
            frequency: String::new(),
            start_date: Local::now().date_naive(),
            end_date: None,
        }
    }
}

pub struct DraftSession {
    id: Uuid,
    draft: MedicationDraft,
}

impl Default for DraftSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftSession {
    pub fn new() -> Self {
        Self::with_draft(MedicationDraft::default())
    }

    pub fn with_draft(draft: MedicationDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            draft,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn draft(&self) -> &MedicationDraft {
        &self.draft
    }

    /// Replace the whole draft.
    pub fn set_draft(&mut self, draft: MedicationDraft) {
        self.draft = draft;
    }

    /// Edit the draft in place.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut MedicationDraft),
    {
        f(&mut self.draft);
    }

    /// Send the current draft. The draft is left as it was either way,
    /// and repeated calls create repeated documents.
    pub async fn submit(&self, client: &ApiClient) -> Result<MedicationRecord, ClientError> {
        tracing::debug!(session = %self.id, base_url = client.base_url(), "Submitting medication draft");

        match client.add_medication(&self.draft).await {
            Ok(record) => {
                tracing::info!(session = %self.id, id = %record.id, "Medication added");
                Ok(record)
            }
            Err(e) => {
                tracing::error!(session = %self.id, "Error adding medication: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::Arc;

    use chrono::Weekday;

    use super::*;
    use crate::api::{start_server_on, ApiContext, ServerHandle};
    use crate::config::DEFAULT_ALLOWED_ORIGIN;
    use crate::db::{count_medications, DocumentStore};
    use crate::models::CalendarDate;

    async fn test_server() -> (ServerHandle, ApiContext) {
        let store = DocumentStore::open_in_memory().unwrap();
        let ctx = ApiContext::with_iterations(Arc::new(store), 1_000);
        let server = start_server_on(
            ctx.clone(),
            DEFAULT_ALLOWED_ORIGIN,
            SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        )
        .await
        .unwrap();
        (server, ctx)
    }

    fn filled_draft() -> MedicationDraft {
        MedicationDraft {
            pill_name: "Amoxicillin".into(),
            pill_description: "500mg capsule".into(),
            dosage_days: vec![Weekday::Mon.into(), Weekday::Thu.into()],
            dosage_times: vec![TimeOfDay::parse("07:30")],
            dosage_amount: "2".into(),
            frequency: "daily".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 10),
        }
    }

    #[test]
    fn default_draft_is_empty_and_starts_today() {
        let session = DraftSession::new();
        let draft = session.draft();
        assert!(draft.pill_name.is_empty());
        assert!(draft.dosage_days.is_empty());
        assert!(draft.dosage_times.is_empty());
        assert_eq!(draft.start_date, Local::now().date_naive());
        assert!(draft.end_date.is_none());
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = DraftSession::new();
        let b = DraftSession::new();
        a.update(|d| d.pill_name = "Ibuprofen".into());

        assert_ne!(a.id(), b.id());
        assert_eq!(a.draft().pill_name, "Ibuprofen");
        assert!(b.draft().pill_name.is_empty());
    }

    #[test]
    fn set_draft_replaces_everything() {
        let mut session = DraftSession::new();
        session.update(|d| d.frequency = "weekly".into());
        session.set_draft(filled_draft());
        assert_eq!(session.draft(), &filled_draft());
    }

    #[test]
    fn serializes_in_request_shape() {
        let json = serde_json::to_value(filled_draft()).unwrap();
        assert_eq!(json["pillName"], "Amoxicillin");
        assert_eq!(json["dosageDays"], serde_json::json!(["Monday", "Thursday"]));
        assert_eq!(json["dosageTimes"], serde_json::json!(["07:30"]));
        assert_eq!(json["startDate"], "2025-04-01");
        assert_eq!(json["endDate"], "2025-04-10");

        let open_ended = serde_json::to_value(MedicationDraft::default()).unwrap();
        assert!(open_ended.get("endDate").is_none());
    }

    #[tokio::test]
    async fn submit_returns_record_and_keeps_draft() {
        let (server, ctx) = test_server().await;
        let client = ApiClient::new(&server.base_url(), 5).unwrap();
        let session = DraftSession::with_draft(filled_draft());

        let record = session.submit(&client).await.unwrap();

        assert_eq!(record.fields.pill_name.as_deref(), Some("Amoxicillin"));
        assert_eq!(record.fields.dosage_amount.as_deref(), Some("2"));
        assert_eq!(
            record.fields.start_date.as_ref().map(CalendarDate::date),
            NaiveDate::from_ymd_opt(2025, 4, 1)
        );
        assert_eq!(record.fields.dosage_days[0].label(), "Monday");
        assert_eq!(record.fields.dosage_times[0].label(), "07:30");
        assert_eq!(session.draft(), &filled_draft());
        assert_eq!(ctx.store.with_conn(count_medications).unwrap(), 1);
    }

    #[tokio::test]
    async fn repeated_submit_creates_duplicates() {
        let (server, ctx) = test_server().await;
        let client = ApiClient::new(&server.base_url(), 5).unwrap();
        let session = DraftSession::with_draft(filled_draft());

        let a = session.submit(&client).await.unwrap();
        let b = session.submit(&client).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(ctx.store.with_conn(count_medications).unwrap(), 2);
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_rejected() {
        let (server, ctx) = test_server().await;
        ctx.store
            .with_conn(|conn| conn.execute_batch("DROP TABLE medications").map_err(Into::into))
            .unwrap();
        let client = ApiClient::new(&server.base_url(), 5).unwrap();

        let err = DraftSession::with_draft(filled_draft())
            .submit(&client)
            .await
            .unwrap_err();
        match err {
            ClientError::Rejected {
                status,
                message,
                error,
            } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Server error while saving medication");
                assert!(!error.is_empty());
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = ApiClient::new(&format!("http://127.0.0.1:{port}"), 2).unwrap();
        let session = DraftSession::new();

        let err = session.submit(&client).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert!(session.draft().pill_name.is_empty());
    }
}
