use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::{
    null_as_empty, optional_date, scalar_string, AdherenceEntry, CalendarDate, DosageDay,
    TimeOfDay,
};

/// Medication fields accepted from a client.
///
/// Nothing is required. Unknown keys are ignored, arrays default to
/// empty, and `""` dates count as absent. Text fields take numbers and
/// booleans as their JSON text. Values are kept as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInput {
    #[serde(
        default,
        deserialize_with = "scalar_string::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub pill_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_string::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub pill_description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty::deserialize")]
    pub dosage_days: Vec<DosageDay>,
    #[serde(default, deserialize_with = "null_as_empty::deserialize")]
    pub dosage_times: Vec<TimeOfDay>,
    #[serde(
        default,
        deserialize_with = "scalar_string::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub dosage_amount: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_string::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub frequency: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_date::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<CalendarDate>,
    #[serde(
        default,
        deserialize_with = "optional_date::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<CalendarDate>,
    #[serde(
        default,
        deserialize_with = "scalar_string::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub doctor_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_string::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub prescription_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty::deserialize")]
    pub adherence_history: Vec<AdherenceEntry>,
    #[serde(
        default,
        deserialize_with = "scalar_string::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

/// A persisted medication document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: MedicationInput,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
