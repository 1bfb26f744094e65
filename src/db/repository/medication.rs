use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, store_now};
use crate::db::DatabaseError;
use crate::models::{CalendarDate, MedicationInput, MedicationRecord};

const COLLECTION: &str = "medications";

/// Insert a new medication document. The store assigns `_id` and
/// timestamps; nothing else is checked, so identical inputs produce
/// distinct documents.
pub fn create_medication(
    conn: &Connection,
    input: MedicationInput,
) -> Result<MedicationRecord, DatabaseError> {
    let now = store_now();
    let record = MedicationRecord {
        id: Uuid::new_v4(),
        fields: input,
        created_at: now,
        updated_at: now,
    };
    insert_medication(conn, &record)?;
    Ok(record)
}

pub fn insert_medication(conn: &Connection, med: &MedicationRecord) -> Result<(), DatabaseError> {
    let f = &med.fields;
    conn.execute(
        "INSERT INTO medications (id, pill_name, pill_description, dosage_days, dosage_times,
         dosage_amount, frequency, start_date, end_date, doctor_name, prescription_id,
         adherence_history, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            med.id.to_string(),
            f.pill_name,
            f.pill_description,
            serde_json::to_string(&f.dosage_days)?,
            serde_json::to_string(&f.dosage_times)?,
            f.dosage_amount,
            f.frequency,
            f.start_date.as_ref().map(CalendarDate::as_str),
            f.end_date.as_ref().map(CalendarDate::as_str),
            f.doctor_name,
            f.prescription_id,
            serde_json::to_string(&f.adherence_history)?,
            f.notes,
            format_timestamp(&med.created_at),
            format_timestamp(&med.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_medication(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<MedicationRecord>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, pill_name, pill_description, dosage_days, dosage_times, dosage_amount,
             frequency, start_date, end_date, doctor_name, prescription_id, adherence_history,
             notes, created_at, updated_at
             FROM medications WHERE id = ?1",
            params![id.to_string()],
            medication_row_from_rusqlite,
        )
        .optional()?;

    row.map(medication_from_row).transpose()
}

pub fn count_medications(conn: &Connection) -> Result<i64, DatabaseError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))?;
    Ok(count)
}

// ═══════════════════════════════════════════════════════════
// Row mapping
// ═══════════════════════════════════════════════════════════

struct MedicationRow {
    id: String,
    pill_name: Option<String>,
    pill_description: Option<String>,
    dosage_days: String,
    dosage_times: String,
    dosage_amount: Option<String>,
    frequency: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    doctor_name: Option<String>,
    prescription_id: Option<String>,
    adherence_history: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

fn medication_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<MedicationRow> {
    Ok(MedicationRow {
        id: row.get(0)?,
        pill_name: row.get(1)?,
        pill_description: row.get(2)?,
        dosage_days: row.get(3)?,
        dosage_times: row.get(4)?,
        dosage_amount: row.get(5)?,
        frequency: row.get(6)?,
        start_date: row.get(7)?,
        end_date: row.get(8)?,
        doctor_name: row.get(9)?,
        prescription_id: row.get(10)?,
        adherence_history: row.get(11)?,
        notes: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

fn medication_from_row(row: MedicationRow) -> Result<MedicationRecord, DatabaseError> {
    let id = Uuid::parse_str(&row.id).map_err(|e| invalid(format!("bad id {:?}: {e}", row.id)))?;

    Ok(MedicationRecord {
        id,
        fields: MedicationInput {
            pill_name: row.pill_name,
            pill_description: row.pill_description,
            dosage_days: serde_json::from_str(&row.dosage_days)?,
            dosage_times: serde_json::from_str(&row.dosage_times)?,
            dosage_amount: row.dosage_amount,
            frequency: row.frequency,
            start_date: parse_stored_date(row.start_date)?,
            end_date: parse_stored_date(row.end_date)?,
            doctor_name: row.doctor_name,
            prescription_id: row.prescription_id,
            adherence_history: serde_json::from_str(&row.adherence_history)?,
            notes: row.notes,
        },
        created_at: parse_timestamp(COLLECTION, &row.created_at)?,
        updated_at: parse_timestamp(COLLECTION, &row.updated_at)?,
    })
}

fn parse_stored_date(raw: Option<String>) -> Result<Option<CalendarDate>, DatabaseError> {
    raw.map(|s| CalendarDate::parse(s).map_err(invalid)).transpose()
}

fn invalid(reason: String) -> DatabaseError {
    DatabaseError::InvalidDocument {
        collection: COLLECTION.into(),
        reason,
    }
}
