//! SQLite-backed patient store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    AdmitPatientRequest, CareStatus, IntakeError, Patient, PatientFilter, PatientId, PatientStore,
};
use crate::engine::AssignmentMap;
use crate::metrics::PATIENTS_ADMITTED;
use crate::roster::DoctorId;

const SELECT_PATIENT: &str =
    "SELECT id, name, severity, emergency, status, doctor_id, admitted_at, assigned_at FROM patients";

/// SQLite-backed patient store.
pub struct SqlitePatientStore {
    conn: Mutex<Connection>,
}

impl SqlitePatientStore {
    /// Create a new SQLite patient store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, IntakeError> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite patient store (useful for testing).
    pub fn in_memory() -> Result<Self, IntakeError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), IntakeError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                severity INTEGER NOT NULL,
                emergency INTEGER NOT NULL,
                doctor_id INTEGER,
                status TEXT NOT NULL DEFAULT 'pending',
                admitted_at TEXT NOT NULL,
                assigned_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_patients_status ON patients(status);
            CREATE INDEX IF NOT EXISTS idx_patients_urgency
                ON patients(emergency DESC, severity DESC, id ASC);
            "#,
        )
        .map_err(db_err)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, IntakeError> {
        self.conn
            .lock()
            .map_err(|_| IntakeError::Database("connection lock poisoned".to_string()))
    }

    fn build_where_clause(filter: &PatientFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        let where_clause = match filter.status {
            Some(status) => {
                params.push(Box::new(status.as_str()));
                "WHERE status = ?".to_string()
            }
            None => String::new(),
        };

        (where_clause, params)
    }

    fn row_to_patient(row: &rusqlite::Row) -> rusqlite::Result<Patient> {
        let id: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let severity: i32 = row.get(2)?;
        let emergency: bool = row.get(3)?;
        let status: String = row.get(4)?;
        let doctor_id: Option<i64> = row.get(5)?;
        let admitted_at_str: String = row.get(6)?;
        let assigned_at_str: Option<String> = row.get(7)?;

        let admitted_at = parse_timestamp(&admitted_at_str);

        let status = match (status.as_str(), doctor_id) {
            ("pending", _) => CareStatus::Pending,
            ("assigned", Some(doctor_id)) => CareStatus::Assigned {
                doctor_id: DoctorId(doctor_id),
                assigned_at: assigned_at_str
                    .as_deref()
                    .map(parse_timestamp)
                    .unwrap_or(admitted_at),
            },
            (other, doctor_id) => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(IntakeError::Database(format!(
                        "patient {} has status '{}' with doctor {:?}",
                        id, other, doctor_id
                    ))),
                ))
            }
        };

        Ok(Patient {
            id: PatientId(id),
            name,
            severity,
            emergency,
            status,
            admitted_at,
        })
    }

    fn fetch(conn: &Connection, id: PatientId) -> Result<Option<Patient>, IntakeError> {
        conn.query_row(
            &format!("{} WHERE id = ?", SELECT_PATIENT),
            params![id.0],
            Self::row_to_patient,
        )
        .optional()
        .map_err(db_err)
    }
}

fn db_err(e: rusqlite::Error) -> IntakeError {
    IntakeError::Database(e.to_string())
}

// Timestamps are written by this store, so a parse failure means a hand-edited row
fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl PatientStore for SqlitePatientStore {
    fn admit(&self, request: AdmitPatientRequest) -> Result<Patient, IntakeError> {
        let name = request.validated_name()?;
        let conn = self.lock()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO patients (name, severity, emergency, status, admitted_at) VALUES (?, ?, ?, 'pending', ?)",
            params![name, request.severity, request.emergency, now.to_rfc3339()],
        )
        .map_err(db_err)?;

        let patient = Patient {
            id: PatientId(conn.last_insert_rowid()),
            name,
            severity: request.severity,
            emergency: request.emergency,
            status: CareStatus::Pending,
            admitted_at: now,
        };

        PATIENTS_ADMITTED.inc();
        tracing::info!(
            patient_id = %patient.id,
            severity = patient.severity,
            emergency = patient.emergency,
            "Patient admitted"
        );
        Ok(patient)
    }

    fn get(&self, id: PatientId) -> Result<Option<Patient>, IntakeError> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)
    }

    fn list(&self, filter: &PatientFilter) -> Result<Vec<Patient>, IntakeError> {
        let conn = self.lock()?;

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "{} {} ORDER BY emergency DESC, severity DESC, id ASC LIMIT ? OFFSET ?",
            SELECT_PATIENT, where_clause
        );

        let mut stmt = conn.prepare(&sql).map_err(db_err)?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_patient)
            .map_err(db_err)?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    fn count(&self, filter: &PatientFilter) -> Result<i64, IntakeError> {
        let conn = self.lock()?;

        let (where_clause, params) = Self::build_where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM patients {}", where_clause);
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(db_err)
    }

    fn pending(&self) -> Result<Vec<Patient>, IntakeError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&format!(
                "{} WHERE status = 'pending' ORDER BY id ASC",
                SELECT_PATIENT
            ))
            .map_err(db_err)?;

        let rows = stmt.query_map([], Self::row_to_patient).map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    fn apply_assignments(&self, assignments: &AssignmentMap) -> Result<Vec<Patient>, IntakeError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err)?;
        let now = Utc::now().to_rfc3339();

        for assignment in assignments {
            let changed = tx
                .execute(
                    "UPDATE patients SET status = 'assigned', doctor_id = ?, assigned_at = ? WHERE id = ? AND status = 'pending'",
                    params![assignment.doctor_id.0, now, assignment.patient_id.0],
                )
                .map_err(db_err)?;

            if changed == 0 {
                // Dropping the transaction rolls back the earlier updates
                return Err(match Self::fetch(&tx, assignment.patient_id)? {
                    None => IntakeError::NotFound(assignment.patient_id),
                    Some(current) => IntakeError::InvalidState {
                        patient_id: current.id,
                        current_status: current.status.status_type().to_string(),
                        operation: "assign".to_string(),
                    },
                });
            }
        }

        let mut updated = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let patient = Self::fetch(&tx, assignment.patient_id)?
                .ok_or(IntakeError::NotFound(assignment.patient_id))?;
            updated.push(patient);
        }

        tx.commit().map_err(db_err)?;
        Ok(updated)
    }
}
