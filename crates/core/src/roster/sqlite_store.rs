//! SQLite-backed doctor roster.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::store::normalize_name;
use super::{Availability, CreateDoctorRequest, Doctor, DoctorId, DoctorStore, RosterError};

const SELECT_DOCTOR: &str = "SELECT id, name, is_on_leave FROM doctors";

/// SQLite-backed doctor store.
pub struct SqliteDoctorStore {
    conn: Mutex<Connection>,
}

impl SqliteDoctorStore {
    /// Open (or create) the roster in the given database file.
    pub fn new(path: &Path) -> Result<Self, RosterError> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory roster (useful for testing).
    pub fn in_memory() -> Result<Self, RosterError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), RosterError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS doctors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                is_on_leave INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_doctors_on_leave ON doctors(is_on_leave);
            "#,
        )
        .map_err(db_err)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RosterError> {
        self.conn
            .lock()
            .map_err(|_| RosterError::Database("connection lock poisoned".to_string()))
    }

    fn row_to_doctor(row: &rusqlite::Row) -> rusqlite::Result<Doctor> {
        let id: i64 = row.get(0)?;
        let name: String = row.get(1)?;
        let on_leave: bool = row.get(2)?;

        Ok(Doctor {
            id: DoctorId(id),
            name,
            availability: Availability::from_on_leave(on_leave),
        })
    }

    fn query_doctors(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Doctor>, RosterError> {
        let mut stmt = conn.prepare(sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params, Self::row_to_doctor)
            .map_err(db_err)?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }
}

fn db_err(e: rusqlite::Error) -> RosterError {
    RosterError::Database(e.to_string())
}

impl DoctorStore for SqliteDoctorStore {
    fn create(&self, request: CreateDoctorRequest) -> Result<Doctor, RosterError> {
        let name = normalize_name(&request.name)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO doctors (name, is_on_leave) VALUES (?, ?)",
            params![name, request.availability.is_on_leave()],
        )
        .map_err(db_err)?;

        let doctor = Doctor::new(
            DoctorId(conn.last_insert_rowid()),
            name,
            request.availability,
        );
        tracing::info!(doctor_id = %doctor.id, availability = %doctor.availability, "Doctor added");
        Ok(doctor)
    }

    fn seed(&self, doctors: &[Doctor]) -> Result<usize, RosterError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err)?;

        let mut inserted = 0;
        for doctor in doctors {
            let name = normalize_name(&doctor.name)?;
            inserted += tx
                .execute(
                    "INSERT OR IGNORE INTO doctors (id, name, is_on_leave) VALUES (?, ?, ?)",
                    params![doctor.id.0, name, doctor.availability.is_on_leave()],
                )
                .map_err(db_err)?;
        }

        tx.commit().map_err(db_err)?;
        Ok(inserted)
    }

    fn get(&self, id: DoctorId) -> Result<Option<Doctor>, RosterError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("{} WHERE id = ?", SELECT_DOCTOR),
            params![id.0],
            Self::row_to_doctor,
        )
        .optional()
        .map_err(db_err)
    }

    fn list(&self) -> Result<Vec<Doctor>, RosterError> {
        let conn = self.lock()?;
        Self::query_doctors(&conn, &format!("{} ORDER BY id ASC", SELECT_DOCTOR), &[])
    }

    fn available(&self) -> Result<Vec<Doctor>, RosterError> {
        let conn = self.lock()?;
        Self::query_doctors(
            &conn,
            &format!("{} WHERE is_on_leave = 0 ORDER BY id ASC", SELECT_DOCTOR),
            &[],
        )
    }

    fn count(&self, availability: Option<Availability>) -> Result<i64, RosterError> {
        let conn = self.lock()?;
        match availability {
            Some(a) => conn.query_row(
                "SELECT COUNT(*) FROM doctors WHERE is_on_leave = ?",
                params![a.is_on_leave()],
                |row| row.get(0),
            ),
            None => conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0)),
        }
        .map_err(db_err)
    }

    fn set_availability(
        &self,
        id: DoctorId,
        availability: Availability,
    ) -> Result<Doctor, RosterError> {
        let conn = self.lock()?;

        let changed = conn
            .execute(
                "UPDATE doctors SET is_on_leave = ? WHERE id = ?",
                params![availability.is_on_leave(), id.0],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(RosterError::NotFound(id));
        }

        let doctor = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_DOCTOR),
                params![id.0],
                Self::row_to_doctor,
            )
            .map_err(db_err)?;

        tracing::info!(doctor_id = %id, availability = %availability, "Doctor availability changed");
        Ok(doctor)
    }
}
