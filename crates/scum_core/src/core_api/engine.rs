use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::body_sim;
use crate::config::EditPlan;
use crate::store;

use super::error::{CoreError, CoreErrorCode};
use super::types::{AttributeChange, EditReport, LocalPrisoner, Prisoner, SkillEntry};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug)]
pub struct Session {
    conn: Connection,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Opens an existing save database. A missing file is an error rather
    /// than an empty new database.
    pub fn open_path(&self, path: &Path) -> Result<Session, CoreError> {
        if !path.is_file() {
            return Err(CoreError::new(
                CoreErrorCode::Io,
                format!("database {} does not exist", path.display()),
            ));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            CoreError::new(
                CoreErrorCode::Database,
                format!("failed to open {}: {e}", path.display()),
            )
        })?;
        tracing::debug!(path = %path.display(), "opened save database");

        Ok(Session::from_connection(conn))
    }
}

impl Session {
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn local_prisoners(&self) -> Result<Vec<LocalPrisoner>, CoreError> {
        store::local_prisoners(&self.conn)
    }

    pub fn load_prisoner(&self, id: i64) -> Result<Prisoner, CoreError> {
        store::load_prisoner(&self.conn, id)
    }

    pub fn skills(&self, prisoner_id: i64) -> Result<Vec<SkillEntry>, CoreError> {
        store::prisoner_skills(&self.conn, prisoner_id)
    }

    /// Applies `plan` to one prisoner inside a single transaction. Nothing is
    /// committed unless every attribute patch and skill update succeeds.
    pub fn apply(&mut self, prisoner_id: i64, plan: &EditPlan) -> Result<EditReport, CoreError> {
        let tx = self.conn.transaction()?;

        let mut prisoner = store::load_prisoner(&tx, prisoner_id)?;
        let original_len = prisoner.body_simulation.len();

        let mut attributes = Vec::with_capacity(plan.attributes.len());
        for target in &plan.attributes {
            let ty = target.property.descriptor();
            let patch = body_sim::patch_field(
                &mut prisoner.body_simulation,
                target.name.as_bytes(),
                target.value,
                ty,
            )?;
            attributes.push(AttributeChange {
                name: target.name.clone(),
                property: target.property,
                value_offset: patch.layout.value.start,
                previous: patch.previous,
                written: patch.written,
            });
        }
        debug_assert_eq!(original_len, prisoner.body_simulation.len());

        store::save_prisoner(&tx, &prisoner)?;
        let skills = store::update_skills(&tx, prisoner_id, &plan.skills)?;

        tx.commit()?;
        tracing::info!(
            prisoner_id,
            attributes = attributes.len(),
            skills = skills.len(),
            "committed prisoner edits"
        );

        Ok(EditReport {
            prisoner_id,
            attributes,
            skills,
        })
    }
}
