//! SQL access to the `prisoner`, `prisoner_skill` and `user_profile` tables.
//!
//! Every function takes a plain [`Connection`] so callers can pass either the
//! connection itself or an open transaction.

use std::collections::BTreeMap;

use rusqlite::{Connection, OptionalExtension, params};

use crate::config::SkillTarget;
use crate::core_api::{CoreError, CoreErrorCode, LocalPrisoner, Prisoner, SkillChange, SkillEntry};

/// Prisoners whose user profile has no online authority, i.e. single player
/// characters. Prisoners without any profile row match as well.
pub fn local_prisoners(conn: &Connection) -> Result<Vec<LocalPrisoner>, CoreError> {
    let mut stmt = conn.prepare(
        "SELECT prisoner.id, user_profile.name FROM prisoner \
         LEFT JOIN user_profile ON prisoner.user_profile_id = user_profile.id \
         WHERE user_profile.authority_name IS NULL \
         ORDER BY prisoner.id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(LocalPrisoner {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn load_prisoner(conn: &Connection, id: i64) -> Result<Prisoner, CoreError> {
    conn.query_row(
        "SELECT id, user_profile_id, body_simulation FROM prisoner WHERE id = ?1",
        params![id],
        |row| {
            Ok(Prisoner {
                id: row.get(0)?,
                user_profile_id: row.get(1)?,
                body_simulation: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::RecordNotFound,
            format!("no prisoner with ID {id}"),
        )
    })
}

/// Writes back `body_simulation` only. Returns the number of affected rows.
pub fn save_prisoner(conn: &Connection, prisoner: &Prisoner) -> Result<usize, CoreError> {
    let affected = conn.execute(
        "UPDATE prisoner SET body_simulation = ?1 WHERE id = ?2",
        params![prisoner.body_simulation, prisoner.id],
    )?;
    tracing::debug!(prisoner_id = prisoner.id, affected, "saved body simulation");

    if affected == 0 {
        return Err(CoreError::new(
            CoreErrorCode::UpdateFailed,
            format!("updating prisoner {} affected no rows", prisoner.id),
        ));
    }
    Ok(affected)
}

pub fn prisoner_skills(
    conn: &Connection,
    prisoner_id: i64,
) -> Result<Vec<SkillEntry>, CoreError> {
    let mut stmt = conn.prepare(
        "SELECT name, level, experience FROM prisoner_skill \
         WHERE prisoner_id = ?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![prisoner_id], |row| {
        Ok(SkillEntry {
            name: row.get(0)?,
            level: row.get(1)?,
            experience: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Rewrites level and experience of the prisoner's existing skill rows that
/// have an override. Rows are never inserted or deleted.
pub fn update_skills(
    conn: &Connection,
    prisoner_id: i64,
    overrides: &BTreeMap<String, SkillTarget>,
) -> Result<Vec<SkillChange>, CoreError> {
    let mut changes = Vec::new();

    for skill in prisoner_skills(conn, prisoner_id)? {
        let Some(target) = overrides.get(&skill.name) else {
            continue;
        };

        let affected = conn.execute(
            "UPDATE prisoner_skill SET level = ?1, experience = ?2 \
             WHERE prisoner_id = ?3 AND name = ?4",
            params![target.level, target.experience, prisoner_id, skill.name],
        )?;
        if affected == 0 {
            return Err(CoreError::new(
                CoreErrorCode::UpdateFailed,
                format!(
                    "updating skill {} of prisoner {prisoner_id} affected no rows",
                    skill.name
                ),
            ));
        }

        changes.push(SkillChange {
            name: skill.name,
            previous_level: skill.level,
            previous_experience: skill.experience,
            level: target.level,
            experience: target.experience,
        });
    }

    let missing = overrides
        .keys()
        .filter(|name| !changes.iter().any(|c| &c.name == *name))
        .count();
    tracing::debug!(
        prisoner_id,
        updated = changes.len(),
        missing,
        "updated prisoner skills"
    );

    Ok(changes)
}
