use rusqlite::Row;

use crate::error::CoreError;
use crate::hash::{hash_project, now_utc};
use crate::model::Project;

use super::LedgerStore;

impl LedgerStore {
    /// Create a uniquely named project and return it.
    pub fn create_project(&self, name: &str, description: &str) -> Result<Project, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("project name is required".into()));
        }

        let project = Project {
            name: name.to_string(),
            description: description.to_string(),
            created_at: now_utc(),
        };
        let hash = hash_project(&project.name, &project.description, &project.created_at);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO projects (name, description, created_at, prev_hash, hash)
                 VALUES (?1, ?2, ?3, NULL, ?4)",
                (&project.name, &project.description, &project.created_at, &hash),
            )
            .map_err(|err| {
                if CoreError::is_unique_violation(&err) {
                    CoreError::AlreadyExists(project.name.clone())
                } else {
                    err.into()
                }
            })?;
            Ok(())
        })?;

        Ok(project)
    }

    /// True when a project with this exact name exists.
    pub fn project_exists(&self, name: &str) -> Result<bool, CoreError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(1) FROM projects WHERE name = ?1",
                [name],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }

    /// All projects ordered by creation time, oldest first.
    pub fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, description, created_at FROM projects
                 ORDER BY created_at ASC, name ASC",
            )?;
            let mapped = stmt.query_map([], row_to_project)?;
            Ok(mapped.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }
}

fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    let description: Option<String> = row.get(1)?;
    Ok(Project {
        name: row.get(0)?,
        description: description.unwrap_or_default(),
        created_at: row.get(2)?,
    })
}
