//! The student roster: resolved identities plus sheet locations.
//!
//! Credentials and login belong to the external identity store; the core
//! only ever sees the resolved account.
//!
//! Stored as a JSON array on disk:
//! ```json
//! [
//!   {
//!     "id": "30628",
//!     "role": "student",
//!     "display_name": "김지우",
//!     "anonymized_name": "학생A",
//!     "sheet_url": "https://example.com/export/30628.csv"
//!   }
//! ]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

/// A resolved account. `anonymized_name` is what ranked reports display;
/// `sheet_url` is where this student's sheet export lives, absent for
/// accounts with no sheet (admins, transfers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAccount {
    pub id: String,
    pub role: Role,
    pub display_name: String,
    pub anonymized_name: String,
    #[serde(default)]
    pub sheet_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Roster {
    students: Vec<StudentAccount>,
}

impl Roster {
    /// Loads the roster from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading roster file {path}"))?;
        let students: Vec<StudentAccount> = serde_json::from_str(&content)
            .with_context(|| format!("parsing roster file {path}"))?;
        debug!(path, students = students.len(), "Roster loaded");
        Ok(Roster { students })
    }

    pub fn from_accounts(students: Vec<StudentAccount>) -> Self {
        Roster { students }
    }

    pub fn students(&self) -> &[StudentAccount] {
        &self.students
    }

    /// Accounts the batch report covers: students with a configured sheet.
    pub fn reportable(&self) -> impl Iterator<Item = &StudentAccount> {
        self.students
            .iter()
            .filter(|s| s.role == Role::Student && s.sheet_url.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, role: Role, sheet_url: Option<&str>) -> StudentAccount {
        StudentAccount {
            id: id.to_string(),
            role,
            display_name: format!("이름{id}"),
            anonymized_name: format!("학생{id}"),
            sheet_url: sheet_url.map(str::to_string),
        }
    }

    #[test]
    fn test_reportable_excludes_admins_and_sheetless_students() {
        let roster = Roster::from_accounts(vec![
            account("1", Role::Student, Some("https://example.com/1.csv")),
            account("2", Role::Admin, Some("https://example.com/2.csv")),
            account("3", Role::Student, None),
        ]);
        let ids: Vec<&str> = roster.reportable().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_roster_deserializes_from_json() {
        let json = r#"[{
            "id": "30628",
            "role": "student",
            "display_name": "김지우",
            "anonymized_name": "학생A",
            "sheet_url": "https://example.com/30628.csv"
        }]"#;
        let students: Vec<StudentAccount> = serde_json::from_str(json).unwrap();
        assert_eq!(students[0].role, Role::Student);
        assert_eq!(students[0].anonymized_name, "학생A");
    }
}
