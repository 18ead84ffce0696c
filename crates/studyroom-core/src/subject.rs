//! Read-only subject directory.
//!
//! Subjects are owned elsewhere; the timer only stores an opaque id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

impl Subject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub trait SubjectDirectory {
    fn list_subjects(&self) -> Vec<Subject>;

    fn find_subject(&self, id: &str) -> Option<Subject> {
        self.list_subjects().into_iter().find(|s| s.id == id)
    }
}

impl SubjectDirectory for Vec<Subject> {
    fn list_subjects(&self) -> Vec<Subject> {
        self.clone()
    }
}

/// Subjects available before the user has configured any.
pub fn default_subjects() -> Vec<Subject> {
    vec![
        Subject::new("math-1", "Mathematics"),
        Subject::new("hist-1", "History"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_subject_by_id() {
        let dir = default_subjects();
        assert_eq!(dir.find_subject("hist-1").unwrap().name, "History");
        assert!(dir.find_subject("chem-1").is_none());
    }
}
