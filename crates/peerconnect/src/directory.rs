//! The static student directory.
//!
//! A fixed list of student records, declared once and shared by reference
//! with every view that needs it. Records are never mutated after the
//! directory is built.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Identifier of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Unique identifier.
    pub id: StudentId,
    /// Full name.
    pub name: String,
    /// Year of study, e.g. "2nd Year".
    pub year: String,
    /// Department name.
    pub department: String,
    /// Picture URL or data URI; may be empty.
    #[serde(default)]
    pub profile_pic: String,
    /// Skills, in display order.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Interests, in display order.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Project areas, in display order.
    #[serde(default)]
    pub projects: Vec<String>,
}

impl StudentRecord {
    /// The avatar fallback: the first character of the name.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// The set of student records the views filter and join against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    records: Vec<StudentRecord>,
}

impl Directory {
    /// Build a directory, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateStudent`] if two records share an id.
    pub fn new(records: Vec<StudentRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(Error::DuplicateStudent(record.id));
            }
        }
        Ok(Self { records })
    }

    /// The built-in directory of four students.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            records: vec![
                record(
                    1,
                    "Alice Johnson",
                    "2nd Year",
                    "Computer Science",
                    &["React", "Node.js", "Python"],
                    &["Web Development", "AI"],
                    &["Web Apps", "ML"],
                ),
                record(
                    2,
                    "Bob Smith",
                    "3rd Year",
                    "Electronics",
                    &["C++", "Robotics", "IoT"],
                    &["Robotics", "Embedded"],
                    &["IoT", "Robotics"],
                ),
                record(
                    3,
                    "Carol White",
                    "1st Year",
                    "Mechanical",
                    &["CAD", "Matlab"],
                    &["Design", "Simulation"],
                    &["CAD", "Simulation"],
                ),
                record(
                    4,
                    "David Lee",
                    "4th Year",
                    "Computer Science",
                    &["Java", "Spring", "AWS"],
                    &["Cloud", "Backend"],
                    &["Cloud", "Web Apps"],
                ),
            ],
        }
    }

    /// Load a directory from a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it
    /// contains duplicate ids.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let records: Vec<StudentRecord> = serde_json::from_str(&contents)?;
        debug!(
            "Loaded {} student records from {}",
            records.len(),
            path.display()
        );
        Self::new(records)
    }

    /// All records, in directory order.
    #[must_use]
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the directory has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: StudentId) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Look up a record that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStudent`] if no record has this id.
    pub fn require(&self, id: StudentId) -> Result<&StudentRecord> {
        self.get(id).ok_or(Error::UnknownStudent(id))
    }

    /// Whether a record with this id exists.
    #[must_use]
    pub fn contains(&self, id: StudentId) -> bool {
        self.get(id).is_some()
    }

    /// Distinct departments in order of first appearance.
    #[must_use]
    pub fn departments(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.department.as_str())
            .filter(|d| seen.insert(*d))
            .collect()
    }

    /// Records whose ids appear in `ids`, in directory order.
    ///
    /// Ids with no matching record are ignored.
    #[must_use]
    pub fn join(&self, ids: &[StudentId]) -> Vec<&StudentRecord> {
        self.records.iter().filter(|r| ids.contains(&r.id)).collect()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::canonical()
    }
}

fn record(
    id: u32,
    name: &str,
    year: &str,
    department: &str,
    skills: &[&str],
    interests: &[&str],
    projects: &[&str],
) -> StudentRecord {
    let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
    StudentRecord {
        id: StudentId(id),
        name: name.to_string(),
        year: year.to_string(),
        department: department.to_string(),
        profile_pic: String::new(),
        skills: owned(skills),
        interests: owned(interests),
        projects: owned(projects),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_directory() {
        let directory = Directory::canonical();
        assert_eq!(directory.len(), 4);
        let names: Vec<_> = directory.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Alice Johnson", "Bob Smith", "Carol White", "David Lee"]
        );
    }

    #[test]
    fn test_canonical_ids_unique() {
        let directory = Directory::canonical();
        assert!(Directory::new(directory.records().to_vec()).is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut records = Directory::canonical().records().to_vec();
        records[3].id = StudentId(1);

        let err = Directory::new(records).unwrap_err();
        assert!(matches!(err, Error::DuplicateStudent(StudentId(1))));
    }

    #[test]
    fn test_departments_first_appearance() {
        let directory = Directory::canonical();
        assert_eq!(
            directory.departments(),
            vec!["Computer Science", "Electronics", "Mechanical"]
        );
    }

    #[test]
    fn test_get_and_contains() {
        let directory = Directory::canonical();
        assert_eq!(directory.get(StudentId(3)).unwrap().name, "Carol White");
        assert!(directory.contains(StudentId(4)));
        assert!(!directory.contains(StudentId(5)));
        assert!(matches!(
            directory.require(StudentId(5)),
            Err(Error::UnknownStudent(StudentId(5)))
        ));
    }

    #[test]
    fn test_join_uses_directory_order() {
        let directory = Directory::canonical();
        let ids = [StudentId(4), StudentId(9), StudentId(2)];

        let joined: Vec<_> = directory.join(&ids).into_iter().map(|r| r.id).collect();
        assert_eq!(joined, vec![StudentId(2), StudentId(4)]);
    }

    #[test]
    fn test_initial() {
        let directory = Directory::canonical();
        assert_eq!(directory.get(StudentId(1)).unwrap().initial(), Some('A'));
    }

    #[test]
    fn test_record_json_field_names() {
        let directory = Directory::canonical();
        let json = serde_json::to_value(&directory.records()[0]).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["profilePic"], "");
        assert_eq!(json["skills"][1], "Node.js");
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!(
            "peerconnect-directory-{}.json",
            std::process::id()
        ));
        let json = r#"[
            {"id": 10, "name": "Eve Park", "year": "2nd Year", "department": "Physics",
             "skills": ["Optics"], "interests": ["Lasers"], "projects": ["Photonics"]}
        ]"#;
        std::fs::write(&path, json).unwrap();

        let directory = Directory::from_json_file(&path).unwrap();
        assert_eq!(directory.len(), 1);
        let eve = directory.get(StudentId(10)).unwrap();
        assert_eq!(eve.profile_pic, "");
        assert_eq!(eve.skills, vec!["Optics"]);

        let _ = std::fs::remove_file(&path);
    }
}
