use crate::error::{Result, TutorError};
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

static LESSON_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lessons");

const CATALOG_FILE: &str = "catalog.json";

/// A practice passage handed to the session manager. Read-only to the core.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub focus_area: String,
    pub passage: String,
    pub coaching_tip: String,
}

impl Lesson {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        focus_area: impl Into<String>,
        passage: impl Into<String>,
        coaching_tip: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            focus_area: focus_area.into(),
            passage: passage.into(),
            coaching_tip: coaching_tip.into(),
        }
    }
}

// Lessons are identified by id alone
impl PartialEq for Lesson {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Lesson {}

impl fmt::Display for Lesson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.focus_area)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum LessonCategory {
    Warmup,
    Accuracy,
    Fluency,
}

impl LessonCategory {
    pub const ALL: [LessonCategory; 3] = [
        LessonCategory::Warmup,
        LessonCategory::Accuracy,
        LessonCategory::Fluency,
    ];
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LessonCatalog {
    warmups: Vec<Lesson>,
    accuracy: Vec<Lesson>,
    fluency: Vec<Lesson>,
}

impl LessonCatalog {
    /// The catalog bundled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_dir(&LESSON_DIR)
    }

    fn from_dir(dir: &Dir<'_>) -> Result<Self> {
        let file = dir
            .get_file(CATALOG_FILE)
            .ok_or_else(|| TutorError::Catalog(format!("{CATALOG_FILE} not found")))?;
        let contents = std::str::from_utf8(file.contents())
            .map_err(|e| TutorError::Catalog(format!("{CATALOG_FILE}: {e}")))?;
        Self::from_json(contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn lessons(&self, category: LessonCategory) -> &[Lesson] {
        match category {
            LessonCategory::Warmup => &self.warmups,
            LessonCategory::Accuracy => &self.accuracy,
            LessonCategory::Fluency => &self.fluency,
        }
    }

    /// Warmups first, then accuracy builders, then fluency runs.
    pub fn all(&self) -> Vec<&Lesson> {
        LessonCategory::ALL
            .iter()
            .flat_map(|c| self.lessons(*c))
            .collect()
    }

    pub fn find(&self, id: &str) -> Result<&Lesson> {
        self.all()
            .into_iter()
            .find(|l| l.id == id)
            .ok_or_else(|| TutorError::UnknownLesson(id.to_string()))
    }

    pub fn random(&self, category: LessonCategory) -> Option<&Lesson> {
        self.lessons(category).choose(&mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use include_dir::{DirEntry, File};

    #[test]
    fn builtin_catalog_has_every_category() {
        let catalog = LessonCatalog::builtin().unwrap();

        for category in LessonCategory::ALL {
            assert_eq!(catalog.lessons(category).len(), 2, "{category}");
        }
        assert_eq!(catalog.all().len(), 6);
        assert_eq!(catalog.all()[0].id, "warmup_home_row");
    }

    #[test]
    fn find_by_id() {
        let catalog = LessonCatalog::builtin().unwrap();

        let lesson = catalog.find("fluency_fact").unwrap();
        assert_eq!(lesson.title, "STEM Fact Blast");
        assert_matches!(catalog.find("nope"), Err(TutorError::UnknownLesson(id)) if id == "nope");
    }

    #[test]
    fn random_stays_in_category() {
        let catalog = LessonCatalog::builtin().unwrap();

        for _ in 0..10 {
            let lesson = catalog.random(LessonCategory::Accuracy).unwrap();
            assert!(lesson.id.starts_with("accuracy_"));
        }
        assert!(LessonCatalog::default()
            .random(LessonCategory::Warmup)
            .is_none());
    }

    #[test]
    fn lessons_compare_by_id() {
        let a = Lesson::new("x", "A", "f", "passage", "tip");
        let b = Lesson::new("x", "B", "g", "other", "tip2");
        let c = Lesson::new("y", "A", "f", "passage", "tip");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "A - f");
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        static EMPTY: Dir = Dir::new("", &[]);

        assert_matches!(
            LessonCatalog::from_dir(&EMPTY),
            Err(TutorError::Catalog(msg)) if msg == "catalog.json not found"
        );
    }

    #[test]
    fn non_utf8_catalog_keeps_the_cause() {
        static BAD: Dir = Dir::new(
            "",
            &[DirEntry::File(File::new("catalog.json", &[0x7b, 0xff, 0xfe]))],
        );

        assert_matches!(
            LessonCatalog::from_dir(&BAD),
            Err(TutorError::Catalog(msg)) if msg.contains("utf-8")
        );
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert_matches!(
            LessonCatalog::from_json("{ not json"),
            Err(TutorError::Config(_))
        );
    }
}
