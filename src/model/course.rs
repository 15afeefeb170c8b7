//! Closed sets: courses, platforms, and assignment kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A course tracked this term.
///
/// Serialized as its catalog name. Anything else fails to parse,
/// which surfaces a typo in the calendar as a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "BioE 210")]
    BioE210,
    #[serde(rename = "CS 128")]
    Cs128,
    #[serde(rename = "CS 173")]
    Cs173,
    #[serde(rename = "Math 285")]
    Math285,
}

impl Course {
    pub fn name(self) -> &'static str {
        match self {
            Self::BioE210 => "BioE 210",
            Self::Cs128 => "CS 128",
            Self::Cs173 => "CS 173",
            Self::Math285 => "Math 285",
        }
    }

    /// Whether Monday digests call this course out with a reminder banner.
    pub fn has_monday_reminder(self) -> bool {
        matches!(self, Self::BioE210)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an assignment is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Canvas,
    PrairieLearn,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Canvas => "Canvas",
            Self::PrairieLearn => "PrairieLearn",
        })
    }
}

/// What sort of work an assignment is.
///
/// Stores written before kinds existed read back as `Homework`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentKind {
    #[default]
    Homework,
    Quiz,
    MachineProblem,
    Exam,
    Project,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_serializes_as_catalog_name() {
        let json = serde_json::to_string(&Course::BioE210).unwrap();
        assert_eq!(json, "\"BioE 210\"");

        let back: Course = serde_json::from_str("\"Math 285\"").unwrap();
        assert_eq!(back, Course::Math285);
    }

    #[test]
    fn unknown_course_is_rejected() {
        let err = serde_json::from_str::<Course>("\"CS 225\"");
        assert!(err.is_err());
    }

    #[test]
    fn unknown_platform_is_rejected() {
        assert!(serde_json::from_str::<Platform>("\"Gradescope\"").is_err());
        let p: Platform = serde_json::from_str("\"PrairieLearn\"").unwrap();
        assert_eq!(p, Platform::PrairieLearn);
    }

    #[test]
    fn only_bioe_carries_monday_reminder() {
        assert!(Course::BioE210.has_monday_reminder());
        assert!(!Course::Cs128.has_monday_reminder());
        assert!(!Course::Cs173.has_monday_reminder());
        assert!(!Course::Math285.has_monday_reminder());
    }

    #[test]
    fn kind_is_kebab_case() {
        let json = serde_json::to_string(&AssignmentKind::MachineProblem).unwrap();
        assert_eq!(json, "\"machine-problem\"");
    }
}
