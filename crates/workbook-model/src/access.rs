//! Advisory role-gated editing
//!
//! Marks which roles may edit each section. This is a presentation hint, not
//! a security boundary: anything holding the document can write any field,
//! and neither the model nor the merge engine consults this table.

use crate::error::ModelError;
use crate::role::Role;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Editable area of the workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    /// Team constitution and project metadata
    Team,
    /// Phase 1 narrative
    Definition,
    /// Phase 2 trends
    Trends,
    /// Phase 2 business canvas
    Canvas,
    /// Phase 3 dishes
    Dishes,
    /// Phase 4 introduction text
    Introduction,
    /// Phase 4 objectives text
    Objectives,
    /// Phase 4 timeline
    Timeline,
    /// Phase 5 costings
    Costings,
    /// Phase 6 written report
    FinalReport,
    /// Phase 6 oral defense material
    Defense,
    /// Phase 6 personal checklists
    Checklists,
    /// Phase 6 peer evaluations
    Evaluations,
}

impl Section {
    /// All sections in workbook order
    pub const ALL: [Section; 13] = [
        Section::Team,
        Section::Definition,
        Section::Trends,
        Section::Canvas,
        Section::Dishes,
        Section::Introduction,
        Section::Objectives,
        Section::Timeline,
        Section::Costings,
        Section::FinalReport,
        Section::Defense,
        Section::Checklists,
        Section::Evaluations,
    ];

    /// Stable section name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Definition => "definition",
            Self::Trends => "trends",
            Self::Canvas => "canvas",
            Self::Dishes => "dishes",
            Self::Introduction => "introduction",
            Self::Objectives => "objectives",
            Self::Timeline => "timeline",
            Self::Costings => "costings",
            Self::FinalReport => "final-report",
            Self::Defense => "defense",
            Self::Checklists => "checklists",
            Self::Evaluations => "evaluations",
        }
    }

    /// Workbook phase this section belongs to (0 = project level)
    #[must_use]
    pub fn phase(self) -> u8 {
        match self {
            Self::Team => 0,
            Self::Definition => 1,
            Self::Trends | Self::Canvas => 2,
            Self::Dishes => 3,
            Self::Introduction | Self::Objectives | Self::Timeline => 4,
            Self::Costings => 5,
            Self::FinalReport | Self::Defense | Self::Checklists | Self::Evaluations => 6,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|section| section.name() == needle)
            .ok_or_else(|| ModelError::UnknownSection(s.to_string()))
    }
}

const EVERYONE: &[Role] = &Role::ALL;

/// Roles allowed to edit a section
#[must_use]
pub fn allowed_roles(section: Section) -> &'static [Role] {
    match section {
        Section::Team | Section::Definition | Section::Canvas | Section::Timeline => {
            &[Role::Coordinator]
        }
        Section::Introduction => &[Role::Documentation, Role::Coordinator],
        Section::Objectives => &[Role::Production, Role::Coordinator],
        Section::Costings => &[Role::Resources],
        Section::FinalReport => &[Role::Documentation, Role::Coordinator],
        Section::Defense => &[Role::Communication, Role::Coordinator],
        Section::Trends | Section::Dishes | Section::Checklists | Section::Evaluations => EVERYONE,
    }
}

/// Whether `role` may edit `section`
#[must_use]
pub fn is_editable(section: Section, role: Role) -> bool {
    allowed_roles(section).contains(&role)
}

/// Whether the current user (if any) may edit `section`
///
/// Nobody signed in means read-only.
#[must_use]
pub fn is_editable_by(section: Section, current: Option<Role>) -> bool {
    current.is_some_and(|role| is_editable(section, role))
}

/// Whether a section is narrower than "every role"
#[must_use]
pub fn is_restricted(section: Section) -> bool {
    allowed_roles(section).len() < Role::ALL.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinator_owns_definition() {
        assert!(is_editable(Section::Definition, Role::Coordinator));
        assert!(!is_editable(Section::Definition, Role::Resources));
    }

    #[test]
    fn planning_texts_are_shared_with_coordinator() {
        assert!(is_editable(Section::Introduction, Role::Documentation));
        assert!(is_editable(Section::Introduction, Role::Coordinator));
        assert!(!is_editable(Section::Introduction, Role::Production));

        assert!(is_editable(Section::Objectives, Role::Production));
        assert!(!is_editable(Section::Objectives, Role::Communication));
    }

    #[test]
    fn costings_belong_to_resources() {
        assert!(is_editable(Section::Costings, Role::Resources));
        assert!(!is_editable(Section::Costings, Role::Coordinator));
    }

    #[test]
    fn open_sections_accept_every_role() {
        for role in Role::ALL {
            assert!(is_editable(Section::Trends, role));
            assert!(is_editable(Section::Dishes, role));
        }
        assert!(!is_restricted(Section::Trends));
        assert!(is_restricted(Section::Canvas));
    }

    #[test]
    fn nobody_signed_in_is_read_only() {
        assert!(!is_editable_by(Section::Trends, None));
        assert!(is_editable_by(Section::Trends, Some(Role::Production)));
    }

    #[test]
    fn section_parse_round_trip() {
        for section in Section::ALL {
            assert_eq!(section.name().parse::<Section>().unwrap(), section);
        }
        assert_eq!("final_report".parse::<Section>().unwrap(), Section::FinalReport);
        assert!("kitchen".parse::<Section>().is_err());
    }

    #[test]
    fn sections_map_to_phases() {
        assert_eq!(Section::Canvas.phase(), 2);
        assert_eq!(Section::Costings.phase(), 5);
        assert_eq!(Section::Evaluations.phase(), 6);
    }
}
