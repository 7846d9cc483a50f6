//! Team roles
//!
//! The closed set of five responsibilities. Wire names are the ones the
//! exchanged JSON snapshots carry, so they never change.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Team responsibility held by exactly one member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Leads schedule and task distribution
    #[serde(rename = "Coordinador")]
    Coordinator,

    /// Owns files, minutes and delivery format
    #[serde(rename = "Documentación")]
    Documentation,

    /// Spokesperson, owns the oral defense
    #[serde(rename = "Comunicación")]
    Communication,

    /// Sources, suppliers and costings
    #[serde(rename = "Recursos")]
    Resources,

    /// Quality and feasibility control
    #[serde(rename = "Producción")]
    Production,
}

impl Role {
    /// All roles in setup order
    pub const ALL: [Role; 5] = [
        Role::Coordinator,
        Role::Documentation,
        Role::Communication,
        Role::Resources,
        Role::Production,
    ];

    /// Name used in exchanged snapshots
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Coordinator => "Coordinador",
            Self::Documentation => "Documentación",
            Self::Communication => "Comunicación",
            Self::Resources => "Recursos",
            Self::Production => "Producción",
        }
    }

    /// Short English label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Coordinator => "coordinator",
            Self::Documentation => "documentation",
            Self::Communication => "communication",
            Self::Resources => "resources",
            Self::Production => "production",
        }
    }

    /// Description and official task list for this role
    #[must_use]
    pub fn definition(self) -> &'static RoleDefinition {
        match self {
            Self::Coordinator => &COORDINATOR,
            Self::Documentation => &DOCUMENTATION,
            Self::Communication => &COMMUNICATION,
            Self::Resources => &RESOURCES,
            Self::Production => &PRODUCTION,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    /// Accepts wire names and English labels, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.label() == needle || role.wire_name().to_lowercase() == needle)
            .ok_or_else(|| ModelError::UnknownRole(s.to_string()))
    }
}

/// Static description of a role
#[derive(Debug)]
pub struct RoleDefinition {
    /// One-line summary
    pub description: &'static str,
    /// Official responsibilities
    pub tasks: &'static [&'static str],
}

static COORDINATOR: RoleDefinition = RoleDefinition {
    description: "Leads the team's organisation and time.",
    tasks: &[
        "Keeps the calendar and makes sure deadlines are met.",
        "Distributes tasks evenly across members.",
        "Supervises overall progress against the plan.",
        "Collects every phase's files and unifies them.",
    ],
};

static DOCUMENTATION: RoleDefinition = RoleDefinition {
    description: "Manages information and delivery format.",
    tasks: &[
        "Collects and organises files produced by the team.",
        "Ensures the final report meets the required format.",
        "Takes meeting minutes.",
        "Checks no section of the partial report is missing.",
    ],
};

static COMMUNICATION: RoleDefinition = RoleDefinition {
    description: "Spokesperson and presentation owner.",
    tasks: &[
        "Acts as main contact with teaching staff.",
        "Prepares the script of the oral defense.",
        "Keeps tone and writing style consistent.",
        "Coordinates slides and visual material.",
    ],
};

static RESOURCES: RoleDefinition = RoleDefinition {
    description: "Researches means, materials and finances.",
    tasks: &[
        "Finds reliable sources and required resources.",
        "Manages the mock budget and dish costings.",
        "Locates suppliers and local technical references.",
        "Makes sure no key information is missing in any phase.",
    ],
};

static PRODUCTION: RoleDefinition = RoleDefinition {
    description: "Quality and feasibility control.",
    tasks: &[
        "Reviews content against the evaluation criteria.",
        "Checks technical feasibility of gastronomic proposals.",
        "Detects errors and inconsistencies before delivery.",
        "Ensures the proposal is realistic and executable.",
    ],
};
