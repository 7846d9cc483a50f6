//! Workbook document schema
//!
//! The canonical shape of a project workbook: project metadata, the team and
//! six phase sub-documents. Field names serialize in camelCase and match the
//! snapshot format exchanged between members.

use crate::error::ModelError;
use crate::id::IdGenerator;
use crate::lenient;
use crate::role::Role;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Root aggregate: one per working session, always fully present
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Generated project identity
    pub id: String,
    /// Free-text project metadata
    pub meta: ProjectMeta,
    /// Team members in setup order
    pub members: Vec<Member>,
    /// Definition
    pub phase1: Phase1,
    /// Research and business model
    pub phase2: Phase2,
    /// Menu design
    pub phase3: Phase3,
    /// Planning
    pub phase4: Phase4,
    /// Costing
    pub phase5: Phase5,
    /// Final report and defense
    pub phase6: Phase6,
}

impl Document {
    /// Create an empty document with the given identity
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: ProjectMeta::default(),
            members: Vec::new(),
            phase1: Phase1::default(),
            phase2: Phase2::default(),
            phase3: Phase3::default(),
            phase4: Phase4::default(),
            phase5: Phase5::default(),
            phase6: Phase6::default(),
        }
    }

    /// Create an empty document with a generated identity
    #[must_use]
    pub fn create(ids: &dyn IdGenerator, created_at: i64) -> Self {
        let mut document = Self::new(ids.new_id());
        document.meta.created_at = created_at;
        document
    }

    /// Serialize to compact JSON (the exchange format)
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 hex digest of the compact serialized form
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }

    /// Find member by identity
    #[must_use]
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Find the first member holding a role
    #[must_use]
    pub fn member_with_role(&self, role: Role) -> Option<&Member> {
        self.members.iter().find(|m| m.role == role)
    }

    /// Display title: project name, falling back to team name
    #[must_use]
    pub fn title(&self) -> &str {
        match self.meta.project_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.meta.team_name,
        }
    }
}

/// Project metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMeta {
    pub team_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    /// Embedded team logo (data URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_base64: Option<String>,
    /// Embedded group photo (data URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_photo_base64: Option<String>,
    /// Creation time, wall-clock milliseconds
    pub created_at: i64,
}

/// Team participant
///
/// Identity is stable for the life of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    /// Extra responsibilities agreed during setup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tasks: Option<String>,
}

impl Member {
    /// Create member
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            custom_tasks: None,
        }
    }
}

/// Attribution of the last write to a content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorMeta {
    /// Author display name
    pub author: String,
    /// Author role at time of edit
    pub role: Role,
    /// Wall-clock milliseconds at time of edit. Only a tie-breaker: device
    /// clocks are not synchronized.
    pub timestamp: i64,
}

impl Default for AuthorMeta {
    fn default() -> Self {
        Self {
            author: String::new(),
            role: Role::Coordinator,
            timestamp: 0,
        }
    }
}

impl AuthorMeta {
    /// Author name used when nobody is signed in
    pub const ANONYMOUS: &'static str = "Anonimo";

    /// Stamp an edit made by `member` at `timestamp`
    #[must_use]
    pub fn stamp(member: Option<&Member>, timestamp: i64) -> Self {
        match member {
            Some(m) => Self {
                author: m.name.clone(),
                role: m.role,
                timestamp,
            },
            None => Self {
                author: Self::ANONYMOUS.to_string(),
                role: Role::Coordinator,
                timestamp,
            },
        }
    }

    /// Stamp an edit made now
    #[must_use]
    pub fn now(member: Option<&Member>) -> Self {
        Self::stamp(member, now_millis())
    }
}

/// Current wall-clock time in milliseconds
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ---------------------------------------------------------------------------
// Phase 1: definition
// ---------------------------------------------------------------------------

/// Definition phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Phase1 {
    pub justification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification_meta: Option<AuthorMeta>,
    pub target_audience: String,
    /// Chosen once during setup
    pub gastronomic_zone: String,
}

// ---------------------------------------------------------------------------
// Phase 2: research
// ---------------------------------------------------------------------------

/// Research phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Phase2 {
    #[serde(deserialize_with = "lenient::vec")]
    pub trends: Vec<Trend>,
    pub canvas: BusinessCanvas,
}

/// Market trend contributed by any member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meta: AuthorMeta,
}

/// Business model canvas, replaced as a whole
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessCanvas {
    pub partners: String,
    pub activities: String,
    pub resources: String,
    pub value_prop: String,
    pub relationships: String,
    pub channels: String,
    pub segments: String,
    pub structure: String,
    pub revenue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<AuthorMeta>,
}

// ---------------------------------------------------------------------------
// Phase 3: menu design
// ---------------------------------------------------------------------------

/// Menu design phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Phase3 {
    #[serde(deserialize_with = "lenient::vec")]
    pub dishes: Vec<Dish>,
}

/// Menu course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DishCategory {
    #[serde(rename = "Aperitivo")]
    Appetizer,
    #[serde(rename = "Entrante")]
    Starter,
    #[default]
    #[serde(rename = "Principal")]
    Main,
    #[serde(rename = "Postre")]
    Dessert,
}

/// Dish on the proposed menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: DishCategory,
    #[serde(default)]
    pub description: String,
    /// Sustainable development goal ids
    #[serde(default)]
    pub ods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_base64: Option<String>,
    #[serde(default)]
    pub meta: AuthorMeta,
}

// ---------------------------------------------------------------------------
// Phase 4: planning
// ---------------------------------------------------------------------------

/// Planning phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Phase4 {
    pub intro_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro_meta: Option<AuthorMeta>,
    pub objectives_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objectives_meta: Option<AuthorMeta>,
    #[serde(deserialize_with = "lenient::vec")]
    pub timeline: Vec<TimelineEvent>,
}

/// Scheduled task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    #[serde(default)]
    pub week: u32,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub meta: AuthorMeta,
}

// ---------------------------------------------------------------------------
// Phase 5: costing
// ---------------------------------------------------------------------------

/// Costing phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Phase5 {
    #[serde(deserialize_with = "lenient::vec")]
    pub costings: Vec<Costing>,
}

/// Costing sheet line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Gross weight in kilograms
    #[serde(default)]
    pub gross_weight: f64,
    /// Price per kilogram
    #[serde(default)]
    pub price_per_unit: f64,
    /// Trim loss, 0..=100
    #[serde(default)]
    pub waste_percentage: f64,
}

/// Costing sheet for one dish; at most one per dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Costing {
    pub dish_id: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub ingredients: Vec<Ingredient>,
    /// Portion weight in kilograms
    #[serde(default)]
    pub portion_weight: f64,
    #[serde(default)]
    pub portions: u32,
    /// Sale price multiplier applied to cost per portion
    #[serde(default)]
    pub multiplier: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub meta: AuthorMeta,
}

// ---------------------------------------------------------------------------
// Phase 6: final report and defense
// ---------------------------------------------------------------------------

/// Final phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Phase6 {
    /// Member id -> personal checklist
    pub individual_checklists: IndexMap<String, IndividualChecklist>,
    pub introduction: String,
    pub conclusions: String,
    pub bibliography: String,
    pub memory_pdf_uploaded: bool,
    pub presentation_uploaded: bool,
    pub virtual_menu_url: String,
    pub physical_menu_uploaded: bool,
    pub rehearsal_date: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub evaluations: Vec<Evaluation>,
}

/// Individual preparation checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndividualChecklist {
    pub reviewed_research: bool,
    pub reviewed_dishes: bool,
    pub defense_prep: bool,
}

impl IndividualChecklist {
    /// Number of ticked items
    #[must_use]
    pub fn completed(&self) -> usize {
        [self.reviewed_research, self.reviewed_dishes, self.defense_prep]
            .into_iter()
            .filter(|done| *done)
            .count()
    }
}

/// Peer evaluation, one per evaluator/target pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub evaluator: String,
    pub target_member: String,
    /// -1, 0 or +1
    #[serde(default)]
    pub score: i8,
    #[serde(default)]
    pub comment: String,
}
