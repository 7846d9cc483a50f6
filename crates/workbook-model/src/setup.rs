//! Team constitution
//!
//! Setup drafts one member per role; only drafts with a name become members.

use crate::catalog;
use crate::document::{Document, Member, ProjectMeta};
use crate::error::ModelError;
use crate::id::IdGenerator;
use crate::role::Role;

/// Draft of one member during setup
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDraft {
    pub role: Role,
    pub name: String,
    pub custom_tasks: String,
}

impl MemberDraft {
    /// Create draft for role
    #[inline]
    #[must_use]
    pub fn new(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            custom_tasks: String::new(),
        }
    }

    /// With extra responsibilities
    #[inline]
    #[must_use]
    pub fn with_tasks(mut self, tasks: impl Into<String>) -> Self {
        self.custom_tasks = tasks.into();
        self
    }
}

/// Team setup form
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSetup {
    pub meta: ProjectMeta,
    pub members: Vec<MemberDraft>,
    /// Irreversible choice; empty means "first catalog zone"
    pub gastronomic_zone: String,
}

impl TeamSetup {
    /// Start from a document's metadata with one empty draft per role
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            meta: document.meta.clone(),
            members: Role::ALL.into_iter().map(|role| MemberDraft::new(role, "")).collect(),
            gastronomic_zone: document.phase1.gastronomic_zone.clone(),
        }
    }

    /// Set the name of the draft holding `role`
    pub fn assign(&mut self, role: Role, name: impl Into<String>) {
        let name = name.into();
        match self.members.iter_mut().find(|d| d.role == role) {
            Some(draft) => draft.name = name,
            None => self.members.push(MemberDraft::new(role, name)),
        }
    }

    /// Apply the setup to `document`, returning the updated copy
    ///
    /// # Errors
    /// [`ModelError::EmptyTeam`] when no draft carries a name.
    pub fn apply(&self, document: &Document, ids: &dyn IdGenerator) -> Result<Document, ModelError> {
        let members: Vec<Member> = self
            .members
            .iter()
            .filter(|draft| !draft.name.trim().is_empty())
            .map(|draft| Member {
                id: ids.new_id(),
                name: draft.name.trim().to_string(),
                role: draft.role,
                custom_tasks: Some(draft.custom_tasks.trim())
                    .filter(|tasks| !tasks.is_empty())
                    .map(str::to_string),
            })
            .collect();

        if members.is_empty() {
            return Err(ModelError::EmptyTeam);
        }

        let mut updated = document.clone();
        updated.meta = self.meta.clone();
        updated.members = members;
        updated.phase1.gastronomic_zone = if self.gastronomic_zone.is_empty() {
            catalog::default_zone().to_string()
        } else {
            self.gastronomic_zone.clone()
        };
        Ok(updated)
    }
}
