//! Per-member task progress

use crate::document::{Document, Member};
use crate::role::Role;
use serde::Serialize;

/// Progress on one assigned task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskProgress {
    /// Phase the task lives in
    pub phase: u8,
    pub title: &'static str,
    pub current: usize,
    pub target: usize,
}

impl TaskProgress {
    fn new(phase: u8, title: &'static str, current: usize, target: usize) -> Self {
        Self {
            phase,
            title,
            current,
            target,
        }
    }

    /// Whether the target is reached
    #[must_use]
    pub fn done(&self) -> bool {
        self.current >= self.target
    }
}

/// Tasks expected from `member`, with current counts
///
/// Everyone contributes trends and dishes (attributed by author name); the
/// coordinator, resources and communication roles get one extra task each.
#[must_use]
pub fn progress_for(document: &Document, member: &Member) -> Vec<TaskProgress> {
    let authored_trends = document
        .phase2
        .trends
        .iter()
        .filter(|t| t.meta.author == member.name)
        .count();
    let authored_dishes = document
        .phase3
        .dishes
        .iter()
        .filter(|d| d.meta.author == member.name)
        .count();

    let mut tasks = vec![
        TaskProgress::new(2, "Research", authored_trends, 1),
        TaskProgress::new(3, "Dishes", authored_dishes, 4),
    ];

    match member.role {
        Role::Coordinator => {
            tasks.push(TaskProgress::new(4, "Timeline", document.phase4.timeline.len(), 1));
        }
        Role::Resources => {
            tasks.push(TaskProgress::new(5, "Costings", document.phase5.costings.len(), 4));
        }
        Role::Communication => {
            let uploaded = usize::from(document.phase6.presentation_uploaded);
            tasks.push(TaskProgress::new(6, "Defense", uploaded, 1));
        }
        Role::Documentation | Role::Production => {}
    }

    tasks
}
