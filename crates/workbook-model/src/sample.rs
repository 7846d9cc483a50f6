//! Demo dataset
//!
//! A small but fully populated workbook used to explore the tool without
//! setting up a team. Each load gets a fresh project identity.

use crate::catalog::ZONES;
use crate::document::{
    AuthorMeta, BusinessCanvas, Dish, DishCategory, Document, IndividualChecklist, Member,
    ProjectMeta, TimelineEvent, Trend,
};
use crate::id::IdGenerator;
use crate::role::Role;

fn stamp(author: &str, role: Role, timestamp: i64) -> AuthorMeta {
    AuthorMeta {
        author: author.to_string(),
        role,
        timestamp,
    }
}

impl Document {
    /// Build the demo workbook, created at `now`
    #[must_use]
    pub fn sample(ids: &dyn IdGenerator, now: i64) -> Self {
        let mut doc = Self::new(ids.new_id());

        doc.meta = ProjectMeta {
            team_name: "La Barraca Sostenible".to_string(),
            center_name: Some("CIFP Hostelería y Turismo".to_string()),
            group_number: Some("G-01".to_string()),
            project_name: Some("Recuperación Huertana".to_string()),
            created_at: now,
            ..ProjectMeta::default()
        };

        doc.members = vec![
            Member::new("m1", "Ana García", Role::Coordinator),
            Member::new("m2", "Pedro Martínez", Role::Resources),
            Member::new("m3", "Lucía Ruiz", Role::Communication),
            Member::new("m4", "Javier Sola", Role::Production),
            Member::new("m5", "Elena Nito", Role::Documentation),
        ];

        doc.phase1.justification = "Recover the gastronomic heritage of the Huerta de Murcia \
            and fuse it with contemporary technique."
            .to_string();
        doc.phase1.target_audience = "Cultural tourists and sustainability-minded locals.".to_string();
        doc.phase1.gastronomic_zone = ZONES[4].to_string();

        doc.phase2.trends = vec![Trend {
            id: "t1".to_string(),
            title: "Trash Cooking".to_string(),
            description: "Whole-ingredient use.".to_string(),
            meta: stamp("Javier Sola", Role::Production, now),
        }];
        doc.phase2.canvas = BusinessCanvas {
            partners: "Cooperativa del Raal".to_string(),
            activities: "Restaurant and kitchen garden".to_string(),
            resources: "3000 m2 farm".to_string(),
            value_prop: "Real zero-kilometre produce".to_string(),
            relationships: "Close".to_string(),
            channels: "Social media".to_string(),
            segments: "Tourists".to_string(),
            structure: "Wages, rent".to_string(),
            revenue: "Tasting menu".to_string(),
            updated_by: Some(stamp("Ana García", Role::Coordinator, now)),
        };

        doc.phase3.dishes = vec![Dish {
            id: "d1".to_string(),
            name: "Zarangollo 3.0".to_string(),
            category: DishCategory::Starter,
            description: "Deconstructed.".to_string(),
            ods: vec!["12".to_string()],
            photo_base64: None,
            meta: stamp("Lucía Ruiz", Role::Communication, now),
        }];

        doc.phase4.intro_text = "Located in La Arboleja...".to_string();
        doc.phase4.objectives_text = "1. Break even in year one.".to_string();
        doc.phase4.timeline = vec![TimelineEvent {
            id: "ev1".to_string(),
            week: 1,
            task: "Team constitution".to_string(),
            responsible: "Ana García".to_string(),
            meta: stamp("Ana García", Role::Coordinator, now),
        }];

        doc.phase6.individual_checklists.insert(
            "m1".to_string(),
            IndividualChecklist {
                reviewed_research: true,
                reviewed_dishes: true,
                defense_prep: true,
            },
        );
        doc.phase6.introduction = "This project is the joint effort of...".to_string();
        doc.phase6.conclusions = "In conclusion, feasibility is high...".to_string();
        doc.phase6.bibliography = "INE, Murcia Turística...".to_string();
        doc.phase6.memory_pdf_uploaded = true;
        doc.phase6.virtual_menu_url = "https://qr.carta.com/labarraca".to_string();
        doc.phase6.rehearsal_date = "2025-03-20".to_string();

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::UlidGenerator;

    #[test]
    fn sample_is_populated() {
        let doc = Document::sample(&UlidGenerator, 1_000);
        assert_eq!(doc.members.len(), 5);
        assert_eq!(doc.meta.created_at, 1_000);
        assert_eq!(doc.phase2.canvas.updated_by.as_ref().map(|m| m.timestamp), Some(1_000));
        assert!(doc.phase5.costings.is_empty());
    }

    #[test]
    fn each_sample_gets_fresh_identity() {
        let a = Document::sample(&UlidGenerator, 1);
        let b = Document::sample(&UlidGenerator, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn sample_covers_every_role() {
        let doc = Document::sample(&UlidGenerator, 1);
        for role in Role::ALL {
            assert!(doc.member_with_role(role).is_some(), "missing {role}");
        }
    }
}
