//! Testing utilities for the workbook workspace
//!
//! Shared fixtures, the two-member merge scenario and proptest strategies.

#![allow(missing_docs)]

use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use std::collections::BTreeMap;
use workbook_model::{
    AuthorMeta, BusinessCanvas, Costing, Dish, DishCategory, Document, Evaluation,
    IndividualChecklist, Ingredient, Member, ProjectMeta, Role, TimelineEvent, Trend,
};

pub fn author(name: &str, role: Role, timestamp: i64) -> AuthorMeta {
    AuthorMeta {
        author: name.to_string(),
        role,
        timestamp,
    }
}

pub fn member(id: &str, name: &str, role: Role) -> Member {
    Member::new(id, name, role)
}

pub fn trend(id: &str, title: &str) -> Trend {
    Trend {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        meta: author("tester", Role::Production, 1),
    }
}

pub fn dish(id: &str, name: &str) -> Dish {
    Dish {
        id: id.to_string(),
        name: name.to_string(),
        category: DishCategory::Main,
        description: String::new(),
        ods: Vec::new(),
        photo_base64: None,
        meta: author("tester", Role::Communication, 1),
    }
}

pub fn timeline_event(id: &str, week: u32, task: &str) -> TimelineEvent {
    TimelineEvent {
        id: id.to_string(),
        week,
        task: task.to_string(),
        responsible: "tester".to_string(),
        meta: author("tester", Role::Coordinator, 1),
    }
}

pub fn costing(dish_id: &str, supplier: &str) -> Costing {
    Costing {
        dish_id: dish_id.to_string(),
        supplier: supplier.to_string(),
        date: "2025-01-01".to_string(),
        ingredients: Vec::new(),
        portion_weight: 0.25,
        portions: 4,
        multiplier: 3.0,
        total_cost: 0.0,
        meta: author("tester", Role::Resources, 1),
    }
}

pub fn evaluation(evaluator: &str, target: &str, score: i8) -> Evaluation {
    Evaluation {
        evaluator: evaluator.to_string(),
        target_member: target.to_string(),
        score,
        comment: String::new(),
    }
}

pub fn canvas_at(value_prop: &str, timestamp: i64) -> BusinessCanvas {
    BusinessCanvas {
        value_prop: value_prop.to_string(),
        updated_by: Some(author("Ana", Role::Coordinator, timestamp)),
        ..BusinessCanvas::default()
    }
}

/// Empty document with a team name set
pub fn document(id: &str, team: &str) -> Document {
    let mut doc = Document::new(id);
    doc.meta.team_name = team.to_string();
    doc
}

/// Local copy of the two-member scenario: Ana alone, one soup
pub fn scenario_local() -> Document {
    let mut doc = document("p1", "Local");
    doc.members = vec![member("m1", "Ana", Role::Coordinator)];
    doc.phase3.dishes = vec![dish("d1", "Soup")];
    doc
}

/// Imported copy of the two-member scenario: Luis joined, soup renamed
pub fn scenario_import() -> Document {
    let mut doc = document("p1", "Imported");
    doc.members = vec![
        member("m1", "Ana", Role::Coordinator),
        member("m2", "Luis", Role::Resources),
    ];
    doc.phase2.trends = vec![trend("t1", "Zero waste")];
    doc.phase3.dishes = vec![dish("d1", "Cream Soup"), dish("d2", "Salad")];
    doc
}

// ---------------------------------------------------------------------------
// proptest strategies
// ---------------------------------------------------------------------------

fn text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-zA-Z ]{1,8}"]
}

fn role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

/// Arbitrary finite amounts, including ones with no short decimal form
fn amount() -> impl Strategy<Value = f64> {
    -1e6f64..1e6
}

fn author_meta() -> impl Strategy<Value = AuthorMeta> {
    ("[a-zA-Z]{0,6}", role(), 0i64..1_000).prop_map(|(author, role, timestamp)| AuthorMeta {
        author,
        role,
        timestamp,
    })
}

/// Key space shared between independently generated documents so that
/// overlapping identities are common
fn keyed<T: std::fmt::Debug>(
    item: impl Strategy<Value = T>,
) -> impl Strategy<Value = BTreeMap<u8, T>> {
    btree_map(0u8..6, item, 0..4)
}

pub fn arb_meta() -> impl Strategy<Value = ProjectMeta> {
    (
        text(),
        option::of(text()),
        option::of("[A-Z]-[0-9]{2}"),
        option::of(text()),
        option::of("data:image/png;base64,[A-Za-z0-9]{4,12}"),
        option::of("data:image/jpeg;base64,[A-Za-z0-9]{4,12}"),
        0i64..1_000_000,
    )
        .prop_map(
            |(team_name, center_name, group_number, project_name, logo, photo, created_at)| {
                ProjectMeta {
                    team_name,
                    center_name,
                    group_number,
                    project_name,
                    delivery_date: None,
                    logo_base64: logo,
                    group_photo_base64: photo,
                    created_at,
                }
            },
        )
}

pub fn arb_members() -> impl Strategy<Value = Vec<Member>> {
    keyed(("[A-Z][a-z]{1,6}", role(), option::of("[a-z ]{1,8}"))).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, (name, role, custom_tasks))| Member {
                id: format!("m{k}"),
                name,
                role,
                custom_tasks,
            })
            .collect()
    })
}

pub fn arb_trends() -> impl Strategy<Value = Vec<Trend>> {
    keyed((text(), text(), author_meta())).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, (title, description, meta))| Trend {
                id: format!("t{k}"),
                title,
                description,
                meta,
            })
            .collect()
    })
}

pub fn arb_canvas() -> impl Strategy<Value = BusinessCanvas> {
    (text(), text(), option::of(author_meta())).prop_map(|(value_prop, partners, updated_by)| {
        BusinessCanvas {
            value_prop,
            partners,
            updated_by,
            ..BusinessCanvas::default()
        }
    })
}

pub fn arb_dishes() -> impl Strategy<Value = Vec<Dish>> {
    let category = prop::sample::select(vec![
        DishCategory::Appetizer,
        DishCategory::Starter,
        DishCategory::Main,
        DishCategory::Dessert,
    ]);
    keyed((text(), category, vec("[0-9]{1,2}", 0..3), author_meta())).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, (name, category, ods, meta))| Dish {
                id: format!("d{k}"),
                name,
                category,
                description: String::new(),
                ods,
                photo_base64: None,
                meta,
            })
            .collect()
    })
}

pub fn arb_timeline() -> impl Strategy<Value = Vec<TimelineEvent>> {
    keyed((1u32..20, text(), author_meta())).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, (week, task, meta))| TimelineEvent {
                id: format!("ev{k}"),
                week,
                task,
                responsible: String::new(),
                meta,
            })
            .collect()
    })
}

pub fn arb_costings() -> impl Strategy<Value = Vec<Costing>> {
    let ingredient = ("[a-z]{1,6}", amount(), amount(), amount()).prop_map(
        |(name, gross_weight, price_per_unit, waste_percentage)| Ingredient {
            id: format!("i-{name}"),
            name,
            gross_weight,
            price_per_unit,
            waste_percentage,
        },
    );
    keyed((
        text(),
        vec(ingredient, 0..3),
        amount(),
        0u32..10,
        amount(),
        author_meta(),
    ))
    .prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(k, (supplier, ingredients, portion_weight, portions, multiplier, meta))| {
                    let mut costing = Costing {
                        dish_id: format!("d{k}"),
                        supplier,
                        date: String::new(),
                        ingredients,
                        portion_weight,
                        portions,
                        multiplier,
                        total_cost: 0.0,
                        meta,
                    };
                    costing.recompute();
                    costing
                })
                .collect()
        },
    )
}

pub fn arb_evaluations() -> impl Strategy<Value = Vec<Evaluation>> {
    btree_map((0u8..3, 0u8..3), (-1i8..=1, text()), 0..4).prop_map(|entries| {
        entries
            .into_iter()
            .map(|((from, to), (score, comment))| Evaluation {
                evaluator: format!("m{from}"),
                target_member: format!("m{to}"),
                score,
                comment,
            })
            .collect()
    })
}

pub fn arb_checklists() -> impl Strategy<Value = BTreeMap<u8, IndividualChecklist>> {
    keyed((any::<bool>(), any::<bool>(), any::<bool>())).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, (reviewed_research, reviewed_dishes, defense_prep))| {
                (
                    k,
                    IndividualChecklist {
                        reviewed_research,
                        reviewed_dishes,
                        defense_prep,
                    },
                )
            })
            .collect()
    })
}

/// Arbitrary valid document; all collections have unique identities
pub fn arb_document() -> impl Strategy<Value = Document> {
    (
        (arb_meta(), arb_members(), text(), text()),
        (arb_trends(), arb_canvas(), arb_dishes()),
        (text(), text(), arb_timeline(), arb_costings()),
        (text(), text(), arb_evaluations(), arb_checklists(), any::<bool>()),
    )
        .prop_map(
            |(
                (meta, members, justification, target_audience),
                (trends, canvas, dishes),
                (intro_text, objectives_text, timeline, costings),
                (introduction, conclusions, evaluations, checklists, presented),
            )| {
                let mut doc = Document::new("p1");
                doc.meta = meta;
                doc.members = members;
                doc.phase1.justification = justification;
                doc.phase1.target_audience = target_audience;
                doc.phase2.trends = trends;
                doc.phase2.canvas = canvas;
                doc.phase3.dishes = dishes;
                doc.phase4.intro_text = intro_text;
                doc.phase4.objectives_text = objectives_text;
                doc.phase4.timeline = timeline;
                doc.phase5.costings = costings;
                doc.phase6.introduction = introduction;
                doc.phase6.conclusions = conclusions;
                doc.phase6.evaluations = evaluations;
                doc.phase6.presentation_uploaded = presented;
                doc.phase6.individual_checklists = checklists
                    .into_iter()
                    .map(|(k, checklist)| (format!("m{k}"), checklist))
                    .collect();
                doc
            },
        )
}
