//! Static reference catalogs

/// Gastronomic zones a team can choose from during setup
pub const ZONES: [&str; 7] = [
    "Altiplano (Jumilla, Yecla: wines, dryland produce)",
    "Noroeste (Caravaca, Cehegín, Moratalla: mountain, rural tourism)",
    "Río Mula y Valle de Ricote (Mula, Bullas, Ricote: orchards, fruit)",
    "Vega del Segura (Cieza, Molina de Segura, Alcantarilla: sustainable farming)",
    "Huerta de Murcia y Oriental (Murcia, Santomera, Beniel: urban public)",
    "Valle del Guadalentín (Lorca, Mazarrón, Águilas, Totana: rice, shellfish)",
    "Campo de Cartagena y Mar Menor (Cartagena, San Javier, San Pedro: fish, coastal tourism)",
];

/// Zone assigned when setup finishes without an explicit choice
#[must_use]
pub fn default_zone() -> &'static str {
    ZONES[0]
}

/// Sustainable development goal a dish can be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdgGoal {
    /// Id stored in `Dish::ods`
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
}

/// Goals offered when designing dishes
pub const SDG_GOALS: [SdgGoal; 10] = [
    SdgGoal { id: "1", label: "1. No Poverty" },
    SdgGoal { id: "2", label: "2. Zero Hunger" },
    SdgGoal { id: "3", label: "3. Good Health and Well-being" },
    SdgGoal { id: "4", label: "4. Quality Education" },
    SdgGoal { id: "5", label: "5. Gender Equality" },
    SdgGoal { id: "8", label: "8. Decent Work" },
    SdgGoal { id: "12", label: "12. Responsible Consumption and Production" },
    SdgGoal { id: "13", label: "13. Climate Action" },
    SdgGoal { id: "14", label: "14. Life Below Water" },
    SdgGoal { id: "15", label: "15. Life on Land" },
];

/// Look up a goal by id
#[must_use]
pub fn sdg_goal(id: &str) -> Option<&'static SdgGoal> {
    SDG_GOALS.iter().find(|goal| goal.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdg_lookup() {
        assert_eq!(sdg_goal("12").map(|g| g.label), Some("12. Responsible Consumption and Production"));
        assert!(sdg_goal("7").is_none());
    }

    #[test]
    fn default_zone_is_first() {
        assert_eq!(default_zone(), ZONES[0]);
    }
}
