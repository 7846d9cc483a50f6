//! Costing sheet arithmetic
//!
//! Ingredients are bought by gross weight; trim loss only reduces the usable
//! (net) weight, never the price paid.

use crate::document::{Costing, Ingredient};

impl Ingredient {
    /// Waste percentage clamped to 0..=100
    #[must_use]
    pub fn waste_ratio(&self) -> f64 {
        self.waste_percentage.clamp(0.0, 100.0) / 100.0
    }

    /// Usable weight after trim loss
    #[must_use]
    pub fn net_weight(&self) -> f64 {
        self.gross_weight * (1.0 - self.waste_ratio())
    }

    /// Purchase cost of the gross weight
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.gross_weight * self.price_per_unit
    }

    /// Effective price per usable kilogram, `None` when nothing is usable
    #[must_use]
    pub fn net_price(&self) -> Option<f64> {
        let net = self.net_weight();
        (net > 0.0).then(|| self.cost() / net)
    }
}

impl Costing {
    /// Sum of ingredient costs
    #[must_use]
    pub fn ingredients_cost(&self) -> f64 {
        self.ingredients.iter().map(Ingredient::cost).sum()
    }

    /// Refresh the stored total from the ingredient lines
    pub fn recompute(&mut self) {
        self.total_cost = self.ingredients_cost();
    }

    /// Cost of one portion, `None` when no portions are declared
    #[must_use]
    pub fn cost_per_portion(&self) -> Option<f64> {
        (self.portions > 0).then(|| self.total_cost / f64::from(self.portions))
    }

    /// Suggested sale price of one portion
    #[must_use]
    pub fn sale_price_per_portion(&self) -> Option<f64> {
        self.cost_per_portion().map(|cost| cost * self.multiplier)
    }
}
