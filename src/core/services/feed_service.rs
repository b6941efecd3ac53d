use once_cell::sync::Lazy;
use regex::Regex;

use crate::advisory::FormulationRequest;
use crate::ledger::{default_ingredients, AnimalPhase, Ingredient};

use super::{ServiceError, ServiceResult};

/// `<name> <price>` or `<name>: <price>`, price with a dot or comma.
static QUICK_PRICE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z\s]+)[\s:]+([0-9]+[.,][0-9]+)").expect("quick price pattern compiles")
});

pub struct FeedService;

impl FeedService {
    /// Price per kilogram of a commercial feed bag, 0 for a weightless bag.
    pub fn commercial_price_per_kg(bag_price: f64, bag_weight_kg: f64) -> f64 {
        if bag_weight_kg > 0.0 {
            bag_price / bag_weight_kg
        } else {
            0.0
        }
    }

    /// Applies pasted price lines such as `Milho 1,50`. Each recognised line
    /// updates the first ingredient whose name contains the typed name (or
    /// is contained in it), else adds a new ingredient. Returns how many
    /// lines were applied.
    pub fn apply_quick_input(ingredients: &mut Vec<Ingredient>, input: &str) -> usize {
        let mut applied = 0;
        for line in input.lines() {
            let Some(captures) = QUICK_PRICE_LINE.captures(line) else {
                continue;
            };
            let name = captures[1].trim();
            if name.is_empty() {
                continue;
            }
            let Ok(price) = captures[2].replace(',', ".").parse::<f64>() else {
                continue;
            };
            let typed = name.to_lowercase();
            let existing = ingredients.iter_mut().find(|ingredient| {
                let known = ingredient.name.to_lowercase();
                known.contains(&typed) || typed.contains(&known)
            });
            match existing {
                Some(ingredient) => ingredient.price_per_kg = price,
                None => ingredients.push(Ingredient::new(name, price)),
            }
            applied += 1;
        }
        applied
    }

    /// Sets the price of the ingredient matching `name` case-insensitively,
    /// adding it when unknown.
    pub fn set_price(ingredients: &mut Vec<Ingredient>, name: &str, price: f64) -> ServiceResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("Ingredient name is required".into()));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(ServiceError::Invalid(format!(
                "Price per kg must not be negative (got {price})"
            )));
        }
        let lowered = name.to_lowercase();
        match ingredients
            .iter_mut()
            .find(|ingredient| ingredient.name.to_lowercase() == lowered)
        {
            Some(ingredient) => ingredient.price_per_kg = price,
            None => ingredients.push(Ingredient::new(name, price)),
        }
        Ok(())
    }

    pub fn reset(ingredients: &mut Vec<Ingredient>) {
        *ingredients = default_ingredients();
    }

    pub fn formulation_request(ingredients: &[Ingredient], phase: AnimalPhase) -> FormulationRequest {
        FormulationRequest {
            ingredients: ingredients.to_vec(),
            phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_of(ingredients: &[Ingredient], name: &str) -> f64 {
        ingredients
            .iter()
            .find(|ingredient| ingredient.name == name)
            .map(|ingredient| ingredient.price_per_kg)
            .unwrap()
    }

    #[test]
    fn commercial_price_guards_zero_weight() {
        assert_eq!(FeedService::commercial_price_per_kg(120.0, 0.0), 0.0);
        assert_eq!(FeedService::commercial_price_per_kg(120.0, 40.0), 3.0);
    }

    #[test]
    fn quick_input_updates_by_partial_name() {
        let mut ingredients = default_ingredients();
        let applied = FeedService::apply_quick_input(&mut ingredients, "Milho 1,50\nFarelo de Soja: 3.10");
        assert_eq!(applied, 2);
        assert_eq!(price_of(&ingredients, "Milho Grão"), 1.50);
        assert_eq!(price_of(&ingredients, "Farelo de Soja"), 3.10);
        assert_eq!(ingredients.len(), 5);
    }

    #[test]
    fn unknown_names_are_appended_and_noise_is_skipped() {
        let mut ingredients = default_ingredients();
        let applied = FeedService::apply_quick_input(&mut ingredients, "Trigo 0.95\nsem preço\n12");
        assert_eq!(applied, 1);
        assert_eq!(ingredients.len(), 6);
        assert_eq!(price_of(&ingredients, "Trigo"), 0.95);
    }

    #[test]
    fn unparseable_input_applies_nothing() {
        let mut ingredients = default_ingredients();
        assert_eq!(FeedService::apply_quick_input(&mut ingredients, "Milho 2"), 0);
    }

    #[test]
    fn set_price_matches_case_insensitively() {
        let mut ingredients = default_ingredients();
        FeedService::set_price(&mut ingredients, "sal comum", 1.1).unwrap();
        assert_eq!(price_of(&ingredients, "Sal Comum"), 1.1);
        assert!(FeedService::set_price(&mut ingredients, "Sal Comum", -1.0).is_err());
    }
}
