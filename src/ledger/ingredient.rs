use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Feed ingredient with its purchase price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub price_per_kg: f64,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, price_per_kg: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price_per_kg,
        }
    }
}

pub fn default_ingredients() -> Vec<Ingredient> {
    vec![
        Ingredient::new("Milho Grão", 1.20),
        Ingredient::new("Farelo de Soja", 2.80),
        Ingredient::new("Núcleo Mineral/Vit.", 4.50),
        Ingredient::new("Calcário Calcítico", 0.60),
        Ingredient::new("Sal Comum", 0.90),
    ]
}
