//! The module contains the parts catalog. Every part carries the price the
//! workshop pays for it and the price it is sold at, so budgets can be
//! derived from a project's part list alone.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MoneyCents, ResultEngine, budget::margin_percent, error::EngineError};

/// The categories a part can belong to.
pub const CATEGORIES: [&str; 7] = [
    "Madeira",
    "Ferragem",
    "Acessório",
    "Consumível",
    "Químico",
    "Acabamento",
    "Outros",
];

/// A material or hardware piece the workshop keeps on its price list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub name: String,
    /// What the workshop pays per unit.
    pub purchase_price: MoneyCents,
    /// What the customer is charged per unit.
    pub price: MoneyCents,
    pub category: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Part {
    pub fn new(
        name: String,
        purchase_price: MoneyCents,
        price: MoneyCents,
        category: String,
        unit: String,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            purchase_price,
            price,
            category,
            unit,
            image_url,
        }
    }

    pub fn unit_profit(&self) -> MoneyCents {
        self.price - self.purchase_price
    }

    /// Margin of a single unit, as a percentage of its sale price.
    pub fn unit_margin_percent(&self) -> f64 {
        margin_percent(self.unit_profit(), self.price)
    }
}

/// Anything that can resolve a part id to a part.
///
/// Budgets are computed against a lookup rather than the [`Catalog`] itself,
/// so a plain slice of parts works too.
pub trait PartLookup {
    fn part(&self, id: &str) -> Option<&Part>;
}

impl PartLookup for [Part] {
    fn part(&self, id: &str) -> Option<&Part> {
        self.iter().find(|part| part.id == id)
    }
}

/// The workshop's price list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    parts: Vec<Part>,
}

impl Catalog {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Builds the catalog a fresh installation starts with.
    pub fn seeded() -> Self {
        Self {
            parts: default_parts(),
        }
    }

    /// Reads a catalog from `path`, falling back to the seeded one when the
    /// file does not exist yet.
    pub fn load(path: &Path) -> ResultEngine<Self> {
        if !path.exists() {
            return Ok(Self::seeded());
        }
        let raw = std::fs::read_to_string(path)?;
        let parts: Vec<Part> = serde_json::from_str(&raw)?;
        Ok(Self { parts })
    }

    /// Writes the whole catalog to `path`, creating parent directories on
    /// first save.
    pub fn save(&self, path: &Path) -> ResultEngine<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.parts)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn add(&mut self, part: Part) -> ResultEngine<()> {
        if self.parts.iter().any(|existing| existing.id == part.id) {
            return Err(EngineError::ExistingKey(part.id));
        }
        self.parts.push(part);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> ResultEngine<Part> {
        match self.parts.iter().position(|part| part.id == id) {
            Some(index) => Ok(self.parts.remove(index)),
            None => Err(EngineError::KeyNotFound(id.to_string())),
        }
    }

    /// The parts in insertion order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl PartLookup for Catalog {
    fn part(&self, id: &str) -> Option<&Part> {
        self.parts.part(id)
    }
}

/// The price list new installations start with.
pub fn default_parts() -> Vec<Part> {
    let seed = |id: &str, name: &str, purchase: i64, price: i64, category: &str, unit: &str| Part {
        id: id.to_string(),
        name: name.to_string(),
        purchase_price: MoneyCents::cents(purchase),
        price: MoneyCents::cents(price),
        category: category.to_string(),
        unit: unit.to_string(),
        image_url: None,
    };

    vec![
        seed("1", "Placa MDF 18mm Branca", 4500, 8550, "Madeira", "un"),
        seed("2", "Dobradiça Caneco 35mm", 180, 420, "Ferragem", "un"),
        seed("3", "Puxador Alumínio 128mm", 250, 650, "Acessório", "un"),
        seed("4", "Corrediça Telescópica 450mm", 550, 1280, "Ferragem", "par"),
        seed("5", "Parafuso 4.0x40 (Cento)", 320, 800, "Consumível", "cento"),
        seed("6", "Cola de Contato 1L", 1200, 2250, "Químico", "un"),
        seed("7", "Fita de Borda PVC 22mm (Metro)", 45, 115, "Acabamento", "m"),
    ]
}
