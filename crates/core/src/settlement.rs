use crate::reconcile::Keyed;
use datamonster_types::SettlementName;
use serde::{Deserialize, Serialize};

/// A settlement as returned by the settlement API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub survival_limit: i32,
    #[serde(default)]
    pub departing_survival: i32,
    #[serde(default)]
    pub collective_cognition: i32,
    #[serde(default)]
    pub current_year: i32,
}

impl Settlement {
    /// Local stand-in shown while a create is in flight.
    pub fn provisional(name: &SettlementName) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            survival_limit: 0,
            departing_survival: 0,
            collective_cognition: 0,
            current_year: 0,
        }
    }
}

impl Keyed for Settlement {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Body of `POST /api/settlements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSettlement {
    pub name: SettlementName,
}
