//! Glossary entries that can be attached to survivors.

use crate::constants::DISORDER_SLOTS;
use crate::draft::DisorderSlots;
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disorder {
    pub id: String,
    pub name: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_text: Option<String>,
    pub effect: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightingArt {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub secret: bool,
    pub source: String,
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Glossary {
    #[serde(default)]
    pub disorders: Vec<Disorder>,
    #[serde(default)]
    pub fighting_arts: Vec<FightingArt>,
}

impl Glossary {
    /// Looks up a disorder by id.
    pub fn disorder(&self, id: &str) -> Option<&Disorder> {
        self.disorders.iter().find(|d| d.id == id)
    }

    /// Disorders that may be picked for `slot`.
    ///
    /// Anything chosen in a sibling slot is excluded; the slot's own current value stays
    /// available. A non-empty `query` further filters by case-insensitive name match.
    pub fn selectable_disorders(
        &self,
        slots: &DisorderSlots,
        slot: usize,
        query: &str,
    ) -> CoreResult<Vec<&Disorder>> {
        if slot >= DISORDER_SLOTS {
            return Err(CoreError::SlotOutOfRange {
                slot,
                max: DISORDER_SLOTS,
            });
        }

        let current = slots.get(slot);
        let excluded: BTreeSet<&str> = slots
            .iter()
            .flatten()
            .filter(|id| Some(*id) != current)
            .collect();
        let query = query.trim().to_lowercase();

        Ok(self
            .disorders
            .iter()
            .filter(|d| !excluded.contains(d.id.as_str()))
            .filter(|d| query.is_empty() || d.name.to_lowercase().contains(&query))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disorder(id: &str, name: &str) -> Disorder {
        Disorder {
            id: id.into(),
            name: name.into(),
            source: "Core Game".into(),
            flavor_text: None,
            effect: String::new(),
        }
    }

    fn glossary() -> Glossary {
        Glossary {
            disorders: vec![
                disorder("d-1", "Anxiety"),
                disorder("d-2", "Fear of the Dark"),
                disorder("d-3", "Hoarder"),
            ],
            fighting_arts: vec![],
        }
    }

    fn slots(values: &[&str]) -> DisorderSlots {
        let list: Vec<String> = values.iter().map(|s| s.to_string()).collect();
        DisorderSlots::from_list(&list)
    }

    fn ids(found: Vec<&Disorder>) -> Vec<&str> {
        found.into_iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_sibling_choices_are_excluded() {
        let g = glossary();
        let chosen = slots(&["d-1", "d-2"]);

        let options = g.selectable_disorders(&chosen, 2, "").unwrap();
        assert_eq!(ids(options), vec!["d-3"]);
    }

    #[test]
    fn test_own_value_stays_selectable() {
        let g = glossary();
        let chosen = slots(&["d-1", "d-2"]);

        let options = g.selectable_disorders(&chosen, 0, "").unwrap();
        assert_eq!(ids(options), vec!["d-1", "d-3"]);
    }

    #[test]
    fn test_query_filters_by_name() {
        let g = glossary();
        let options = g
            .selectable_disorders(&DisorderSlots::default(), 0, "DARK")
            .unwrap();
        assert_eq!(ids(options), vec!["d-2"]);
    }

    #[test]
    fn test_out_of_range_slot() {
        let g = glossary();
        assert!(g
            .selectable_disorders(&DisorderSlots::default(), 5, "")
            .is_err());
    }

    #[test]
    fn test_deserializes_api_glossary() {
        let g: Glossary = serde_json::from_str(
            r#"{
                "disorders": [{"id": "d-1", "name": "Anxiety", "source": "Core", "effect": "..."}],
                "fightingArts": [{"id": "f-1", "name": "Tough", "secret": false, "source": "Core", "text": ["a"]}]
            }"#,
        )
        .unwrap();
        assert_eq!(g.disorder("d-1").map(|d| d.name.as_str()), Some("Anxiety"));
        assert_eq!(g.fighting_arts.len(), 1);
    }
}
