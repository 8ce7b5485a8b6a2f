use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A card as the upstream API ships it.
///
/// Every field is optional and tolerant of the wrong JSON type: a field that
/// cannot be read is treated as absent instead of failing the whole batch.
/// Fields the browser does not know about are kept in `extra`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RawCard {
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "Type",
        default,
        deserialize_with = "loose::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub card_type: Option<String>,
    #[serde(default, deserialize_with = "loose::strings", skip_serializing_if = "Option::is_none")]
    pub aspects: Option<Vec<String>>,
    #[serde(default, deserialize_with = "loose::strings", skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<String>>,
    #[serde(default, deserialize_with = "loose::strings", skip_serializing_if = "Option::is_none")]
    pub arenas: Option<Vec<String>>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(
        rename = "HP",
        default,
        deserialize_with = "loose::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub hp: Option<String>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub front_text: Option<String>,
    #[serde(default, deserialize_with = "loose::boolean", skip_serializing_if = "Option::is_none")]
    pub double_sided: Option<bool>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, deserialize_with = "loose::boolean", skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub variant_type: Option<String>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub market_price: Option<String>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub foil_price: Option<String>,
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub front_art: Option<String>,
    /// HP bucket the local dataset files the card under.
    #[serde(default, deserialize_with = "loose::string", skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawCard {
    /// Reads one element of an upstream `data` array. Anything that is not
    /// an object comes back as an empty record.
    pub fn from_value(value: Value) -> RawCard {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => RawCard::default(),
        }
    }
}

/// Canonical card handed to consumers. Built once by the normalizer and
/// never mutated afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub set_code: String,
    pub number: String,
    pub name: String,
    pub card_type: String,
    pub aspects: BTreeSet<String>,
    pub traits: BTreeSet<String>,
    pub arenas: BTreeSet<String>,
    pub cost: i64,
    pub power: i64,
    pub hp: i64,
    pub front_text: String,
    pub is_double_sided: bool,
    pub rarity: String,
    pub is_unique: bool,
    pub artist: String,
    pub variant_type: String,
    pub market_price: String,
    pub foil_price: String,
    pub front_art_url: String,
    pub id: String,
}

mod loose {
    use super::*;

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(scalar(value))
    }

    pub fn strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::String(s) if !s.is_empty() => Some(vec![s]),
            _ => None,
        })
    }

    pub fn boolean<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Bool(b) => Some(b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        })
    }

    fn scalar(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_capitalized_wire_names() {
        let raw: RawCard = serde_json::from_value(json!({
            "Set": "SOR",
            "Number": "010",
            "Name": "Darth Vader",
            "Type": "Leader",
            "Aspects": ["Aggression", "Villainy"],
            "HP": "8",
            "DoubleSided": true,
            "FrontArt": "https://cdn.example/sor-010.png",
            "Catalog": "8"
        }))
        .unwrap();

        assert_eq!(raw.set.as_deref(), Some("SOR"));
        assert_eq!(raw.card_type.as_deref(), Some("Leader"));
        assert_eq!(raw.hp.as_deref(), Some("8"));
        assert_eq!(raw.double_sided, Some(true));
        assert_eq!(raw.catalog.as_deref(), Some("8"));
        assert_eq!(
            raw.aspects,
            Some(vec!["Aggression".to_string(), "Villainy".to_string()])
        );
        assert!(raw.traits.is_none());
        assert!(raw.extra.is_empty());
    }

    #[test]
    fn wrong_types_become_absent_or_stringified() {
        let raw: RawCard = serde_json::from_value(json!({
            "Name": {"en": "Luke"},
            "Cost": 3,
            "Traits": ["Rebel", 7, null, "Jedi"],
            "Arenas": "Ground",
            "Unique": "TRUE",
            "DoubleSided": 1
        }))
        .unwrap();

        assert!(raw.name.is_none());
        assert_eq!(raw.cost.as_deref(), Some("3"));
        assert_eq!(raw.traits, Some(vec!["Rebel".into(), "Jedi".into()]));
        assert_eq!(raw.arenas, Some(vec!["Ground".into()]));
        assert_eq!(raw.unique, Some(true));
        assert_eq!(raw.double_sided, None);
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let input = json!({"Set": "SHD", "Keywords": ["Ambush"], "id": 4});
        let raw: RawCard = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(raw.extra.get("Keywords"), Some(&json!(["Ambush"])));
        assert_eq!(serde_json::to_value(&raw).unwrap(), input);
    }

    #[test]
    fn non_object_elements_read_as_empty() {
        assert_eq!(RawCard::from_value(json!("oops")), RawCard::default());
        assert_eq!(RawCard::from_value(json!(null)), RawCard::default());
    }
}
