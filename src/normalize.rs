//! Mapping of untrusted upstream records onto [`CardRecord`].

use crate::card::{CardRecord, RawCard};
use std::collections::BTreeSet;

const PLACEHOLDER_ART: &str = "https://via.placeholder.com/150";

/// Normalizes one upstream record. `index` is the record's position in its
/// batch and keeps placeholder names and ids apart. Never fails.
pub fn normalize(raw: RawCard, index: usize) -> CardRecord {
    let id = format!(
        "{}-{}",
        present(&raw.set).unwrap_or("unknown-set"),
        present(&raw.number)
            .map(str::to_string)
            .unwrap_or_else(|| format!("unknown-number-{}", index)),
    );

    CardRecord {
        set_code: or_placeholder(raw.set, || "Unknown Set".to_string()),
        number: or_placeholder(raw.number, || format!("Unknown Number {}", index)),
        name: or_placeholder(raw.name, || format!("Unnamed Card {}", index)),
        card_type: or_placeholder(raw.card_type, || "Unknown Type".to_string()),
        aspects: to_set(raw.aspects),
        traits: to_set(raw.traits),
        arenas: to_set(raw.arenas),
        cost: parse_int(raw.cost.as_deref()),
        power: parse_int(raw.power.as_deref()),
        hp: parse_int(raw.hp.as_deref()),
        front_text: or_placeholder(raw.front_text, || "No description available.".to_string()),
        is_double_sided: raw.double_sided.unwrap_or(false),
        rarity: or_placeholder(raw.rarity, || "Common".to_string()),
        is_unique: raw.unique.unwrap_or(false),
        artist: or_placeholder(raw.artist, || "Unknown Artist".to_string()),
        variant_type: or_placeholder(raw.variant_type, || "None".to_string()),
        market_price: or_placeholder(raw.market_price, || "N/A".to_string()),
        foil_price: or_placeholder(raw.foil_price, || "N/A".to_string()),
        front_art_url: or_placeholder(raw.front_art, || PLACEHOLDER_ART.to_string()),
        id,
    }
}

/// Normalizes a whole batch, keeping upstream order.
pub fn normalize_all(raws: Vec<RawCard>) -> Vec<CardRecord> {
    raws.into_iter()
        .enumerate()
        .map(|(index, raw)| normalize(raw, index))
        .collect()
}

/// Base-10 integer prefix of `input`, `0` when there is none.
///
/// Leading whitespace and one sign are accepted and anything after the
/// digits is ignored, so `"12*"` reads as 12. Values that overflow read as 0.
pub fn parse_int(input: Option<&str>) -> i64 {
    let Some(s) = input else { return 0 };
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return 0;
    }
    match rest[..digits_end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => 0,
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn or_placeholder(field: Option<String>, placeholder: impl FnOnce() -> String) -> String {
    field.filter(|s| !s.is_empty()).unwrap_or_else(placeholder)
}

fn to_set(field: Option<Vec<String>>) -> BTreeSet<String> {
    field.unwrap_or_default().into_iter().collect()
}
