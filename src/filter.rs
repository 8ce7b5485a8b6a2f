//! HP range filtering and ordering of normalized cards.

use crate::card::CardRecord;
use crate::error::RangeSpecError;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::warn;

lazy_static! {
    static ref RANGE_RE: Regex = Regex::new(r"^\s*(-?\d+)\s*-\s*(-?\d+)\s*$").unwrap();
}

/// Inclusive HP interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub min: i64,
    pub max: i64,
}

impl RangeSpec {
    /// Parses `"{min}-{max}"`.
    pub fn parse(input: &str) -> Result<RangeSpec, RangeSpecError> {
        let invalid = || RangeSpecError {
            input: input.to_string(),
        };
        let caps = RANGE_RE.captures(input).ok_or_else(invalid)?;
        let min = caps[1].parse().map_err(|_| invalid())?;
        let max = caps[2].parse().map_err(|_| invalid())?;
        Ok(RangeSpec { min, max })
    }

    pub fn contains(&self, hp: i64) -> bool {
        self.min <= hp && hp <= self.max
    }
}

impl FromStr for RangeSpec {
    type Err = RangeSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeSpec::parse(s)
    }
}

/// Keeps the records whose `hp` lies in `spec`.
///
/// An empty or malformed spec leaves the records untouched.
pub fn apply_range_filter(records: Vec<CardRecord>, spec: &str) -> Vec<CardRecord> {
    if spec.trim().is_empty() {
        return records;
    }
    match RangeSpec::parse(spec) {
        Ok(range) => filter_hp(records, range),
        Err(e) => {
            warn!(range = spec, "Ignoring range filter: {}", e);
            records
        }
    }
}

pub fn filter_hp(records: Vec<CardRecord>, range: RangeSpec) -> Vec<CardRecord> {
    records
        .into_iter()
        .filter(|card| range.contains(card.hp))
        .collect()
}

/// Field a card list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    #[default]
    Name,
    Set,
    Number,
    Type,
    Cost,
    Power,
    Hp,
    Rarity,
    Artist,
    Id,
}

impl SortKey {
    pub const ALL: [SortKey; 10] = [
        SortKey::Name,
        SortKey::Set,
        SortKey::Number,
        SortKey::Type,
        SortKey::Cost,
        SortKey::Power,
        SortKey::Hp,
        SortKey::Rarity,
        SortKey::Artist,
        SortKey::Id,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Set => "Set",
            SortKey::Number => "Number",
            SortKey::Type => "Type",
            SortKey::Cost => "Cost",
            SortKey::Power => "Power",
            SortKey::Hp => "HP",
            SortKey::Rarity => "Rarity",
            SortKey::Artist => "Artist",
            SortKey::Id => "Id",
        }
    }

    fn compare(&self, a: &CardRecord, b: &CardRecord) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Set => a.set_code.cmp(&b.set_code),
            SortKey::Number => a.number.cmp(&b.number),
            SortKey::Type => a.card_type.cmp(&b.card_type),
            SortKey::Cost => a.cost.cmp(&b.cost),
            SortKey::Power => a.power.cmp(&b.power),
            SortKey::Hp => a.hp.cmp(&b.hp),
            SortKey::Rarity => a.rarity.cmp(&b.rarity),
            SortKey::Artist => a.artist.cmp(&b.artist),
            SortKey::Id => a.id.cmp(&b.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort on one key. Equal keys keep their input order in both
/// directions.
pub fn sort_by(
    mut records: Vec<CardRecord>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<CardRecord> {
    records.sort_by(|a, b| ordered(key, direction, a, b));
    records
}

fn ordered(key: SortKey, direction: SortDirection, a: &CardRecord, b: &CardRecord) -> Ordering {
    match direction {
        SortDirection::Ascending => key.compare(a, b),
        SortDirection::Descending => key.compare(b, a),
    }
}

/// A fetched result set that can be re-sorted any number of times.
///
/// The records stay in the order they were fetched; every call to
/// [`CardView::sorted`] starts from that order.
#[derive(Debug, Clone, Default)]
pub struct CardView {
    records: Vec<CardRecord>,
}

impl CardView {
    pub fn new(records: Vec<CardRecord>) -> Self {
        CardView { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CardRecord] {
        &self.records
    }

    pub fn sorted(&self, key: SortKey, direction: SortDirection) -> Vec<&CardRecord> {
        let mut view: Vec<&CardRecord> = self.records.iter().collect();
        view.sort_by(|a, b| ordered(key, direction, a, b));
        view
    }
}
