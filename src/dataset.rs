use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Contents of a json-server style database file.
///
/// Collections are kept as the JSON they were stored as, so the proxy hands
/// them back without reshaping. A broken collection only affects the
/// endpoint that reads it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Dataset {
    collections: Map<String, Value>,
}

/// Which cards a `/cards/search` request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFilter {
    /// No `Catalog` parameter, or an empty one.
    All,
    /// Cards whose `Catalog` is exactly this string.
    Exact(String),
    /// A parameter no card can equal, such as a repeated `Catalog`.
    Nothing,
}

impl CatalogFilter {
    /// Builds the filter from every `Catalog` value in the query string.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut values = values.into_iter();
        match (values.next(), values.next()) {
            (None, _) => CatalogFilter::All,
            (Some(value), None) if value.is_empty() => CatalogFilter::All,
            (Some(value), None) => CatalogFilter::Exact(value),
            _ => CatalogFilter::Nothing,
        }
    }

    fn matches(&self, card: &Value) -> bool {
        match self {
            CatalogFilter::All => true,
            CatalogFilter::Exact(wanted) => match card.get("Catalog") {
                Some(Value::String(catalog)) => catalog == wanted,
                _ => false,
            },
            CatalogFilter::Nothing => false,
        }
    }
}

impl Dataset {
    pub fn new(collections: Map<String, Value>) -> Self {
        Dataset { collections }
    }

    /// The `catalog` collection as stored. A missing collection is empty.
    pub fn catalog(&self) -> Result<Vec<Value>, StoreError> {
        self.collection("catalog")
    }

    /// Cards picked by `filter`, unchanged and in stored order. Matching is
    /// exact and case-sensitive on the `Catalog` string.
    pub fn cards_in(&self, filter: &CatalogFilter) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collection("cards")?
            .into_iter()
            .filter(|card| filter.matches(card))
            .collect())
    }

    fn collection(&self, name: &str) -> Result<Vec<Value>, StoreError> {
        match self.collections.get(name) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(_) => Err(StoreError::Shape(format!("`{}` is not an array", name))),
        }
    }
}

/// Read-only source of catalog entries and cards for the proxy.
pub trait CardStore: Send + Sync {
    /// A snapshot of the whole dataset.
    fn snapshot(&self) -> Result<Dataset, StoreError>;

    fn catalog(&self) -> Result<Vec<Value>, StoreError> {
        self.snapshot()?.catalog()
    }

    fn cards(&self, filter: &CatalogFilter) -> Result<Vec<Value>, StoreError> {
        self.snapshot()?.cards_in(filter)
    }
}

/// Dataset file that is read again for every request, so edits show up
/// without a restart.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CardStore for FileStore {
    fn snapshot(&self) -> Result<Dataset, StoreError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Fixed in-memory dataset.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    dataset: Dataset,
}

impl MemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        MemoryStore { dataset }
    }
}

impl CardStore for MemoryStore {
    fn snapshot(&self) -> Result<Dataset, StoreError> {
        Ok(self.dataset.clone())
    }

    fn catalog(&self) -> Result<Vec<Value>, StoreError> {
        self.dataset.catalog()
    }

    fn cards(&self, filter: &CatalogFilter) -> Result<Vec<Value>, StoreError> {
        self.dataset.cards_in(filter)
    }
}
