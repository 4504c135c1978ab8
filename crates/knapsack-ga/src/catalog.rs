use serde::{Deserialize, Serialize};

/// A candidate item for the knapsack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    pub name: String,
    /// Fitness contributed when the item is included.
    #[serde(alias = "value")]
    pub fitness: i64,
    pub weight: f64,
}

impl Item {
    #[must_use]
    pub fn new<S>(name: S, fitness: i64, weight: f64) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fitness,
            weight,
        }
    }
}

/// Immutable, ordered list of items.
///
/// Gene `i` of every individual refers to `items()[i]`, so the catalog
/// length is the gene count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter()
    }
}

impl FromIterator<Item> for Catalog {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        Self::new(iter.into_iter().collect())
    }
}
