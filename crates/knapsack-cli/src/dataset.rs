use std::path::Path;

use knapsack_ga::{
    catalog::{Catalog, Item},
    config::{Config, EvolutionOptions},
};
use serde::{Deserialize, Serialize};

use crate::util;

/// A problem instance as stored on disk.
///
/// `options` may be omitted, fully or per field; missing values take the
/// defaults of [`EvolutionOptions`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    /// Weight ceiling of the knapsack
    #[serde(alias = "weight_ceiling")]
    pub expected_weight: f64,
    #[serde(default)]
    pub options: EvolutionOptions,
    pub items: Vec<Item>,
}

impl Dataset {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("dataset", path)
    }

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.items.clone())
    }

    #[must_use]
    pub fn config(&self) -> Config {
        Config::new(self.expected_weight, self.options)
    }
}
