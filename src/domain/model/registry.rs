//! ModelRegistry for mapping table names to TableModel implementations.

use crate::domain::model::{ReviewsModel, TableModel};
use crate::error::ValidationError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A registry that maps table names to their TableModel implementations.
///
/// It is built once at startup and shared read-only; it never changes while serving.
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<dyn TableModel>>,
}

impl ModelRegistry {
    /// Creates a new empty ModelRegistry.
    pub fn new() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// Registry holding the tables served by the review API.
    pub fn with_reviews() -> Self {
        let mut registry = Self::new();
        registry.register(ReviewsModel);
        registry
    }

    /// Registers a model under its own table name.
    pub fn register<M: TableModel + 'static>(&mut self, model: M) {
        self.models
            .insert(model.table_name().to_string(), Arc::new(model));
    }

    /// Retrieves a model by table name.
    pub fn get(&self, table: &str) -> Option<Arc<dyn TableModel>> {
        self.models.get(table).cloned()
    }

    /// Like [`ModelRegistry::get`], but unknown tables are an allow-list violation.
    pub fn require(&self, table: &str) -> Result<Arc<dyn TableModel>, ValidationError> {
        self.get(table)
            .ok_or_else(|| ValidationError::UnknownTable(table.to_string()))
    }

    /// Returns all registered table names.
    pub fn list_models(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    /// Returns all CREATE TABLE statements for registered models.
    pub fn get_all_create_table_sql(&self) -> Vec<&str> {
        self.models
            .values()
            .map(|model| model.get_create_table_sql())
            .collect()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
