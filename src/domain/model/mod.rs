//! Table models: the allow-list of identifiers that may appear in generated SQL.

use crate::domain::condition::ColumnUpdate;
use crate::error::ValidationError;

pub mod registry;
pub mod review;

pub use registry::ModelRegistry;
pub use review::{ReviewsModel, REVIEWS_TABLE, REVIEW_INSERT_COLUMNS};

/// Storage type of a column, also used as the expected type during CSV cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Date,
}

/// One allow-listed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Whether clients may set this column through an UPDATE.
    pub updatable: bool,
}

impl ColumnDef {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            updatable: true,
        }
    }

    pub const fn read_only(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            updatable: false,
        }
    }
}

/// Contract for any table the service may touch.
///
/// Table and column names are interpolated into SQL text, so only names returned by a
/// registered model are ever accepted by the query builder.
pub trait TableModel: Send + Sync {
    /// Returns the name of the database table for this model.
    fn table_name(&self) -> &str;

    /// Returns the name of the primary key field for this model.
    fn primary_key_field(&self) -> &str;

    /// Returns the `CREATE TABLE IF NOT EXISTS` statement for this model.
    fn get_create_table_sql(&self) -> &str;

    /// All columns of the table, in storage order.
    fn columns(&self) -> &[ColumnDef];

    fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns().iter().find(|c| c.name == name)
    }

    fn column_type(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(|c| c.kind)
    }

    /// Returns the column definition or an allow-list error.
    fn require_column(&self, name: &str) -> Result<&ColumnDef, ValidationError> {
        self.column(name).ok_or_else(|| ValidationError::UnknownColumn {
            table: self.table_name().to_string(),
            column: name.to_string(),
        })
    }

    /// Validates a new column value before an UPDATE is built and returns it in the shape
    /// it is stored in.
    ///
    /// Default implementation only checks that the column exists and is updatable.
    fn validate_update(&self, update: ColumnUpdate) -> Result<ColumnUpdate, ValidationError> {
        let def = self.require_column(&update.column)?;
        if !def.updatable {
            return Err(ValidationError::ReadOnlyColumn {
                table: self.table_name().to_string(),
                column: update.column,
            });
        }
        Ok(update)
    }
}
