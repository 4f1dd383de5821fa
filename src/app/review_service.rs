//! The review service.
//!
//! Sits between the transport layer (HTTP handlers, the CSV loader) and the persistence
//! gateway. It turns validated requests into statements through the query builder, keeps
//! `country_code` in step with `country`, and makes batch inserts all-or-nothing.

use crate::domain::condition::{ColumnUpdate, Condition, QueryInput, Scalar};
use crate::domain::country::{CountryLookup, CountryTable};
use crate::domain::model::{ModelRegistry, REVIEWS_TABLE, REVIEW_INSERT_COLUMNS};
use crate::domain::review::{Review, ReviewInput};
use crate::error::{ServiceError, StoreError, ValidationError};
use crate::etl::cleaning::CleanRow;
use crate::query::builder::{
    build_delete, build_insert, build_select, build_update_with_derived,
};
use crate::storage::gateway::{Gateway, Record};
use std::sync::Arc;
use tracing::info;

pub struct ReviewService {
    gateway: Gateway,
    registry: Arc<ModelRegistry>,
    countries: Arc<dyn CountryLookup>,
}

impl ReviewService {
    pub fn new(
        gateway: Gateway,
        registry: Arc<ModelRegistry>,
        countries: Arc<dyn CountryLookup>,
    ) -> Self {
        Self {
            gateway,
            registry,
            countries,
        }
    }

    /// Connects with the default registry and country table and creates missing tables.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let gateway = Gateway::connect(database_url, max_connections).await?;
        let service = Self::new(
            gateway,
            Arc::new(ModelRegistry::with_reviews()),
            Arc::new(CountryTable::builtin()),
        );
        service.create_tables().await?;
        Ok(service)
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn countries(&self) -> &dyn CountryLookup {
        self.countries.as_ref()
    }

    /// Runs `CREATE TABLE IF NOT EXISTS` for every registered model.
    pub async fn create_tables(&self) -> Result<(), StoreError> {
        for sql in self.registry.get_all_create_table_sql() {
            self.gateway.execute_script(sql).await?;
        }
        info!(target: "database", tables = ?self.registry.list_models(), "tables ready");
        Ok(())
    }

    /// Validates every review, then inserts them in one transaction.
    ///
    /// A single invalid review rejects the whole batch before anything is written. Returns
    /// the generated ids in input order.
    pub async fn insert_reviews(&self, inputs: Vec<ReviewInput>) -> Result<Vec<i64>, ServiceError> {
        let reviews = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                Review::new(input, self.countries.as_ref()).map_err(|e| ValidationError::InBatch {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows: Vec<Vec<Scalar>> = reviews.iter().map(Review::insert_params).collect();
        self.insert_rows(&rows).await
    }

    /// Inserts rows produced by the cleaning pipeline in one transaction.
    pub async fn insert_cleaned(&self, rows: &[CleanRow]) -> Result<Vec<i64>, ServiceError> {
        let rows: Vec<Vec<Scalar>> = rows.iter().map(CleanRow::insert_params).collect();
        self.insert_rows(&rows).await
    }

    async fn insert_rows(&self, rows: &[Vec<Scalar>]) -> Result<Vec<i64>, ServiceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let sql = build_insert(&self.registry, REVIEWS_TABLE, REVIEW_INSERT_COLUMNS)?;
        let ids = self.gateway.insert_many(&sql, rows).await?;
        info!(target: "database", "inserted {} reviews", ids.len());
        Ok(ids)
    }

    pub async fn select(&self, input: &QueryInput) -> Result<Vec<Record>, ServiceError> {
        let statement = build_select(&self.registry, input)?;
        Ok(self.gateway.select(&statement).await?)
    }

    pub async fn select_all(&self) -> Result<Vec<Record>, ServiceError> {
        self.select(&QueryInput::all(REVIEWS_TABLE)).await
    }

    /// Updates every review matching `conditions`. No conditions updates every row.
    ///
    /// A new `country` is resolved to its canonical name and `country_code` is rewritten
    /// with it. An unresolvable country rejects the update.
    pub async fn update(
        &self,
        conditions: &[Condition],
        updates: Vec<ColumnUpdate>,
    ) -> Result<u64, ServiceError> {
        let mut derived = Vec::new();
        let mut resolved = Vec::with_capacity(updates.len());
        for update in updates {
            match (update.column.as_str(), &update.value) {
                ("country", Scalar::Text(raw)) => {
                    let country = self
                        .countries
                        .resolve(raw)
                        .ok_or_else(|| ValidationError::UnknownCountry(raw.clone()))?;
                    derived.push(ColumnUpdate::new("country_code", country.iso3));
                    resolved.push(ColumnUpdate::new("country", country.name));
                }
                _ => resolved.push(update),
            }
        }

        let statement =
            build_update_with_derived(&self.registry, REVIEWS_TABLE, conditions, &resolved, &derived)?;
        let updated = self.gateway.update(&statement).await?;
        info!(target: "database", "updated {} reviews", updated);
        Ok(updated)
    }

    /// Deletes every review matching `conditions`. No conditions deletes every row.
    pub async fn delete(&self, conditions: &[Condition]) -> Result<u64, ServiceError> {
        let statement = build_delete(&self.registry, REVIEWS_TABLE, conditions)?;
        let deleted = self.gateway.delete(&statement).await?;
        info!(target: "database", "deleted {} reviews", deleted);
        Ok(deleted)
    }

    pub async fn truncate(&self) -> Result<u64, ServiceError> {
        self.delete(&[]).await
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.gateway.ping().await
    }
}
