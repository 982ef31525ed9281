//! Franchise Repository

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use shared::util::now_millis;

use super::{BaseRepository, FinanceError, FinanceResult};
use crate::db::models::{Franchise, FranchiseCreate, RateBand};

const TABLE: &str = "franchise";

#[derive(Clone)]
pub struct FranchiseRepository {
    base: BaseRepository,
}

impl FranchiseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> FinanceResult<RecordId> {
        // Accept both "franchise:centro" and the bare key "centro"
        if id.contains(':') {
            id.parse()
                .map_err(|_| FinanceError::validation("id", format!("Invalid ID: {id}")))
        } else {
            Ok(RecordId::from_table_key(TABLE, id))
        }
    }

    pub async fn find_all(&self) -> FinanceResult<Vec<Franchise>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) ORDER BY name ASC")
            .bind(("table", TABLE))
            .await?;
        let franchises: Vec<Franchise> = result.take(0)?;
        Ok(franchises)
    }

    pub async fn find_by_id(&self, id: &str) -> FinanceResult<Option<Franchise>> {
        let franchise: Option<Franchise> = self.base.db().select(Self::parse_id(id)?).await?;
        Ok(franchise)
    }

    /// Resolve a franchise's display name, `None` when unknown
    pub async fn display_name(&self, id: &str) -> FinanceResult<Option<String>> {
        Ok(self.find_by_id(id).await?.map(|f| f.name))
    }

    /// The logistics rate table in effect for a franchise
    ///
    /// Unknown franchises get the default table so dashboards keep
    /// rendering while master data catches up.
    pub async fn rate_table(&self, id: &str) -> FinanceResult<Vec<RateBand>> {
        Ok(self
            .find_by_id(id)
            .await?
            .map(|f| f.effective_rate_table())
            .unwrap_or_else(crate::db::models::default_rate_table))
    }

    pub async fn create(&self, data: FranchiseCreate) -> FinanceResult<Franchise> {
        let now = now_millis();
        let franchise = Franchise {
            id: None,
            name: data.name,
            city: data.city,
            contact_email: data.contact_email,
            rate_table: data.rate_table,
            active: true,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let mut doc = serde_json::to_value(&franchise)?;
        if let Some(map) = doc.as_object_mut() {
            map.remove("id");
        }

        let created: Option<Franchise> = self.base.db().create(TABLE).content(doc).await?;
        created.ok_or_else(|| FinanceError::unknown("Franchise create returned no document"))
    }

    /// Replace the configured rate table
    pub async fn update_rate_table(
        &self,
        id: &str,
        rate_table: Vec<RateBand>,
    ) -> FinanceResult<Franchise> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET rate_table = $rates, updated_at = $now, updatedAt = $now \
                 RETURN AFTER",
            )
            .bind(("id", Self::parse_id(id)?))
            .bind(("rates", serde_json::to_value(&rate_table)?))
            .bind(("now", now_millis()))
            .await?;

        let franchises: Vec<Franchise> = result.take(0)?;
        franchises
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::not_found(id, None))
    }
}
