//! [`LaboratoryStore`] backed by PostgreSQL.

use async_trait::async_trait;
use marie_core::error::CoreError;
use marie_core::laboratory::{CreateLaboratory, Laboratory, UpdateLaboratory};
use marie_core::store::{LaboratoryFilter, LaboratoryStore};
use marie_core::types::DbId;

use crate::error::map_db_error;
use crate::repositories::LaboratoryRepo;
use crate::DbPool;

/// Production store: every call goes through [`LaboratoryRepo`].
#[derive(Clone)]
pub struct PgLaboratoryStore {
    pool: DbPool,
}

impl PgLaboratoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LaboratoryStore for PgLaboratoryStore {
    async fn list(&self, filter: LaboratoryFilter) -> Result<Vec<Laboratory>, CoreError> {
        let rows = LaboratoryRepo::list(&self.pool, filter.active_only)
            .await
            .map_err(map_db_error)?;
        tracing::debug!(count = rows.len(), active_only = filter.active_only, "Listed laboratories");
        rows.into_iter().map(Laboratory::try_from).collect()
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Laboratory>, CoreError> {
        LaboratoryRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_db_error)?
            .map(Laboratory::try_from)
            .transpose()
    }

    async fn create(&self, input: &CreateLaboratory) -> Result<Laboratory, CoreError> {
        let row = LaboratoryRepo::create(&self.pool, input)
            .await
            .map_err(map_db_error)?;
        Laboratory::try_from(row)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateLaboratory,
    ) -> Result<Option<Laboratory>, CoreError> {
        LaboratoryRepo::update(&self.pool, id, input)
            .await
            .map_err(map_db_error)?
            .map(Laboratory::try_from)
            .transpose()
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError> {
        LaboratoryRepo::soft_delete(&self.pool, id)
            .await
            .map_err(map_db_error)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(map_db_error)
    }
}
