//! SeaORM repository implementations

use crate::contract::{ChangeRecord, Organization};
use crate::domain::events::{ChangeEvent, EventRecorder};
use crate::domain::repository::{OrganizationEdit, OrganizationRepository};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use sea_orm::sea_query::{Expr, SimpleExpr};
use std::sync::Arc;
use uuid::Uuid;

use super::entity;

// ===== Organization Repository =====

pub struct SeaOrmOrganizationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmOrganizationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganizationRepository for SeaOrmOrganizationRepository {
    async fn create(&self, org: &Organization) -> Result<Organization> {
        let active: entity::ActiveModel = org.into();

        entity::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;

        Ok(org.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>> {
        let result = entity::Entity::find_by_id(id).one(&*self.db).await?;

        result.map(Organization::try_from).transpose()
    }

    async fn modify(
        &self,
        id: Uuid,
        edit: &OrganizationEdit<'_>,
    ) -> Result<Option<(Organization, ChangeRecord)>> {
        // Dropping the transaction without commit rolls it back
        let txn = self.db.begin().await?;

        let mut query = entity::Entity::find_by_id(id);
        if txn.get_database_backend() == DbBackend::Sqlite {
            // SQLite has no row locks and a deferred transaction that reads
            // first cannot wait for the write lock later ("database is
            // locked"). Writing first takes the lock up front, under the
            // connection's busy timeout.
            entity::Entity::update_many()
                .col_expr(
                    entity::Column::UpdatedAt,
                    SimpleExpr::from(Expr::col(entity::Column::UpdatedAt)),
                )
                .filter(entity::Column::Id.eq(id))
                .exec(&txn)
                .await?;
        } else {
            query = query.lock_exclusive();
        }

        let Some(row) = query.one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let mut org = Organization::try_from(row)?;
        let change = edit(&mut org)?;
        org.updated_at = chrono::Utc::now();

        let active: entity::ActiveModel = (&org).into();
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(Some((updated.try_into()?, change)))
    }
}

// ===== Event Recorder =====

/// Stores change events in the `events` table
pub struct SeaOrmEventRecorder {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEventRecorder {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Events of one organization, oldest first
    pub async fn list_for_org(&self, org_id: Uuid, limit: u64) -> Result<Vec<ChangeEvent>> {
        let rows = entity::event::Entity::find()
            .filter(entity::event::Column::OrgId.eq(org_id))
            .order_by_asc(entity::event::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await?;

        rows.into_iter().map(ChangeEvent::try_from).collect()
    }
}

#[async_trait]
impl EventRecorder for SeaOrmEventRecorder {
    async fn record(&self, event: &ChangeEvent) -> Result<()> {
        let active: entity::event::ActiveModel = event.into();
        entity::event::Entity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(())
    }
}
