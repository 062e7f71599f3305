// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::source::{SourceTarget, SpecialCollection};
use crate::domain::repositories::source_repository::SourceRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::source as source_entity;
use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::warn;

/// 来源仓库实现
///
/// 基于SeaORM实现的来源数据访问层，只读
#[derive(Clone)]
pub struct SourceRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SourceRepositoryImpl {
    /// 创建新的来源仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<source_entity::Model> for SourceTarget {
    fn from(model: source_entity::Model) -> Self {
        // URL lists live in json columns written by the admin side;
        // malformed payloads degrade to empty lists instead of failing the read
        let listing_urls: Vec<String> = serde_json::from_value(model.listing_urls.clone())
            .unwrap_or_else(|e| {
                warn!(slug = %model.slug, "Invalid listing_urls payload: {}", e);
                Vec::new()
            });
        let collections: Vec<SpecialCollection> =
            serde_json::from_value(model.collections.clone()).unwrap_or_else(|e| {
                warn!(slug = %model.slug, "Invalid collections payload: {}", e);
                Vec::new()
            });

        Self {
            id: model.id,
            slug: model.slug,
            name: model.name,
            website: model.website,
            badge_color: model.badge_color,
            listing_urls,
            collections,
            enabled: model.enabled,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl SourceRepository for SourceRepositoryImpl {
    async fn find_enabled(&self) -> Result<Vec<SourceTarget>, RepositoryError> {
        let models = source_entity::Entity::find()
            .filter(source_entity::Column::Enabled.eq(true))
            .order_by_asc(source_entity::Column::Slug)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<SourceTarget>, RepositoryError> {
        let model = source_entity::Entity::find()
            .filter(source_entity::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }
}
