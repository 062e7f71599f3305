// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::EnrichedProduct;
use crate::domain::repositories::product_repository::ProductRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::product as product_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 产品仓库实现
///
/// 以 (source_id, link) 为去重键：同一来源重复采到的链接做
/// 原地更新，数据库侧的唯一索引兜底并发写入。
#[derive(Clone)]
pub struct ProductRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ProductRepositoryImpl {
    /// 创建新的产品仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn write_fields(model: &mut product_entity::ActiveModel, product: &EnrichedProduct) {
    model.name = Set(product.name.clone());
    model.images = Set(json!(product.images));
    model.price = Set(product.price);
    model.discount_price = Set(product.discount_price);
    model.discount_label = Set(Some(product.discount_label.clone()));
    model.rating = Set(product.rating);
    model.rating_count = Set(product.rating_count.map(|c| c as i32));
    model.description = Set(product.description.clone());
    model.specifications = Set(json!(product.specifications));
    model.key_features = Set(json!(product.key_features));
    model.category_ids = Set(json!(product.category_ids));
    model.brand_id = Set(product.brand_id);
    model.tag_id = Set(product.tag_id);
    model.updated_at = Set(Utc::now().into());
}

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn upsert(
        &self,
        source_id: Uuid,
        product: &EnrichedProduct,
    ) -> Result<Uuid, RepositoryError> {
        let db = self.db.as_ref();

        let existing = product_entity::Entity::find()
            .filter(product_entity::Column::SourceId.eq(source_id))
            .filter(product_entity::Column::Link.eq(product.link.as_str()))
            .one(db)
            .await?;

        if let Some(existing) = existing {
            let id = existing.id;
            let mut model: product_entity::ActiveModel = existing.into();
            write_fields(&mut model, product);
            model.update(db).await?;
            return Ok(id);
        }

        let id = Uuid::new_v4();
        let now = Utc::now().into();
        let mut model = product_entity::ActiveModel {
            id: Set(id),
            source_id: Set(source_id),
            link: Set(product.link.clone()),
            created_at: Set(now),
            ..Default::default()
        };
        write_fields(&mut model, product);
        model.insert(db).await?;

        Ok(id)
    }
}
