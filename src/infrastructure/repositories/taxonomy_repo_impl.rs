// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::taxonomy::{TaxonomyEntity, TaxonomyKind};
use crate::domain::repositories::taxonomy_repository::TaxonomyRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::{brand, category, tag};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

/// 分类法仓库实现
///
/// 三张分类法表结构相同，按kind分派到对应实体。
/// 插入依赖名称唯一索引：并发写入者撞上冲突时得到
/// `AlreadyExists`，由解析服务回退为再查一次。
#[derive(Clone)]
pub struct TaxonomyRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TaxonomyRepositoryImpl {
    /// 创建新的分类法仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn map_insert_err(e: DbErr) -> RepositoryError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        RepositoryError::AlreadyExists
    } else {
        RepositoryError::Database(e)
    }
}

#[async_trait]
impl TaxonomyRepository for TaxonomyRepositoryImpl {
    async fn find_by_name(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<Option<TaxonomyEntity>, RepositoryError> {
        let db = self.db.as_ref();
        let found = match kind {
            TaxonomyKind::Category => category::Entity::find()
                .filter(category::Column::Name.eq(name))
                .one(db)
                .await?
                .map(|m| (m.id, m.name)),
            TaxonomyKind::Brand => brand::Entity::find()
                .filter(brand::Column::Name.eq(name))
                .one(db)
                .await?
                .map(|m| (m.id, m.name)),
            TaxonomyKind::Tag => tag::Entity::find()
                .filter(tag::Column::Name.eq(name))
                .one(db)
                .await?
                .map(|m| (m.id, m.name)),
        };

        Ok(found.map(|(id, name)| TaxonomyEntity { id, kind, name }))
    }

    async fn insert(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<TaxonomyEntity, RepositoryError> {
        let db = self.db.as_ref();
        let id = Uuid::new_v4();
        let now = Utc::now().into();

        match kind {
            TaxonomyKind::Category => {
                category::ActiveModel {
                    id: Set(id),
                    name: Set(name.to_string()),
                    created_at: Set(now),
                }
                .insert(db)
                .await
                .map_err(map_insert_err)?;
            }
            TaxonomyKind::Brand => {
                brand::ActiveModel {
                    id: Set(id),
                    name: Set(name.to_string()),
                    created_at: Set(now),
                }
                .insert(db)
                .await
                .map_err(map_insert_err)?;
            }
            TaxonomyKind::Tag => {
                tag::ActiveModel {
                    id: Set(id),
                    name: Set(name.to_string()),
                    created_at: Set(now),
                }
                .insert(db)
                .await
                .map_err(map_insert_err)?;
            }
        }

        Ok(TaxonomyEntity {
            id,
            kind,
            name: name.to_string(),
        })
    }

    async fn list_names(&self, kind: TaxonomyKind) -> Result<Vec<String>, RepositoryError> {
        let db = self.db.as_ref();
        let names = match kind {
            TaxonomyKind::Category => category::Entity::find()
                .order_by_asc(category::Column::Name)
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.name)
                .collect(),
            TaxonomyKind::Brand => brand::Entity::find()
                .order_by_asc(brand::Column::Name)
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.name)
                .collect(),
            TaxonomyKind::Tag => tag::Entity::find()
                .order_by_asc(tag::Column::Name)
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.name)
                .collect(),
        };

        Ok(names)
    }
}
