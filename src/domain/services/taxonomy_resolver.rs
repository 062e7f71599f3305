// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::taxonomy::{TaxonomyEntity, TaxonomyKind};
use crate::domain::repositories::taxonomy_repository::TaxonomyRepository;
use crate::domain::repositories::RepositoryError;
use std::sync::Arc;
use tracing::debug;

/// 分类法解析器
///
/// 按规范化名称做幂等的 find-or-create。先查后建只是优化：
/// 多个worker并发创建同名条目时，存储层的唯一索引才是正确性保障，
/// 插入冲突会回退为再查一次并返回先到者。
pub struct TaxonomyResolver {
    repository: Arc<dyn TaxonomyRepository>,
}

/// 名称规范化：去首尾空白并转小写
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl TaxonomyResolver {
    pub fn new(repository: Arc<dyn TaxonomyRepository>) -> Self {
        Self { repository }
    }

    /// 按名称查找条目，不存在则创建
    ///
    /// # 参数
    ///
    /// * `kind` - 条目类型（分类/品牌/标签）
    /// * `name` - 原始名称，大小写不敏感
    ///
    /// # 返回值
    ///
    /// * `Ok(TaxonomyEntity)` - 已存在或新建的条目
    /// * `Err(RepositoryError)` - 存储访问失败，或名称为空
    pub async fn find_or_create(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<TaxonomyEntity, RepositoryError> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return Err(RepositoryError::NotFound);
        }

        if let Some(existing) = self.repository.find_by_name(kind, &normalized).await? {
            return Ok(existing);
        }

        match self.repository.insert(kind, &normalized).await {
            Ok(created) => {
                debug!(kind = %kind, name = %normalized, "Created taxonomy entity");
                Ok(created)
            }
            // Lost the race against another worker: the unique index rejected
            // our insert, so the winner's row is now visible.
            Err(RepositoryError::AlreadyExists) => self
                .repository
                .find_by_name(kind, &normalized)
                .await?
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(e),
        }
    }

    /// 列出某类条目的全部名称
    pub async fn known_names(&self, kind: TaxonomyKind) -> Result<Vec<String>, RepositoryError> {
        self.repository.list_names(kind).await
    }
}
