// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::taxonomy::{TaxonomyEntity, TaxonomyKind};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// 分类法仓库特质
///
/// 分类法表是唯一会被多个并发采集器写入的共享资源。
/// `insert` 在 (kind, name) 唯一索引冲突时必须返回
/// `RepositoryError::AlreadyExists`，调用方据此回退为再查一次。
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    /// 按规范化名称查找条目
    async fn find_by_name(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<Option<TaxonomyEntity>, RepositoryError>;

    /// 插入新条目，名称必须已规范化
    async fn insert(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<TaxonomyEntity, RepositoryError>;

    /// 列出某类条目的全部名称（分类服务的已知品牌输入）
    async fn list_names(&self, kind: TaxonomyKind) -> Result<Vec<String>, RepositoryError>;
}
