// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::source::SourceTarget;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// 来源仓库特质
///
/// 来源由外部管理端写入，采集核心只读
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// 查找所有启用的来源
    async fn find_enabled(&self) -> Result<Vec<SourceTarget>, RepositoryError>;
    /// 根据slug查找来源
    async fn find_by_slug(&self, slug: &str) -> Result<Option<SourceTarget>, RepositoryError>;
}
