// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::EnrichedProduct;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 产品仓库特质
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 保存一条完整富集的产品记录
    ///
    /// 以 (source_id, link) 为去重键：已存在的行做原地更新
    /// （价格、折扣、评分、描述等字段刷新），否则插入新行。
    async fn upsert(
        &self,
        source_id: Uuid,
        product: &EnrichedProduct,
    ) -> Result<Uuid, RepositoryError>;
}
