// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 分类法条目类型
///
/// 分类、品牌和标签共用同一套按名称 find-or-create 的语义，
/// 仅存储表不同。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    /// 产品分类
    Category,
    /// 品牌
    Brand,
    /// 标签
    Tag,
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaxonomyKind::Category => write!(f, "category"),
            TaxonomyKind::Brand => write!(f, "brand"),
            TaxonomyKind::Tag => write!(f, "tag"),
        }
    }
}

/// 分类法条目
///
/// 名称以小写形式存储，(kind, name) 全局唯一。
/// 条目按需懒创建，采集核心从不删除。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntity {
    /// 条目唯一标识符
    pub id: Uuid,
    /// 条目类型
    pub kind: TaxonomyKind,
    /// 规范化（小写）名称
    pub name: String,
}
