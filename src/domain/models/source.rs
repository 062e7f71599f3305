// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 采集来源实体
///
/// 表示一个第三方零售站点的采集配置。来源由外部管理端创建与维护，
/// 对采集核心是只读的。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTarget {
    /// 来源唯一标识符
    pub id: Uuid,
    /// 来源slug，作为任务与关联主题的键
    pub slug: String,
    /// 来源显示名称
    pub name: String,
    /// 来源站点基准URL，用于解析相对链接
    pub website: String,
    /// 徽章颜色
    pub badge_color: String,
    /// 列表页URL，按配置顺序依次采集
    pub listing_urls: Vec<String>,
    /// 特辑URL组，每组携带自己的标签
    pub collections: Vec<SpecialCollection>,
    /// 是否参与采集周期
    pub enabled: bool,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 特辑URL组
///
/// 一组列表页URL，组内采到的产品统一打上该组的标签。
/// 普通列表页采到的产品标签为空。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialCollection {
    /// 组标签名称
    pub tag: String,
    /// 组内列表页URL
    pub urls: Vec<String>,
}
