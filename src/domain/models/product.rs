// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 列表页产品条目
///
/// 仅包含列表页可见的字段。`link` 是保留条目的最低要求，
/// 没有折扣标记的条目在提取阶段即被过滤（只收录折扣品）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingItem {
    /// 详情页链接（绝对URL）
    pub link: String,
    /// 列表页图片
    pub images: Vec<String>,
    /// 产品名称
    pub name: String,
    /// 原价
    pub price: Option<f64>,
    /// 折扣价
    pub discount_price: Option<f64>,
    /// 折扣标记文案，None表示列表页未发现折扣
    pub discount_label: Option<String>,
    /// 评分
    pub rating: Option<f32>,
    /// 评分数量
    pub rating_count: Option<u32>,
}

/// 富集后的产品记录
///
/// 列表条目经详情页补充与分类法解析后的最终形态。
/// 每个在列表阶段还是占位的字段在这里都是显式的空值，
/// 不存在"缺失"状态，这是交付给持久化层前必须满足的不变量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedProduct {
    /// 详情页链接
    pub link: String,
    /// 列表图与详情页补充图的合集
    pub images: Vec<String>,
    /// 产品名称
    pub name: String,
    /// 原价
    pub price: Option<f64>,
    /// 折扣价
    pub discount_price: Option<f64>,
    /// 折扣标记文案
    pub discount_label: String,
    /// 评分
    pub rating: Option<f32>,
    /// 评分数量
    pub rating_count: Option<u32>,
    /// 完整描述，详情页缺失时为空串
    pub description: String,
    /// 规格参数
    pub specifications: Vec<String>,
    /// 关键特性
    pub key_features: Vec<String>,
    /// 详情页发现的品牌名（分类服务的输入之一），缺失为空串
    pub brand_name: String,
    /// 所属特辑标签名，普通列表页产品为空串
    pub tag_label: String,
    /// 解析后的分类ID列表
    pub category_ids: Vec<Uuid>,
    /// 解析后的品牌ID
    pub brand_id: Option<Uuid>,
    /// 解析后的标签ID
    pub tag_id: Option<Uuid>,
}

impl EnrichedProduct {
    /// 从列表条目构造富集记录
    ///
    /// 所有详情页字段与分类法字段在此处落为显式空值，
    /// 后续富集只会在空值之上补充，不会出现未定义字段。
    pub fn from_listing(item: ListingItem, tag_label: &str) -> Self {
        Self {
            link: item.link,
            images: item.images,
            name: item.name,
            price: item.price,
            discount_price: item.discount_price,
            discount_label: item.discount_label.unwrap_or_default(),
            rating: item.rating,
            rating_count: item.rating_count,
            description: String::new(),
            specifications: Vec::new(),
            key_features: Vec::new(),
            brand_name: String::new(),
            tag_label: tag_label.to_string(),
            category_ids: Vec::new(),
            brand_id: None,
            tag_id: None,
        }
    }
}

/// 一次采集调用的结果批次
///
/// worker侧交给持久化汇写入，随后以摘要形式经关联总线投递。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlBatch {
    /// 来源ID
    pub source_id: Uuid,
    /// 来源slug
    pub source_slug: String,
    /// 按列表页分类标题（或特辑标签名）分组的产品，保持发现顺序
    pub groups: Vec<BatchGroup>,
}

/// 结果批次中的一个分组
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchGroup {
    /// 分组标题：列表页的分类标题，特辑则为组标签名
    pub label: String,
    /// 分组内的产品
    pub products: Vec<EnrichedProduct>,
}

impl CrawlBatch {
    pub fn product_count(&self) -> usize {
        self.groups.iter().map(|g| g.products.len()).sum()
    }
}

/// 一次来源采集完成后的结果摘要
///
/// worker持久化完成后发布到 `crawl.result.<slug>` 主题，
/// 编排器据此观察周期进度。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// 来源slug
    pub source_slug: String,
    /// 本次采到的产品总数
    pub products_found: usize,
    /// 成功写入的产品数
    pub saved: usize,
    /// 写入失败被跳过的产品数
    pub failed: usize,
}
