// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// 分类服务错误类型
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("分类请求失败: {0}")]
    Http(String),

    #[error("分类响应格式错误: {0}")]
    Malformed(String),
}

/// 产品描述符，分类服务的输入单元
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDescriptor {
    /// 产品名称
    pub name: String,
    /// 品牌名，未知为空串
    pub brand: String,
    /// 颜色，未知为空串
    pub color: String,
}

/// 分类请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// 候选分类名称（本次采集发现的分组标题）
    pub categories: Vec<String>,
    /// 已知品牌名称
    pub brands: Vec<String>,
    /// 待归类的产品
    pub products: Vec<ProductDescriptor>,
}

/// 分类响应
///
/// 两个映射的值都是产品名称列表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationResponse {
    /// 分类名 -> 产品名
    #[serde(default)]
    pub category_map: HashMap<String, Vec<String>>,
    /// 品牌名 -> 产品名
    #[serde(default)]
    pub brand_map: HashMap<String, Vec<String>>,
}

/// 分类服务特质
///
/// 外部协作方，尽力而为：调用失败或响应异常由采集器捕获，
/// 留下未解析的分类法字段，绝不中断所在的采集调用。
#[async_trait]
pub trait Classifier: Send + Sync {
    /// 归类一批产品
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResponse, ClassifierError>;
}
