// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::CrawlBatch;
use crate::domain::repositories::product_repository::ProductRepository;
use std::sync::Arc;
use tracing::{error, info};

/// 持久化汇报
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SinkReport {
    /// 成功写入的产品数
    pub saved: usize,
    /// 写入失败被跳过的产品数
    pub failed: usize,
}

/// 产品持久化汇
///
/// 接收完整富集的结果批次并逐条写入。单条写入失败只记录日志并跳过，
/// 不影响同批次其余产品。
pub struct ProductSink {
    products: Arc<dyn ProductRepository>,
}

impl ProductSink {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// 保存一个结果批次
    pub async fn save_batch(&self, batch: &CrawlBatch) -> SinkReport {
        let mut report = SinkReport::default();

        for group in &batch.groups {
            for product in &group.products {
                match self.products.upsert(batch.source_id, product).await {
                    Ok(_) => report.saved += 1,
                    Err(e) => {
                        report.failed += 1;
                        error!(
                            source = %batch.source_slug,
                            link = %product.link,
                            "Failed to persist product: {}", e
                        );
                    }
                }
            }
        }

        info!(
            source = %batch.source_slug,
            saved = report.saved,
            failed = report.failed,
            "Persisted crawl batch"
        );
        report
    }
}
