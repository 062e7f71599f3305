// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 索引迁移
///
/// 分类法表的唯一索引是并发 find-or-create 的正确性保障，
/// 应用层的先查后建只是优化，不是锁
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Unique index on the normalized (lowercased) name, one per taxonomy kind
        manager
            .create_index(
                Index::create()
                    .name("idx_categories_name_unique")
                    .table(Categories::Table)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_brands_name_unique")
                    .table(Brands::Table)
                    .col(Brands::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tags_name_unique")
                    .table(Tags::Table)
                    .col(Tags::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Dedup key for repeated crawls of the same physical product
        manager
            .create_index(
                Index::create()
                    .name("idx_products_source_link_unique")
                    .table(Products::Table)
                    .col(Products::SourceId)
                    .col(Products::Link)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Queue acquisition path: status + scheduled_at scan
        manager
            .create_index(
                Index::create()
                    .name("idx_crawl_jobs_status_scheduled_at")
                    .table(CrawlJobs::Table)
                    .col(CrawlJobs::Status)
                    .col(CrawlJobs::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_crawl_jobs_status_scheduled_at")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_source_link_unique")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_tags_name_unique").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_brands_name_unique").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_categories_name_unique").to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum Brands {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    SourceId,
    Link,
}

#[derive(DeriveIden)]
enum CrawlJobs {
    Table,
    Status,
    ScheduledAt,
}
