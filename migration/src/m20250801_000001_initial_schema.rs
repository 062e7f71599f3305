// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 数据库初始模式迁移
///
/// 创建采集来源、产品、分类法（分类/品牌/标签）和采集任务表
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Create sources table (no dependencies, managed by the admin side)
        manager
            .create_table(
                Table::create()
                    .table(Sources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sources::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Sources::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Sources::Name).string().not_null())
                    .col(ColumnDef::new(Sources::Website).string().not_null())
                    .col(
                        ColumnDef::new(Sources::BadgeColor)
                            .string()
                            .not_null()
                            .default("#000000"),
                    )
                    .col(ColumnDef::new(Sources::ListingUrls).json().not_null())
                    .col(ColumnDef::new(Sources::Collections).json().not_null())
                    .col(
                        ColumnDef::new(Sources::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sources::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Sources::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. Taxonomy tables. Names are stored lowercased; the unique index
        // added in the follow-up migration is the correctness backstop for
        // concurrent find-or-create from different workers.
        for table in Taxonomy::tables() {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Taxonomy::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Taxonomy::Name).string().not_null())
                        .col(
                            ColumnDef::new(Taxonomy::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;
        }

        // 3. Create products table (depends on sources)
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::SourceId).uuid().not_null())
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Link).string().not_null())
                    .col(ColumnDef::new(Products::Images).json().not_null())
                    .col(ColumnDef::new(Products::Price).double().null())
                    .col(ColumnDef::new(Products::DiscountPrice).double().null())
                    .col(ColumnDef::new(Products::DiscountLabel).string().null())
                    .col(ColumnDef::new(Products::Rating).float().null())
                    .col(ColumnDef::new(Products::RatingCount).integer().null())
                    .col(
                        ColumnDef::new(Products::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Products::Specifications).json().not_null())
                    .col(ColumnDef::new(Products::KeyFeatures).json().not_null())
                    .col(ColumnDef::new(Products::CategoryIds).json().not_null())
                    .col(ColumnDef::new(Products::BrandId).uuid().null())
                    .col(ColumnDef::new(Products::TagId).uuid().null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. Create crawl_jobs table (durable job queue)
        manager
            .create_table(
                Table::create()
                    .table(CrawlJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CrawlJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CrawlJobs::SourceSlug).string().not_null())
                    .col(ColumnDef::new(CrawlJobs::Status).string().not_null())
                    .col(
                        ColumnDef::new(CrawlJobs::AttemptCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CrawlJobs::MaxRetries)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(
                        ColumnDef::new(CrawlJobs::ScheduledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(CrawlJobs::LockToken).uuid().null())
                    .col(
                        ColumnDef::new(CrawlJobs::LockExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CrawlJobs::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CrawlJobs::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CrawlJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CrawlJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CrawlJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        for table in Taxonomy::tables().into_iter().rev() {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Sources::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sources {
    Table,
    Id,
    Slug,
    Name,
    Website,
    BadgeColor,
    ListingUrls,
    Collections,
    Enabled,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Taxonomy {
    #[sea_orm(iden = "categories")]
    Categories,
    #[sea_orm(iden = "brands")]
    Brands,
    #[sea_orm(iden = "tags")]
    Tags,
    Id,
    Name,
    CreatedAt,
}

impl Taxonomy {
    fn tables() -> [Taxonomy; 3] {
        [Taxonomy::Categories, Taxonomy::Brands, Taxonomy::Tags]
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    SourceId,
    Name,
    Link,
    Images,
    Price,
    DiscountPrice,
    DiscountLabel,
    Rating,
    RatingCount,
    Description,
    Specifications,
    KeyFeatures,
    CategoryIds,
    BrandId,
    TagId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CrawlJobs {
    Table,
    Id,
    SourceSlug,
    Status,
    AttemptCount,
    MaxRetries,
    ScheduledAt,
    LockToken,
    LockExpiresAt,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
