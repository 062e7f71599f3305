// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub source_id: Uuid,
    pub name: String,
    pub link: String,
    pub images: Json,
    pub price: Option<f64>,
    pub discount_price: Option<f64>,
    pub discount_label: Option<String>,
    pub rating: Option<f32>,
    pub rating_count: Option<i32>,
    pub description: String,
    pub specifications: Json,
    pub key_features: Json,
    pub category_ids: Json,
    pub brand_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
