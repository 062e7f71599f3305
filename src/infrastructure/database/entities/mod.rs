// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod brand;
pub mod category;
pub mod crawl_job;
pub mod product;
pub mod source;
pub mod tag;
