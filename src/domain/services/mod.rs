// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
pub mod classifier;
pub mod product_sink;
pub mod taxonomy_resolver;
