// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
pub mod job;
pub mod product;
pub mod source;
pub mod taxonomy;
