// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 数据库连接、实体定义、仓库实现与外部服务客户端
pub mod database;
pub mod repositories;
pub mod services;
