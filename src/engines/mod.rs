// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 引擎模块
///
/// 浏览器自动化能力的抽象与chromiumoxide实现
pub mod chromium;
pub mod traits;
