// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 采集器模块
///
/// 分页与富集状态机，以及按来源配置的选择器档案
pub mod engine;
pub mod extract;
pub mod profiles;

pub use engine::{CrawlError, CrawlSettings, SiteCrawler};
pub use extract::SelectorProfile;
