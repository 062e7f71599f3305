// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 集成测试入口
//!
//! 用脚本化浏览器与内存仓库驱动完整管线，不依赖真实浏览器或数据库。


mod pipeline_test;
mod queue_test;
