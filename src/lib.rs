// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 关联总线模块
///
/// 把异步采集请求与其结果按主题配对
pub mod bus;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 采集器模块
///
/// 选择器驱动的列表分页与详情富集状态机
pub mod crawler;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 无头浏览器自动化抽象及其Chromium实现
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如数据库和分类服务
pub mod infrastructure;

/// 编排器模块
///
/// 驱动采集周期：派发任务并等待结果
pub mod orchestrator;

/// 队列模块
///
/// 实现持久化任务队列和调度功能
pub mod queue;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现后台任务处理和工作器管理
pub mod workers;
