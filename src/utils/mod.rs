// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供时钟、重试策略和日志初始化等通用功能
pub mod clock;
pub mod retry_policy;
pub mod telemetry;
