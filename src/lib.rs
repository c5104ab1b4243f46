//! TA Feedback Portal - 助教反馈门户后端服务
//!
//! 基于 Actix Web 构建，负责反馈轮次、学期归档与新学期重置。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `notification`: 归档通知通道
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod notification;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
