//! Pilates Studio - 普拉提工作室后端服务
//!
//! 基于 Actix Web 构建的预约、课程包与排班系统。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `line`: LINE Messaging API 客户端与 Webhook
//! - `middlewares`: 认证授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `scheduling`: 可预约时段计算
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数
//! - `worker`: 定时任务

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod line;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod scheduling;
pub mod services;
pub mod storage;
pub mod utils;
pub mod worker;
