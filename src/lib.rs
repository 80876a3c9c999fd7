//! # 产品服务
//!
//! 在单张 `products` 表上提供 CRUD 风格的 HTTP 接口：
//! - 应用层：产品模型、存储抽象（Postgres / 内存）、处理器
//! - 核心层：错误到状态码的映射、JSON 编码、请求日志中间件
//! - 基础设施层：连接池、日志

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod server;

pub use server::{build_router, serve, shutdown_signal, Backend};
