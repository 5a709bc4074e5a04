//! MonPAD Dashboard - 项目监控仪表盘服务
//!
//! 基于 Actix Web 构建的 BFF，面向 MonPAD REST API 组装讲师、助教与学生视图。
//! 所有业务数据归上游所有，本服务只持有会话令牌与短期用户缓存。
//!
//! # 架构
//! - `cache`: 按令牌缓存当前用户（Moka）
//! - `client`: 上游 REST 客户端、传输层与信封处理
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `middlewares`: 会话与角色中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 视图组装与工作流
//! - `session`: 单槽位令牌存储与 cookie
//! - `utils`: 工具函数

pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod session;
pub mod utils;
