// ==========================================
// 商品目录导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (rusqlite) + Tokio
// 系统定位: 批量目录导入 + 轮询进度查询
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 目录文件解析与导入流水线
pub mod importer;

// 进度层 - 带版本号的进度快照存储
pub mod progress;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与任务调度
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    Category, CounterField, ImportState, NewCategory, NewProduct, PendingProduct, Product,
    ReasonCode,
};

// 导入流水线
pub use importer::{ImportError, ImportPipeline, RawCell, SheetRow};

// 进度存储
pub use progress::{ProgressStore, ProgressTracker};

// API
pub use api::ImportApi;

// 配置
pub use config::ImportConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商品目录导入系统";

// ==========================================
// 预编译检查
// ==========================================
