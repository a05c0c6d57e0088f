// ==========================================
// 商品目录导入系统 - API层
// ==========================================
// 职责: 对外暴露导入任务提交与进度查询能力
// 约束: API层只做参数组装与错误映射，业务在 importer/progress
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, StartImportResponse};
