// ==========================================
// 商品目录导入系统 - 应用层
// ==========================================
// 职责: 装配各层组件，提供进程入口所需的共享状态
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
