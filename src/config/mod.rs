// ==========================================
// 商品目录导入系统 - 配置层
// ==========================================
// 职责: 导入流水线与进度查询的运行参数
// 来源: 环境变量覆写 + 内置默认值
// ==========================================

pub mod import_config;

// 重导出核心配置
pub use import_config::ImportConfig;
