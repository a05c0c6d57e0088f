// ==========================================
// 商品目录导入系统 - 进度层
// ==========================================
// 职责: 带版本号的进度快照协议（写侧 + 存储）
// 读侧: 轮询接口见 api 层
// ==========================================

pub mod store;
pub mod tracker;

// 重导出核心类型
pub use store::ProgressStore;
pub use tracker::ProgressTracker;
