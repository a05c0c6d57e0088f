// ==========================================
// 商品目录导入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、进度快照类型与派生规则
// 红线: 不含数据访问逻辑,不含流水线逻辑
// ==========================================

pub mod catalog;
pub mod progress;

// 重导出核心类型
pub use catalog::{
    normalize_slug, Category, NewCategory, NewProduct, PendingProduct, Product,
    MAX_CATEGORY_NAME_CHARS, MAX_PRODUCT_NAME_CHARS, MAX_SKU_CHARS, MAX_SLUG_CHARS,
};
pub use progress::{CounterField, ImportState, ReasonCode};
