// ==========================================
// 商品目录导入系统 - 目录领域模型
// ==========================================
// 职责: 目录(Category)与商品(Product)实体及其派生规则
// 红线: 不含数据访问逻辑,不含流水线逻辑
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ===== 持久化长度上限（按字符截断，不拒绝） =====

/// 目录名最大字符数
pub const MAX_CATEGORY_NAME_CHARS: usize = 512;

/// 商品名最大字符数
pub const MAX_PRODUCT_NAME_CHARS: usize = 512;

/// SKU 最大字符数
pub const MAX_SKU_CHARS: usize = 64;

/// slug 最大字符数
pub const MAX_SLUG_CHARS: usize = 128;

// ==========================================
// Category - 商品目录
// ==========================================
// 身份字段为 name：同名目录在多次导入间必须解析为同一 id
// slug 为派生字段，允许重复、允许 NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,              // 目录路径名（如 "Electronics / Phones"）
    pub slug: Option<String>,      // 派生 slug（≤128 字符）
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

/// 待插入目录（无 id，落库时生成）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: Option<String>,
}

impl NewCategory {
    /// 由目录路径名构建插入载荷（slug 自动派生）
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: normalize_slug(name),
        }
    }
}

// ==========================================
// Product - 商品
// ==========================================
// sku 唯一：重复 sku 的再次插入是无操作而非错误
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub sku: String,               // 商品编码（≤64 字符，必填）
    pub name: String,              // 商品名（≤512 字符，可为空串）
    pub category_id: i64,          // 所属目录（FK）
    pub price: Option<f64>,        // 价格（可缺失）
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

/// 目录 id 已解析、可直接落库的商品行
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category_id: i64,
    pub price: Option<f64>,
}

/// 缓冲中的商品行（目录尚未解析为 id，按路径名挂起）
#[derive(Debug, Clone, PartialEq)]
pub struct PendingProduct {
    pub sku: String,
    pub name: String,
    pub category_name: String,
    pub price: Option<f64>,
}

// ==========================================
// slug 派生
// ==========================================

/// 由目录名派生 slug
///
/// # 规则
/// - 保留字母/数字（Unicode），统一转小写
/// - 其余字符的连续段折叠为单个 '-'
/// - 去除首尾 '-'，按字符截断到 128
/// - 结果为空时返回 None（存储为 NULL）
pub fn normalize_slug(name: &str) -> Option<String> {
    let mut slug = String::with_capacity(name.len());
    let mut prev_dash = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
            prev_dash = false;
        } else if !prev_dash && !slug.is_empty() {
            slug.push('-');
            prev_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        return None;
    }

    Some(slug.chars().take(MAX_SLUG_CHARS).collect())
}
