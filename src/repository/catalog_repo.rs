// ==========================================
// 商品目录导入系统 - 目录导入 Repository Trait
// ==========================================
// 职责: 定义目录/商品导入相关数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{NewCategory, NewProduct, Product};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashMap;

// ==========================================
// CatalogImportRepository Trait
// ==========================================
// 用途: 导入流水线的目录/商品数据访问
// 实现者: CatalogImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait CatalogImportRepository: Send + Sync {
    // ===== 目录（事务化批量写）=====

    /// 批量插入目录（INSERT OR IGNORE 策略）
    ///
    /// # 参数
    /// - categories: 待插入目录列表（同名冲突静默跳过）
    ///
    /// # 返回
    /// - Ok(usize): 实际新插入的目录数（被忽略的不计）
    /// - Err: 数据库错误（整个事务回滚）
    async fn batch_insert_categories_ignore(
        &self,
        categories: Vec<NewCategory>,
    ) -> RepositoryResult<usize>;

    /// 按名称批量查询目录 id
    ///
    /// # 参数
    /// - names: 目录路径名列表
    ///
    /// # 返回
    /// - Ok(HashMap<name, id>): 仅包含查到的名称
    async fn find_category_ids(&self, names: &[String]) -> RepositoryResult<HashMap<String, i64>>;

    // ===== 商品（事务化批量写）=====

    /// 批量插入商品（INSERT OR IGNORE 策略，按 sku 去重）
    ///
    /// # 参数
    /// - products: 目录 id 已解析的商品行
    ///
    /// # 返回
    /// - Ok(usize): 实际新插入的商品数；attempted - inserted 即重复数
    /// - Err: 数据库错误（整个事务回滚）
    async fn batch_insert_products_ignore(
        &self,
        products: Vec<NewProduct>,
    ) -> RepositoryResult<usize>;

    // ===== 查询（校验/汇总用）=====

    /// 按 sku 查询单个商品
    async fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>>;

    /// 商品总数
    async fn count_products(&self) -> RepositoryResult<i64>;

    /// 目录总数
    async fn count_categories(&self) -> RepositoryResult<i64>;
}
