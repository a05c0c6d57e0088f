// ==========================================
// 商品目录导入系统 - 目录导入 Repository 实现
// ==========================================
// 职责: CatalogImportRepository 的 rusqlite 实现
// 策略: 批量写全部走事务 + INSERT OR IGNORE（冲突静默跳过）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{NewCategory, NewProduct, Product};
use crate::repository::catalog_repo::CatalogImportRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// CatalogImportRepositoryImpl
// ==========================================
pub struct CatalogImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock_connection(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中批量插入目录（INSERT OR IGNORE）
    ///
    /// # 返回
    /// - 实际新插入的目录数（同名被忽略的行 execute 返回 0，不计入）
    fn batch_insert_categories_tx(
        tx: &Transaction,
        categories: &[NewCategory],
    ) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT OR IGNORE INTO categories (name, slug, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;

        let now = Utc::now();
        let mut inserted = 0;
        for category in categories {
            inserted += stmt.execute(params![category.name, category.slug, now, now])?;
        }

        Ok(inserted)
    }

    /// 在事务中批量插入商品（INSERT OR IGNORE，按 sku 去重）
    fn batch_insert_products_tx(
        tx: &Transaction,
        products: &[NewProduct],
    ) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT OR IGNORE INTO products (sku, name, category_id, price, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )?;

        let now = Utc::now();
        let mut inserted = 0;
        for product in products {
            inserted += stmt.execute(params![
                product.sku,
                product.name,
                product.category_id,
                product.price,
                now,
                now,
            ])?;
        }

        Ok(inserted)
    }
}

#[async_trait]
impl CatalogImportRepository for CatalogImportRepositoryImpl {
    /// 批量插入目录（事务化）
    async fn batch_insert_categories_ignore(
        &self,
        categories: Vec<NewCategory>,
    ) -> RepositoryResult<usize> {
        if categories.is_empty() {
            return Ok(0);
        }

        let conn = self.lock_connection()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let inserted = Self::batch_insert_categories_tx(&tx, &categories)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(inserted)
    }

    /// 按名称批量查询目录 id
    async fn find_category_ids(&self, names: &[String]) -> RepositoryResult<HashMap<String, i64>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.lock_connection()?;

        // 动态占位符: name IN (?1, ?2, ...)
        let placeholders = names.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!(
            "SELECT name, id FROM categories WHERE name IN ({})",
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(names.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut map = HashMap::with_capacity(names.len());
        for row in rows {
            let (name, id) = row?;
            map.insert(name, id);
        }

        Ok(map)
    }

    /// 批量插入商品（事务化）
    async fn batch_insert_products_ignore(
        &self,
        products: Vec<NewProduct>,
    ) -> RepositoryResult<usize> {
        if products.is_empty() {
            return Ok(0);
        }

        let conn = self.lock_connection()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let inserted = Self::batch_insert_products_tx(&tx, &products)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(inserted)
    }

    /// 按 sku 查询单个商品
    async fn get_product_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.lock_connection()?;

        let product = conn
            .query_row(
                r#"
                SELECT id, sku, name, category_id, price, created_at, updated_at
                FROM products
                WHERE sku = ?1
                "#,
                params![sku],
                |row| {
                    Ok(Product {
                        id: row.get(0)?,
                        sku: row.get(1)?,
                        name: row.get(2)?,
                        category_id: row.get(3)?,
                        price: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()?;

        Ok(product)
    }

    /// 商品总数
    async fn count_products(&self) -> RepositoryResult<i64> {
        let conn = self.lock_connection()?;
        let count = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 目录总数
    async fn count_categories(&self) -> RepositoryResult<i64> {
        let conn = self.lock_connection()?;
        let count = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count)
    }
}
