// ==========================================
// 商品目录导入系统 - 商品批量写入器
// ==========================================
// 职责: 缓冲已接受的行，按块冲刷入库并记账
// 计数: imported = 实插数，duplicate = 尝试数 - 实插数
// ==========================================

use crate::domain::{CounterField, NewProduct, PendingProduct, ReasonCode};
use crate::importer::category_resolver::CategoryResolver;
use crate::importer::error::ImportResult;
use crate::progress::ProgressTracker;
use crate::repository::catalog_repo::CatalogImportRepository;
use std::sync::Arc;
use tracing::debug;

/// 商品批量写入器
///
/// # 说明
/// 缓冲达到块大小或流结束时冲刷：先解析类目，
/// 再以忽略冲突的批量插入写商品（同 sku 静默跳过，不覆盖）。
/// 无论冲刷成败缓冲都会清空
pub struct ProductBatchWriter {
    resolver: CategoryResolver,
    buffer: Vec<PendingProduct>,
    chunk_size: usize,
    repo: Arc<dyn CatalogImportRepository>,
}

impl ProductBatchWriter {
    pub fn new(repo: Arc<dyn CatalogImportRepository>, chunk_size: usize) -> Self {
        ProductBatchWriter {
            resolver: CategoryResolver::new(repo.clone()),
            buffer: Vec::new(),
            chunk_size,
            repo,
        }
    }

    /// 缓冲一行，达到块大小时自动冲刷
    pub async fn push(
        &mut self,
        product: PendingProduct,
        tracker: &ProgressTracker,
    ) -> ImportResult<()> {
        self.resolver.note(&product.category_name);
        self.buffer.push(product);

        if self.buffer.len() >= self.chunk_size {
            self.flush(tracker).await?;
        }
        Ok(())
    }

    /// 冲刷缓冲
    ///
    /// # 说明
    /// 单个类目解析失败只按行计 invalid，不使整批失败
    pub async fn flush(&mut self, tracker: &ProgressTracker) -> ImportResult<()> {
        self.resolver.flush_pending().await?;

        if self.buffer.is_empty() {
            return Ok(());
        }

        // 缓冲先行取出，冲刷结果如何都不再保留
        let buffered = std::mem::take(&mut self.buffer);
        let mut rows: Vec<NewProduct> = Vec::with_capacity(buffered.len());

        for product in buffered {
            match self.resolver.resolve(&product.category_name).await? {
                Some(category_id) => rows.push(NewProduct {
                    sku: product.sku,
                    name: product.name,
                    category_id,
                    price: product.price,
                }),
                None => {
                    debug!("类目解析失败，按行跳过: {}", product.category_name);
                    tracker.skip_with_reason(ReasonCode::Invalid, 1);
                }
            }
        }

        if rows.is_empty() {
            return Ok(());
        }

        let attempted = rows.len() as u64;
        let inserted = self.repo.batch_insert_products_ignore(rows).await? as u64;

        tracker.bump_by(CounterField::Imported, inserted);
        tracker.skip_with_reason(ReasonCode::Duplicate, attempted - inserted);
        debug!("商品批冲刷: 尝试 {}，实插 {}", attempted, inserted);
        Ok(())
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}
