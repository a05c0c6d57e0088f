// ==========================================
// 商品目录导入系统 - 导入流水线
// ==========================================
// 数据流: 行归一化 -> 表头探测 -> 字段提取 -> 批量写入
// 约束: 单任务内严格顺序处理（延续状态依赖行序）
// ==========================================

use crate::domain::{
    CounterField, PendingProduct, ReasonCode, MAX_CATEGORY_NAME_CHARS, MAX_PRODUCT_NAME_CHARS,
    MAX_SKU_CHARS,
};
use crate::importer::error::ImportResult;
use crate::importer::field_extractor::{
    category_path, clamp_chars, pick_name, pick_price, pick_sku,
};
use crate::importer::header_detector::HeaderDetector;
use crate::importer::product_writer::ProductBatchWriter;
use crate::importer::row_normalizer::RowNormalizer;
use crate::importer::sheet_reader::{RowSource, SheetRow};
use crate::progress::ProgressTracker;
use crate::repository::catalog_repo::CatalogImportRepository;
use std::sync::Arc;
use tracing::debug;

/// 导入流水线
///
/// # 说明
/// 持有延续状态、表头状态、待写类目集与商品缓冲的有状态处理器。
/// 跨工作表时表头与延续状态重置，类目缓存与计数跨表共享。
/// 结束时必须显式调用 [`flush`](Self::flush)（`run` 在正常与异常
/// 路径上都会收尾冲刷）
pub struct ImportPipeline {
    tracker: ProgressTracker,
    normalizer: RowNormalizer,
    detector: HeaderDetector,
    writer: ProductBatchWriter,
    current_sheet: usize,
}

impl ImportPipeline {
    pub fn new(
        repo: Arc<dyn CatalogImportRepository>,
        tracker: ProgressTracker,
        chunk_size: usize,
    ) -> Self {
        ImportPipeline {
            tracker,
            normalizer: RowNormalizer::new(),
            detector: HeaderDetector::new(),
            writer: ProductBatchWriter::new(repo, chunk_size),
            current_sheet: 0,
        }
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// 处理单行
    ///
    /// # 说明
    /// 空行与表头行不计入 total；其余行先计 total 再判接受与否
    pub async fn process_row(&mut self, row: SheetRow) -> ImportResult<()> {
        if row.sheet_index != self.current_sheet {
            self.current_sheet = row.sheet_index;
            self.detector.reset();
            self.normalizer.reset();
        }

        let Some(cells) = self.normalizer.normalize(&row.cells) else {
            return Ok(());
        };

        if self.detector.inspect(&cells) {
            return Ok(());
        }

        self.tracker.bump(CounterField::Total);

        let sku = pick_sku(&cells);
        let name = pick_name(&cells, &sku);
        let price = pick_price(&cells);
        let category = category_path(&cells, &self.normalizer.carried_hierarchy());

        if sku.is_empty() || category.is_empty() {
            debug!(
                "行被拒绝: sku 为空 = {}, 类目为空 = {}",
                sku.is_empty(),
                category.is_empty()
            );
            self.tracker.skip_with_reason(ReasonCode::Invalid, 1);
            return Ok(());
        }

        let product = PendingProduct {
            sku: clamp_chars(&sku, MAX_SKU_CHARS),
            name: clamp_chars(&name, MAX_PRODUCT_NAME_CHARS),
            category_name: clamp_chars(&category, MAX_CATEGORY_NAME_CHARS),
            price,
        };

        self.writer.push(product, &self.tracker).await
    }

    /// 冲刷剩余缓冲（流结束或中止时调用）
    pub async fn flush(&mut self) -> ImportResult<()> {
        self.writer.flush(&self.tracker).await
    }

    /// 消费整个行流并收尾
    ///
    /// # 说明
    /// 中途出错也会先尝试冲刷已缓冲的行，再返回首个错误
    pub async fn run(&mut self, mut source: Box<dyn RowSource>) -> ImportResult<()> {
        let result = self.consume(&mut source).await;
        let flush_result = self.flush().await;
        result.and(flush_result)
    }

    async fn consume(&mut self, source: &mut Box<dyn RowSource>) -> ImportResult<()> {
        while let Some(row) = source.next_row()? {
            self.process_row(row).await?;
        }
        Ok(())
    }
}
