// ==========================================
// 商品目录导入系统 - 导入层
// ==========================================
// 职责: 目录文件解析、行启发式提取、批量落库
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod category_resolver;
pub mod error;
pub mod field_extractor;
pub mod header_detector;
pub mod pipeline;
pub mod product_writer;
pub mod row_normalizer;
pub mod sheet_reader;

// 重导出核心类型
pub use category_resolver::CategoryResolver;
pub use error::{ImportError, ImportResult};
pub use header_detector::{HeaderDetector, HeaderField};
pub use pipeline::ImportPipeline;
pub use product_writer::ProductBatchWriter;
pub use row_normalizer::RowNormalizer;
pub use sheet_reader::{open_row_source, CsvRowSource, RawCell, RowSource, SheetRow, WorkbookRowSource};
