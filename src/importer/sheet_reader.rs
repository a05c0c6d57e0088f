// ==========================================
// 商品目录导入系统 - 行数据源
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 说明: 所有文件统一展开为带工作表序号的行流，
//       Excel 按工作表逐个加载，CSV 视为单一工作表
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ==========================================
// 单元格与行模型
// ==========================================

/// 原始单元格值
///
/// # 说明
/// 数值单元格保留 f64，文本化的时机交给行归一化阶段
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Number(f64),
    Empty,
}

/// 展开后的一行（带所属工作表序号）
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub sheet_index: usize,
    pub cells: Vec<RawCell>,
}

// ==========================================
// 行数据源 Trait
// ==========================================

/// 行数据源（按出现顺序逐行产出）
pub trait RowSource: Send {
    /// 取下一行，文件读完返回 Ok(None)
    fn next_row(&mut self) -> ImportResult<Option<SheetRow>>;
}

// ==========================================
// CSV 行数据源
// ==========================================

pub struct CsvRowSource {
    records: csv::StringRecordsIntoIter<File>,
}

impl CsvRowSource {
    pub fn open(path: &Path) -> ImportResult<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_path(path)
            .map_err(|e| ImportError::CsvParseError(e.to_string()))?;

        Ok(CsvRowSource {
            records: reader.into_records(),
        })
    }
}

impl RowSource for CsvRowSource {
    fn next_row(&mut self) -> ImportResult<Option<SheetRow>> {
        match self.records.next() {
            Some(result) => {
                let record = result?;
                let cells = record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            RawCell::Empty
                        } else {
                            RawCell::Text(field.to_string())
                        }
                    })
                    .collect();

                Ok(Some(SheetRow {
                    sheet_index: 0,
                    cells,
                }))
            }
            None => Ok(None),
        }
    }
}

// ==========================================
// Excel 行数据源
// ==========================================

pub struct WorkbookRowSource {
    workbook: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
    next_sheet: usize,
    // 当前工作表的序号与剩余行
    current: Option<(usize, std::vec::IntoIter<Vec<RawCell>>)>,
}

impl WorkbookRowSource {
    pub fn open(path: &Path) -> ImportResult<Self> {
        let workbook =
            open_workbook_auto(path).map_err(|e| ImportError::ExcelParseError(e.to_string()))?;
        let sheet_names = workbook.sheet_names();

        Ok(WorkbookRowSource {
            workbook,
            sheet_names,
            next_sheet: 0,
            current: None,
        })
    }

    /// 加载下一个工作表，全部读完返回 Ok(false)
    fn advance_sheet(&mut self) -> ImportResult<bool> {
        if self.next_sheet >= self.sheet_names.len() {
            return Ok(false);
        }

        let sheet_index = self.next_sheet;
        let sheet_name = self.sheet_names[sheet_index].clone();
        self.next_sheet += 1;

        let range = self
            .workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(format!("工作表 {sheet_name}: {e}")))?;

        let rows: Vec<Vec<RawCell>> = range
            .rows()
            .map(|row| row.iter().map(data_to_cell).collect())
            .collect();

        self.current = Some((sheet_index, rows.into_iter()));
        Ok(true)
    }
}

impl RowSource for WorkbookRowSource {
    fn next_row(&mut self) -> ImportResult<Option<SheetRow>> {
        loop {
            if let Some((sheet_index, rows)) = self.current.as_mut() {
                if let Some(cells) = rows.next() {
                    return Ok(Some(SheetRow {
                        sheet_index: *sheet_index,
                        cells,
                    }));
                }
                self.current = None;
            }

            if !self.advance_sheet()? {
                return Ok(None);
            }
        }
    }
}

/// calamine 单元格转内部模型
fn data_to_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => RawCell::Text(s.clone()),
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) => RawCell::Empty,
    }
}

// ==========================================
// 通用入口（根据扩展名自动选择）
// ==========================================

/// 按扩展名打开行数据源
///
/// # 参数
/// * `file_path` - 源文件路径
///
/// # 返回
/// * 行数据源，扩展名不支持或文件缺失时报错
pub fn open_row_source(file_path: &str) -> ImportResult<Box<dyn RowSource>> {
    let path = Path::new(file_path);

    // 检查文件存在
    if !path.exists() {
        return Err(ImportError::FileNotFound(file_path.to_string()));
    }

    // 检查扩展名
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => Ok(Box::new(CsvRowSource::open(path)?)),
        "xlsx" | "xls" => Ok(Box::new(WorkbookRowSource::open(path)?)),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn cell_text(cell: &RawCell) -> &str {
        match cell {
            RawCell::Text(s) => s,
            _ => panic!("expected text cell, got {cell:?}"),
        }
    }

    #[test]
    fn test_csv_rows_in_order() {
        let file = create_csv("SKU,Name,Price\nAB-1001,Phone,9.99\n");
        let mut source = open_row_source(file.path().to_str().unwrap()).unwrap();

        let first = source.next_row().unwrap().unwrap();
        assert_eq!(first.sheet_index, 0);
        assert_eq!(cell_text(&first.cells[0]), "SKU");

        let second = source.next_row().unwrap().unwrap();
        assert_eq!(cell_text(&second.cells[0]), "AB-1001");
        assert_eq!(cell_text(&second.cells[2]), "9.99");

        assert!(source.next_row().unwrap().is_none());
    }

    #[test]
    fn test_csv_empty_fields_become_empty_cells() {
        let file = create_csv("AB-1001,,9.99\n");
        let mut source = open_row_source(file.path().to_str().unwrap()).unwrap();

        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.cells[1], RawCell::Empty);
    }

    #[test]
    fn test_csv_ragged_rows_allowed() {
        let file = create_csv("a,b,c\nd,e\n");
        let mut source = open_row_source(file.path().to_str().unwrap()).unwrap();

        assert_eq!(source.next_row().unwrap().unwrap().cells.len(), 3);
        assert_eq!(source.next_row().unwrap().unwrap().cells.len(), 2);
    }

    #[test]
    fn test_file_not_found() {
        let result = open_row_source("non_existent.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .unwrap();
        file.write_all(b"not a catalog").unwrap();

        let result = open_row_source(file.path().to_str().unwrap());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_workbook_rows_tagged_by_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "AB-1001").unwrap();
        first.write_number(0, 1, 42.0).unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "CD-2002").unwrap();
        workbook.save(&path).unwrap();

        let mut source = open_row_source(path.to_str().unwrap()).unwrap();

        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.sheet_index, 0);
        assert_eq!(row.cells[0], RawCell::Text("AB-1001".to_string()));
        assert_eq!(row.cells[1], RawCell::Number(42.0));

        let row = source.next_row().unwrap().unwrap();
        assert_eq!(row.sheet_index, 1);
        assert_eq!(row.cells[0], RawCell::Text("CD-2002".to_string()));

        assert!(source.next_row().unwrap().is_none());
    }
}
