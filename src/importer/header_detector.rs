// ==========================================
// 商品目录导入系统 - 表头探测器
// ==========================================
// 职责: 每张工作表最多识别并吞掉一行表头
// 说明: 字段映射仅作诊断用途，提取逻辑不依赖它
// ==========================================

use std::collections::HashMap;
use tracing::debug;

/// 表头关键字（多语言，小写，子串匹配）
const HEADER_KEYWORDS: [&str; 9] = [
    "sku", "article", "катег", "category", "найменув", "товар", "price", "цена", "варт",
];

/// 结构启发式的行文本总长上限（字符数）
const STRUCTURAL_MAX_CHARS: usize = 120;
/// 结构启发式要求的最少文本单元格数
const STRUCTURAL_MIN_TEXTY: usize = 2;

// ==========================================
// 诊断字段
// ==========================================

/// 表头列对应的规范字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Sku,
    Name,
    Category,
    Price,
}

impl HeaderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::Sku => "sku",
            HeaderField::Name => "name",
            HeaderField::Category => "category",
            HeaderField::Price => "price",
        }
    }
}

/// 各字段的表头同义词（检查顺序即数组顺序，先命中先得）
const FIELD_SYNONYMS: [(HeaderField, &[&str]); 4] = [
    (
        HeaderField::Sku,
        &["sku", "article", "арт", "код", "код товара", "артикул"],
    ),
    (
        HeaderField::Name,
        &["name", "title", "product", "товар", "найменування", "найменув", "опис"],
    ),
    (
        HeaderField::Category,
        &["category", "категор", "розділ", "группа", "section"],
    ),
    (
        HeaderField::Price,
        &["price", "цена", "варт", "cost", "amount"],
    ),
];

// ==========================================
// 判定函数
// ==========================================

/// 关键字判定：行文本以 `|` 拼接转小写后包含任一关键字
pub fn looks_like_header(cells: &[String]) -> bool {
    let joined = cells.join("|").to_lowercase();
    HEADER_KEYWORDS.iter().any(|kw| joined.contains(kw))
}

/// 结构判定：至少两个非空且非数值的单元格，且行文本总长不超过 120 字符
pub fn could_be_header(cells: &[String]) -> bool {
    let mut texty = 0usize;
    let mut total_chars = 0usize;

    for cell in cells {
        total_chars += cell.chars().count();
        if !cell.is_empty() && cell.parse::<f64>().is_err() {
            texty += 1;
        }
    }

    texty >= STRUCTURAL_MIN_TEXTY && total_chars <= STRUCTURAL_MAX_CHARS
}

/// 构建列序号到规范字段的映射（诊断用）
pub fn build_column_map(headers: &[String]) -> HashMap<usize, HeaderField> {
    let mut map = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        'fields: for (field, synonyms) in FIELD_SYNONYMS.iter() {
            for synonym in synonyms.iter() {
                if header.contains(synonym) {
                    map.insert(idx, *field);
                    break 'fields;
                }
            }
        }
    }

    map
}

// ==========================================
// 表头探测器
// ==========================================

/// 表头探测器
///
/// # 说明
/// 表头未捕获时逐行检查；一旦捕获，该工作表内不再触发，
/// 后续即使出现表头样式的行也按数据处理。切换工作表时重置
pub struct HeaderDetector {
    headers: Option<Vec<String>>,
    column_map: HashMap<usize, HeaderField>,
}

impl HeaderDetector {
    pub fn new() -> Self {
        HeaderDetector {
            headers: None,
            column_map: HashMap::new(),
        }
    }

    /// 重置（切换工作表时调用）
    pub fn reset(&mut self) {
        self.headers = None;
        self.column_map.clear();
    }

    /// 检查一行是否为表头
    ///
    /// # 返回
    /// * `true` - 该行被捕获为表头，不应再按数据处理
    /// * `false` - 该行按数据行继续
    pub fn inspect(&mut self, cells: &[String]) -> bool {
        if self.headers.is_some() {
            return false;
        }

        if !looks_like_header(cells) && !could_be_header(cells) {
            return false;
        }

        // 捕获时小写并折叠空白
        let headers: Vec<String> = cells
            .iter()
            .map(|h| collapse_whitespace(h).to_lowercase())
            .collect();
        self.column_map = build_column_map(&headers);

        let mapped: Vec<String> = self
            .column_map
            .iter()
            .map(|(idx, field)| format!("{}:{}", idx, field.as_str()))
            .collect();
        debug!("捕获表头 {:?}，字段映射 [{}]", headers, mapped.join(", "));

        self.headers = Some(headers);
        true
    }

    pub fn captured_headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    pub fn column_map(&self) -> &HashMap<usize, HeaderField> {
        &self.column_map
    }
}

impl Default for HeaderDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_header_english() {
        assert!(looks_like_header(&row(&["SKU", "Name", "Category", "Price"])));
    }

    #[test]
    fn test_keyword_header_cyrillic_mixed_case() {
        assert!(looks_like_header(&row(&["КАТЕГОРІЯ", "Опис"])));
    }

    #[test]
    fn test_structural_header_short_texty_row() {
        assert!(could_be_header(&row(&["Примітка", "Склад", "123"])));
    }

    #[test]
    fn test_structural_ignores_blank_cells() {
        // 空单元格不算文本单元格
        assert!(!could_be_header(&row(&["", "", "X-100", ""])));
    }

    #[test]
    fn test_structural_rejects_long_rows() {
        let long = "Premium quality widget with extended warranty coverage".repeat(3);
        assert!(!could_be_header(&row(&[&long, "Acme"])));
    }

    #[test]
    fn test_detector_fires_once_per_sheet() {
        let mut detector = HeaderDetector::new();
        assert!(detector.inspect(&row(&["SKU", "Name", "Price"])));
        // 第二个表头样式的行按数据处理
        assert!(!detector.inspect(&row(&["SKU", "Name", "Price"])));

        detector.reset();
        assert!(detector.inspect(&row(&["SKU", "Name", "Price"])));
    }

    #[test]
    fn test_captured_headers_normalized() {
        let mut detector = HeaderDetector::new();
        detector.inspect(&row(&["Код  Товара", "НАЙМЕНУВАННЯ"]));
        assert_eq!(
            detector.captured_headers().unwrap(),
            &["код товара".to_string(), "найменування".to_string()]
        );
        assert_eq!(detector.column_map().get(&0), Some(&HeaderField::Sku));
        assert_eq!(detector.column_map().get(&1), Some(&HeaderField::Name));
    }

    #[test]
    fn test_column_map_first_synonym_wins() {
        let headers = row(&["код товара", "найменування", "категорія", "цена", "примітка"]);
        let map = build_column_map(&headers);

        assert_eq!(map.get(&0), Some(&HeaderField::Sku));
        assert_eq!(map.get(&1), Some(&HeaderField::Name));
        assert_eq!(map.get(&2), Some(&HeaderField::Category));
        assert_eq!(map.get(&3), Some(&HeaderField::Price));
        assert_eq!(map.get(&4), None);
    }

    #[test]
    fn test_plain_data_row_not_header() {
        // 单个文本单元格 + 数值不构成表头，也不含关键字
        assert!(!looks_like_header(&row(&["Electronics", "1200"])));
        assert!(!could_be_header(&row(&["Electronics", "1200"])));
    }
}
