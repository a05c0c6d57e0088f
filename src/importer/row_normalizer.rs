// ==========================================
// 商品目录导入系统 - 行归一化器
// ==========================================
// 职责: 单元格文本化 + 层级/品牌列的延续填充
// 约定: 前三列为类目层级，第四列为品牌
// ==========================================

use crate::importer::sheet_reader::RawCell;

/// 延续填充覆盖的列数（三级类目 + 品牌）
pub const CARRY_COLUMNS: usize = 4;

/// 单元格转修剪后的文本
///
/// # 说明
/// 数值单元格按十进制文本化（整数值不带小数点），空单元格为空串
pub fn cell_to_trimmed(cell: &RawCell) -> String {
    match cell {
        RawCell::Text(s) => s.trim().to_string(),
        RawCell::Number(n) => n.to_string(),
        RawCell::Empty => String::new(),
    }
}

// ==========================================
// 行归一化器
// ==========================================

/// 行归一化器
///
/// # 说明
/// 持有延续状态：每列最近一次出现的非空值。
/// 空白单元格由延续值补齐，以还原合并单元格式的层级表格。
/// 延续状态在每一张工作表开始时重置。
pub struct RowNormalizer {
    carried: [Option<String>; CARRY_COLUMNS],
}

impl RowNormalizer {
    pub fn new() -> Self {
        RowNormalizer {
            carried: [None, None, None, None],
        }
    }

    /// 重置延续状态（切换工作表时调用）
    pub fn reset(&mut self) {
        self.carried = [None, None, None, None];
    }

    /// 归一化一行
    ///
    /// # 参数
    /// * `cells` - 原始单元格
    ///
    /// # 返回
    /// * `Some(values)` - 修剪并补齐后的文本行（至少 4 列）
    /// * `None` - 全空行（在补位之前判定，空行不会被延续值复活）
    pub fn normalize(&mut self, cells: &[RawCell]) -> Option<Vec<String>> {
        let mut values: Vec<String> = cells.iter().map(cell_to_trimmed).collect();

        // 全空行直接丢弃，不产生任何副作用
        if values.iter().all(|v| v.is_empty()) {
            return None;
        }

        if values.len() < CARRY_COLUMNS {
            values.resize(CARRY_COLUMNS, String::new());
        }

        // 空白处补入延续值
        for (idx, value) in values.iter_mut().enumerate().take(CARRY_COLUMNS) {
            if value.is_empty() {
                if let Some(prev) = &self.carried[idx] {
                    *value = prev.clone();
                }
            }
        }

        // 补齐后的非空值即为新的延续值（被补入的行同样再次确认该值）
        for idx in 0..CARRY_COLUMNS {
            if !values[idx].is_empty() {
                self.carried[idx] = Some(values[idx].clone());
            }
        }

        Some(values)
    }

    /// 当前延续的三级类目（补齐后视角）
    pub fn carried_hierarchy(&self) -> [Option<&str>; 3] {
        [
            self.carried[0].as_deref(),
            self.carried[1].as_deref(),
            self.carried[2].as_deref(),
        ]
    }
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    #[test]
    fn test_numeric_cells_stringified() {
        assert_eq!(cell_to_trimmed(&RawCell::Number(123.0)), "123");
        assert_eq!(cell_to_trimmed(&RawCell::Number(9.99)), "9.99");
        assert_eq!(cell_to_trimmed(&text("  Phone  ")), "Phone");
        assert_eq!(cell_to_trimmed(&RawCell::Empty), "");
    }

    #[test]
    fn test_blank_row_dropped_before_substitution() {
        let mut normalizer = RowNormalizer::new();
        normalizer.normalize(&[text("Electronics"), text("Phones"), text("X"), text("Acme")]);

        // 空行不得被延续值复活
        let blank = [RawCell::Empty, text("   "), RawCell::Empty];
        assert!(normalizer.normalize(&blank).is_none());
    }

    #[test]
    fn test_carry_fills_blank_hierarchy_and_brand() {
        let mut normalizer = RowNormalizer::new();
        normalizer.normalize(&[
            text("Electronics"),
            text("Phones"),
            RawCell::Empty,
            text("Acme"),
            text("AB-1001"),
        ]);

        let row = normalizer
            .normalize(&[
                RawCell::Empty,
                RawCell::Empty,
                RawCell::Empty,
                RawCell::Empty,
                text("AB-1002"),
            ])
            .unwrap();

        assert_eq!(row[0], "Electronics");
        assert_eq!(row[1], "Phones");
        assert_eq!(row[2], "");
        assert_eq!(row[3], "Acme");
        assert_eq!(row[4], "AB-1002");
    }

    #[test]
    fn test_inherited_value_reconfirms_carry() {
        let mut normalizer = RowNormalizer::new();
        normalizer.normalize(&[text("Electronics"), text("AB-1001")]);
        // 该行继承 cat1，延续状态保持 Electronics
        normalizer.normalize(&[RawCell::Empty, text("AB-1002")]);

        let row = normalizer
            .normalize(&[RawCell::Empty, text("AB-1003")])
            .unwrap();
        assert_eq!(row[0], "Electronics");
    }

    #[test]
    fn test_short_row_padded_to_four_columns() {
        let mut normalizer = RowNormalizer::new();
        let row = normalizer.normalize(&[text("AB-1001")]).unwrap();
        assert_eq!(row.len(), CARRY_COLUMNS);
        assert_eq!(row[1], "");
    }

    #[test]
    fn test_carry_only_covers_first_four_columns() {
        let mut normalizer = RowNormalizer::new();
        normalizer.normalize(&[text("a"), text("b"), text("c"), text("d"), text("Widget")]);

        let row = normalizer
            .normalize(&[
                text("a"),
                text("b"),
                text("c"),
                text("d"),
                RawCell::Empty,
            ])
            .unwrap();
        assert_eq!(row[4], "");
    }

    #[test]
    fn test_reset_clears_carry() {
        let mut normalizer = RowNormalizer::new();
        normalizer.normalize(&[text("Electronics"), text("Phones")]);
        normalizer.reset();

        let row = normalizer
            .normalize(&[RawCell::Empty, text("AB-1001")])
            .unwrap();
        assert_eq!(row[0], "");
        assert_eq!(normalizer.carried_hierarchy(), [None, Some("AB-1001"), None]);
    }
}
