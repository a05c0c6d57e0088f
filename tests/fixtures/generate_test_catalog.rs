// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成目录导入测试用 CSV 文件
// 输出: tests/fixtures/sample_catalog.csv
// ==========================================

use csv::Writer;
use std::error::Error;

// CSV 表头（与线上导出格式一致: 三级目录 + 品牌 + 商品字段）
const CSV_HEADER: &[&str] = &[
    "Категория 1",
    "Категория 2",
    "Категория 3",
    "Бренд",
    "Артикул",
    "Наименование",
    "Цена",
];

// 样例数据行
//
// 覆盖的场景:
// - 空目录单元格继承上一行层级（carry-forward）
// - 重复 SKU（第 5 行重复第 1 行）
// - 全空行（静默跳过，不计数）
// - 千分位空格/逗号小数的价格写法
// - 无 SKU 行与表尾合计行（按 invalid 跳过）
const SAMPLE_ROWS: &[&[&str]] = &[
    &[
        "Электроника",
        "Телефоны",
        "Смартфоны",
        "",
        "SM-G991",
        "Смартфон Galaxy S21 128GB",
        "74 990,00",
    ],
    &["", "", "", "", "SM-A525", "Смартфон Galaxy A52", "34990"],
    &[
        "",
        "Ноутбуки",
        "Ультрабуки",
        "",
        "NB-X512",
        "Ноутбук VivoBook 15",
        "45 990,50",
    ],
    &["", "", "", "", "NB-X515", "Ноутбук VivoBook 15 OLED", "47990.99"],
    &[
        "Электроника",
        "Телефоны",
        "Смартфоны",
        "",
        "SM-G991",
        "Смартфон Galaxy S21 повтор",
        "74 990,00",
    ],
    &["", "", "", "", "", "", ""],
    &[
        "Бытовая техника",
        "Кухня",
        "Чайники",
        "",
        "KT-2210",
        "Чайник электрический 1.7 л",
        "2490",
    ],
    &["", "", "", "", "без артикула", "Товар без артикула", "999"],
    &["Итого: 7 позиций", "", "", "", "", "", ""],
];

fn main() -> Result<(), Box<dyn Error>> {
    let output_path = "tests/fixtures/sample_catalog.csv";

    let mut writer = Writer::from_path(output_path)?;
    writer.write_record(CSV_HEADER)?;
    for row in SAMPLE_ROWS {
        writer.write_record(*row)?;
    }
    writer.flush()?;

    println!("✓ 已生成: {} ({} 行)", output_path, SAMPLE_ROWS.len() + 1);
    Ok(())
}
