// ==========================================
// 商品目录导入系统 - 字段提取器
// ==========================================
// 职责: 从无固定列序的行中启发式提取 SKU/名称/类目路径/价格
// 说明: 输入为归一化后的文本行（已修剪、已补延续值）
// ==========================================

/// SKU 候选的长度范围（字符数）
const SKU_MIN_CHARS: usize = 4;
const SKU_MAX_CHARS: usize = 40;

/// 类目路径层级分隔符
pub const CATEGORY_SEPARATOR: &str = " / ";

// ==========================================
// SKU 提取
// ==========================================

/// 扫描整行挑选 SKU
///
/// # 说明
/// 候选 = 去除所有空白后的单元格，要求仅含 `[A-Za-z0-9-/_.]` 且长度 4..=40。
/// 评分 = 字符数 + 5（含数字）+ 1（含 `-`）+ 1（含 `/`），
/// 取最高分，同分保留先出现者；无候选返回空串
pub fn pick_sku(cells: &[String]) -> String {
    let mut best = String::new();
    let mut best_score = 0usize;

    for cell in cells {
        if cell.is_empty() {
            continue;
        }

        let candidate: String = cell.split_whitespace().collect();
        if !is_sku_shaped(&candidate) {
            continue;
        }

        let mut score = candidate.len();
        if candidate.bytes().any(|b| b.is_ascii_digit()) {
            score += 5;
        }
        if candidate.contains('-') {
            score += 1;
        }
        if candidate.contains('/') {
            score += 1;
        }

        if score > best_score {
            best = candidate;
            best_score = score;
        }
    }

    best
}

/// SKU 字符集与长度检查（候选全为 ASCII，字节数即字符数）
fn is_sku_shaped(candidate: &str) -> bool {
    candidate.len() >= SKU_MIN_CHARS
        && candidate.len() <= SKU_MAX_CHARS
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'/' | b'_' | b'.'))
}

// ==========================================
// 价格提取
// ==========================================

/// 从右向左挑选价格
///
/// # 说明
/// 归一化：去掉不换行空格与普通空格，逗号转小数点；
/// 第一个完整匹配 `数字[.数字]` 的单元格即为价格，无则返回 None
pub fn pick_price(cells: &[String]) -> Option<f64> {
    for cell in cells.iter().rev() {
        if cell.is_empty() {
            continue;
        }

        let normalized: String = cell
            .chars()
            .filter(|ch| *ch != '\u{a0}' && *ch != ' ')
            .map(|ch| if ch == ',' { '.' } else { ch })
            .collect();

        if is_plain_decimal(&normalized) {
            if let Ok(value) = normalized.parse::<f64>() {
                return Some(value);
            }
        }
    }

    None
}

/// 完整匹配 `\d+(\.\d+)?`
fn is_plain_decimal(s: &str) -> bool {
    match s.split_once('.') {
        Some((whole, frac)) => {
            !whole.is_empty()
                && !frac.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()),
    }
}

// ==========================================
// 名称提取
// ==========================================

/// 挑选商品名称
///
/// # 参数
/// * `cells` - 归一化后的行（前四列为类目层级与品牌）
/// * `sku` - 已选定的 SKU
///
/// # 说明
/// 排除与层级/品牌列取值或 SKU 相同的单元格，
/// 其余取字符数最长者，同长保留先出现者；无候选返回空串
pub fn pick_name(cells: &[String], sku: &str) -> String {
    let skip: Vec<&str> = cells
        .iter()
        .take(4)
        .map(|s| s.as_str())
        .chain(std::iter::once(sku))
        .filter(|s| !s.is_empty())
        .collect();

    let mut best = "";
    let mut best_chars = 0usize;

    for cell in cells {
        if cell.is_empty() || skip.contains(&cell.as_str()) {
            continue;
        }

        let chars = cell.chars().count();
        if chars > best_chars {
            best = cell;
            best_chars = chars;
        }
    }

    best.to_string()
}

// ==========================================
// 类目路径
// ==========================================

/// 拼接类目路径
///
/// # 说明
/// 取前三列的非空值以 ` / ` 拼接；结果为空时回退为延续的层级值
pub fn category_path(cells: &[String], carried_hierarchy: &[Option<&str>; 3]) -> String {
    let joined = join_levels(cells.iter().take(3).map(|s| s.as_str()));
    if !joined.is_empty() {
        return joined;
    }

    if carried_hierarchy[0].is_some_and(|v| !v.is_empty()) {
        return join_levels(carried_hierarchy.iter().flatten().copied());
    }

    joined
}

fn join_levels<'a>(levels: impl Iterator<Item = &'a str>) -> String {
    levels
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(CATEGORY_SEPARATOR)
}

// ==========================================
// 长度截断
// ==========================================

/// 按字符数截断（多字节安全）
pub fn clamp_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
