// ==========================================
// 商品目录导入系统 - 进度快照领域模型
// ==========================================
// 职责: 导入任务的计数器快照与版本号协议
// 协议: ver 每次变更严格 +1；done 一旦为 true 不再回退
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// CounterField - 可增量的计数器字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    /// 已处理行数（表头/空行不计）
    Total,
    /// 实际落库行数
    Imported,
    /// 被跳过行数（与 reasons 同步累计）
    Skipped,
}

impl CounterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterField::Total => "total",
            CounterField::Imported => "imported",
            CounterField::Skipped => "skipped",
        }
    }
}

// ==========================================
// ReasonCode - 跳过原因代码
// ==========================================
// reasons 映射保持字符串键，新增代码不破坏读方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    /// 缺 SKU/目录路径，或落库时目录解析失败
    Invalid,
    /// SKU 与已持久化记录冲突（INSERT OR IGNORE 跳过）
    Duplicate,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Invalid => "invalid",
            ReasonCode::Duplicate => "duplicate",
        }
    }
}

// ==========================================
// ImportState - 进度快照
// ==========================================
// 轮询协议: 读方携带 since 版本号，ver > since 即有新内容
// 最终一致: total = imported + skipped 仅在批量落库后成立，
//           中间读取允许出现瞬时不一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportState {
    pub total: u64,
    pub imported: u64,
    pub skipped: u64,
    pub reasons: BTreeMap<String, u64>,
    pub ver: u64,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ImportState {
    /// 任务提交时的初始快照（全零，ver=0，未完成）
    pub fn zero() -> Self {
        Self {
            total: 0,
            imported: 0,
            skipped: 0,
            reasons: BTreeMap::new(),
            ver: 0,
            done: false,
            error: None,
            finished_at: None,
        }
    }

    /// 未知/已过期令牌的回退快照
    ///
    /// # 说明
    /// - ver 沿用读方携带的 since，使读方不会误判为有新内容
    /// - done=true，使轮询端立即返回而非等满超时
    pub fn missing(since: u64) -> Self {
        Self {
            total: 0,
            imported: 0,
            skipped: 0,
            reasons: BTreeMap::new(),
            ver: since,
            done: true,
            error: None,
            finished_at: None,
        }
    }

    /// 读取某个原因代码的累计数（缺省为 0）
    pub fn reason_count(&self, code: ReasonCode) -> u64 {
        self.reasons.get(code.as_str()).copied().unwrap_or(0)
    }
}

impl Default for ImportState {
    fn default() -> Self {
        Self::zero()
    }
}
