// ==========================================
// 商品目录导入系统 - 进度跟踪器
// ==========================================
// 职责: 单个导入任务的进度写入句柄
// 协议: 每次写操作 = 应用增量 + 重算快照 + ver+1 + 持久化（刷新 TTL）
// 约束: 同一令牌同时只有一条流水线在写（last-writer-wins，无 CAS）
// ==========================================

use crate::domain::{CounterField, ImportState, ReasonCode};
use crate::progress::store::ProgressStore;
use chrono::Utc;
use std::sync::Arc;

// ==========================================
// ProgressTracker
// ==========================================
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<ProgressStore>,
    token: String,
}

impl ProgressTracker {
    pub fn new(store: Arc<ProgressStore>, token: impl Into<String>) -> Self {
        Self {
            store,
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// 任务提交/启动时初始化零值快照（已存在则保留现状，仅刷新 TTL）
    pub fn init(&self) {
        self.store.init_if_absent(&self.token);
    }

    /// 计数器 +1
    pub fn bump(&self, field: CounterField) {
        self.bump_by(field, 1);
    }

    /// 计数器按增量累加（增量为 0 时不产生任何写入，版本号不变）
    pub fn bump_by(&self, field: CounterField, delta: u64) {
        if delta == 0 {
            return;
        }

        self.store.update(&self.token, |state| match field {
            CounterField::Total => state.total += delta,
            CounterField::Imported => state.imported += delta,
            CounterField::Skipped => state.skipped += delta,
        });
    }

    /// 跳过记录：skipped 与 reasons[code] 同步累加，合并为一次版本变更
    pub fn skip_with_reason(&self, code: ReasonCode, delta: u64) {
        if delta == 0 {
            return;
        }

        self.store.update(&self.token, |state| {
            state.skipped += delta;
            *state
                .reasons
                .entry(code.as_str().to_string())
                .or_insert(0) += delta;
        });
    }

    /// 致命失败：写入错误消息并置 done（终态守卫随后仍会写 finished_at）
    pub fn mark_failed(&self, message: &str) {
        let message = message.to_string();
        self.store.update(&self.token, move |state| {
            state.error = Some(message);
            state.done = true;
        });
    }

    /// 终态写入：done=true + finished_at（成功与失败路径都必须执行）
    pub fn mark_done(&self) {
        self.store.update(&self.token, |state| {
            state.done = true;
            state.finished_at = Some(Utc::now());
        });
    }

    /// 读取当前快照（测试与日志用）
    pub fn snapshot(&self) -> Option<ImportState> {
        self.store.get(&self.token)
    }
}
