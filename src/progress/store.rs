// ==========================================
// 商品目录导入系统 - 进度快照存储
// ==========================================
// 职责: 按任务令牌存取进度快照，带保留时间（TTL）
// 并发: 单写多读（每个令牌同时只有一条流水线在写）
// 说明: 每次写入刷新过期时间；过期条目在读取时视同不存在并被移除
// ==========================================

use crate::domain::ImportState;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// 存储条目：快照 + 过期时刻
#[derive(Debug, Clone)]
struct StoredSnapshot {
    state: ImportState,
    expires_at: DateTime<Utc>,
}

impl StoredSnapshot {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// ==========================================
// ProgressStore
// ==========================================
pub struct ProgressStore {
    entries: RwLock<HashMap<String, StoredSnapshot>>,
    retention: Duration,
}

impl ProgressStore {
    /// 创建存储
    ///
    /// # 参数
    /// - retention_secs: 快照自最后一次写入起的保留秒数
    pub fn new(retention_secs: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention: Duration::seconds(retention_secs as i64),
        }
    }

    /// 初始化令牌对应的快照（已存在则仅刷新过期时间，不改动内容）
    pub fn init_if_absent(&self, token: &str) {
        let now = Utc::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let entry = entries
            .entry(token.to_string())
            .or_insert_with(|| StoredSnapshot {
                state: ImportState::zero(),
                expires_at: now + self.retention,
            });

        // 过期残留视同不存在：重置为零值快照
        if entry.is_expired(now) {
            entry.state = ImportState::zero();
        }
        entry.expires_at = now + self.retention;
    }

    /// 原子变更：应用增量、版本号 +1、刷新过期时间
    ///
    /// # 说明
    /// - 令牌不存在（或已过期）时从零值快照开始应用
    /// - 版本号在回调之后统一 +1，保证"每次变更严格递增"
    pub fn update<F>(&self, token: &str, mutate: F)
    where
        F: FnOnce(&mut ImportState),
    {
        let now = Utc::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let entry = entries
            .entry(token.to_string())
            .or_insert_with(|| StoredSnapshot {
                state: ImportState::zero(),
                expires_at: now + self.retention,
            });

        if entry.is_expired(now) {
            entry.state = ImportState::zero();
        }

        mutate(&mut entry.state);
        entry.state.ver += 1;
        entry.expires_at = now + self.retention;
    }

    /// 读取令牌对应的最新快照（过期视同不存在并移除）
    pub fn get(&self, token: &str) -> Option<ImportState> {
        let now = Utc::now();

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(token) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.state.clone()),
                Some(_) => {}
            }
        }

        // 过期条目：升级为写锁移除（双重检查，避免与写侧竞争）
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(token) {
            if entry.is_expired(now) {
                entries.remove(token);
            } else {
                return Some(entry.state.clone());
            }
        }
        None
    }
}
