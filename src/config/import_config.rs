// ==========================================
// 商品目录导入系统 - 导入配置
// ==========================================
// 职责: 流水线批量大小、进度保留时间、轮询节奏
// 说明: 进程级参数，环境变量覆写；非法值回退默认并告警
// ==========================================

use tracing::warn;

/// 默认批量写入大小（行）
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// 默认进度快照保留时间（秒）
pub const DEFAULT_PROGRESS_RETENTION_SECS: u64 = 3_600;

/// 默认轮询重查间隔（毫秒）
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// 默认轮询等待上限（秒）
pub const DEFAULT_POLL_CEILING_SECS: u64 = 25;

/// 导入配置
///
/// # 字段
/// - chunk_size: 产品缓冲达到该行数即触发一次批量落库
/// - progress_retention_secs: 进度快照自最后一次写入起的保留时间
/// - poll_interval_ms: 长轮询在存储上的重查间隔
/// - poll_ceiling_secs: 长轮询的阻塞等待上限
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub chunk_size: usize,
    pub progress_retention_secs: u64,
    pub poll_interval_ms: u64,
    pub poll_ceiling_secs: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress_retention_secs: DEFAULT_PROGRESS_RETENTION_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_ceiling_secs: DEFAULT_POLL_CEILING_SECS,
        }
    }
}

impl ImportConfig {
    /// 从环境变量构建配置
    ///
    /// # 环境变量
    /// - CATALOG_IMPORT_CHUNK_SIZE
    /// - CATALOG_IMPORT_RETENTION_SECS
    /// - CATALOG_IMPORT_POLL_INTERVAL_MS
    /// - CATALOG_IMPORT_POLL_CEILING_SECS
    ///
    /// # 说明
    /// - 未设置或解析失败时使用默认值（解析失败产生 warn 日志）
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chunk_size: read_env("CATALOG_IMPORT_CHUNK_SIZE", defaults.chunk_size),
            progress_retention_secs: read_env(
                "CATALOG_IMPORT_RETENTION_SECS",
                defaults.progress_retention_secs,
            ),
            poll_interval_ms: read_env(
                "CATALOG_IMPORT_POLL_INTERVAL_MS",
                defaults.poll_interval_ms,
            ),
            poll_ceiling_secs: read_env(
                "CATALOG_IMPORT_POLL_CEILING_SECS",
                defaults.poll_ceiling_secs,
            ),
        }
    }
}

/// 读取并解析单个环境变量，失败时回退默认值
fn read_env<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = key, value = %raw, "环境变量解析失败，使用默认值");
                default
            }
        },
        Err(_) => default,
    }
}
