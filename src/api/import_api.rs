// ==========================================
// 商品目录导入API
// ==========================================
// 职责: 导入任务提交、进度查询与长轮询
// 协议: 进度快照带单调递增 ver，终态 done=true 恰好一次
// ==========================================

use crate::api::error::ApiResult;
use crate::config::ImportConfig;
use crate::domain::ImportState;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::{open_row_source, ImportPipeline};
use crate::progress::{ProgressStore, ProgressTracker};
use crate::repository::catalog_repo::CatalogImportRepository;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

/// 导入任务提交响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartImportResponse {
    /// 任务令牌（进度查询凭据）
    pub token: String,
}

/// 导入API
pub struct ImportApi {
    repo: Arc<dyn CatalogImportRepository>,
    store: Arc<ProgressStore>,
    config: ImportConfig,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(
        repo: Arc<dyn CatalogImportRepository>,
        store: Arc<ProgressStore>,
        config: ImportConfig,
    ) -> Self {
        Self {
            repo,
            store,
            config,
        }
    }

    /// 启动导入任务
    ///
    /// # 参数
    /// - file_path: 目录文件路径（.xlsx/.xls/.csv）
    ///
    /// # 返回
    /// - Ok(StartImportResponse): 任务令牌，任务在后台执行
    ///
    /// # 说明
    /// 文件不可读等致命错误不在此处拦截，而是由任务本身
    /// 写入 error + done 终态，轮询方可见
    pub fn start_import(&self, file_path: &str) -> ApiResult<StartImportResponse> {
        let token = Uuid::new_v4().to_string();
        self.submit_import(file_path, &token);
        Ok(StartImportResponse { token })
    }

    /// 以既定令牌提交导入任务
    ///
    /// # 返回
    /// - JoinHandle: 任务句柄，可等待任务结束（CLI/测试用）
    pub fn submit_import(&self, file_path: &str, token: &str) -> JoinHandle<ImportResult<()>> {
        // 提交即创建零值状态，避免轮询方在任务起跑前读到缺失
        let tracker = ProgressTracker::new(self.store.clone(), token);
        tracker.init();

        let repo = self.repo.clone();
        let chunk_size = self.config.chunk_size;
        let file_path = file_path.to_string();

        info!("提交导入任务: token={}, file={}", tracker.token(), file_path);
        tokio::spawn(async move { run_import_job(repo, tracker, chunk_size, file_path).await })
    }

    /// 查询当前进度快照
    ///
    /// # 说明
    /// 令牌未知或状态已过期时返回零值终态快照
    pub fn get_progress(&self, token: &str) -> ImportState {
        self.store
            .get(token)
            .unwrap_or_else(|| ImportState::missing(0))
    }

    /// 长轮询进度
    ///
    /// # 参数
    /// - token: 任务令牌
    /// - since: 客户端已见的 ver
    ///
    /// # 返回
    /// - ver 超过 since 或任务结束时立即返回；
    ///   等待达到上限后无条件返回当前快照；
    ///   状态缺失时返回 ver=since 的零值终态快照
    pub async fn wait_progress(&self, token: &str, since: u64) -> ImportState {
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let deadline = Instant::now() + Duration::from_secs(self.config.poll_ceiling_secs);

        loop {
            let Some(state) = self.store.get(token) else {
                return ImportState::missing(since);
            };

            if state.ver > since || state.done {
                return state;
            }
            if Instant::now() >= deadline {
                // 超时兜底: 返回当前快照
                return state;
            }

            tokio::time::sleep(interval).await;
        }
    }
}

// ==========================================
// 任务执行
// ==========================================

/// 执行一次导入任务
///
/// # 说明
/// 致命错误与崩溃都会写 error + done；
/// 终态写（done + finished_at）在成功与失败路径上都保证执行
async fn run_import_job(
    repo: Arc<dyn CatalogImportRepository>,
    tracker: ProgressTracker,
    chunk_size: usize,
    file_path: String,
) -> ImportResult<()> {
    tracker.init();

    let job = AssertUnwindSafe(async {
        let source = open_row_source(&file_path)?;
        let mut pipeline = ImportPipeline::new(repo, tracker.clone(), chunk_size);
        pipeline.run(source).await
    });

    let result = match job.catch_unwind().await {
        Ok(Ok(())) => {
            info!("导入任务完成: token={}", tracker.token());
            Ok(())
        }
        Ok(Err(e)) => {
            error!("导入任务失败: token={}, error={}", tracker.token(), e);
            tracker.mark_failed(&format!("导入失败: {}", e));
            Err(e)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("导入任务崩溃: token={}, panic={}", tracker.token(), message);
            tracker.mark_failed(&format!("导入失败: {}", message));
            Err(ImportError::InternalError(message))
        }
    };

    // 成败都写终态（done + finished_at）
    tracker.mark_done();
    result
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "任务内部崩溃".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_sqlite_connection};
    use crate::repository::catalog_repo_impl::CatalogImportRepositoryImpl;
    use tempfile::TempDir;

    struct Fixture {
        api: ImportApi,
        store: Arc<ProgressStore>,
        _dir: TempDir,
    }

    fn fast_config() -> ImportConfig {
        ImportConfig {
            chunk_size: 200,
            progress_retention_secs: 3600,
            poll_interval_ms: 10,
            poll_ceiling_secs: 1,
        }
    }

    fn setup() -> Fixture {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("catalog.db");
        let db_path = db_path.to_str().unwrap();

        let conn = open_sqlite_connection(db_path).unwrap();
        init_schema(&conn).unwrap();
        drop(conn);

        let store = Arc::new(ProgressStore::new(3600));
        let repo: Arc<dyn CatalogImportRepository> =
            Arc::new(CatalogImportRepositoryImpl::new(db_path).unwrap());

        Fixture {
            api: ImportApi::new(repo, store.clone(), fast_config()),
            store,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_wait_progress_unknown_token_returns_done_snapshot() {
        let fixture = setup();

        let state = fixture.api.wait_progress("no-such-token", 7).await;
        assert!(state.done);
        assert_eq!(state.ver, 7);
        assert_eq!(state.total, 0);
    }

    #[tokio::test]
    async fn test_wait_progress_wakes_on_version_advance() {
        let fixture = setup();
        fixture.store.init_if_absent("job-1");

        let store = fixture.store.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            store.update("job-1", |state| state.total += 1);
        });

        let state = fixture.api.wait_progress("job-1", 0).await;
        assert_eq!(state.ver, 1);
        assert_eq!(state.total, 1);
    }

    #[tokio::test]
    async fn test_wait_progress_returns_done_state_without_new_version() {
        let fixture = setup();
        fixture.store.init_if_absent("job-1");
        fixture.store.update("job-1", |state| state.done = true);

        // since 已经等于当前 ver，done 仍应立即返回
        let current = fixture.api.get_progress("job-1").ver;
        let state = fixture.api.wait_progress("job-1", current).await;
        assert!(state.done);
        assert_eq!(state.ver, current);
    }

    #[tokio::test]
    async fn test_wait_progress_ceiling_returns_current_snapshot() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("catalog.db");
        let db_path = db_path.to_str().unwrap();
        let conn = open_sqlite_connection(db_path).unwrap();
        init_schema(&conn).unwrap();
        drop(conn);

        let store = Arc::new(ProgressStore::new(3600));
        let repo: Arc<dyn CatalogImportRepository> =
            Arc::new(CatalogImportRepositoryImpl::new(db_path).unwrap());
        let config = ImportConfig {
            poll_ceiling_secs: 0,
            ..fast_config()
        };
        let api = ImportApi::new(repo, store.clone(), config);

        store.init_if_absent("job-1");
        store.update("job-1", |state| state.total = 5);

        // ver 未超过 since 且未结束，等待上限为零时直接返回快照
        let state = api.wait_progress("job-1", 1).await;
        assert_eq!(state.total, 5);
        assert_eq!(state.ver, 1);
        assert!(!state.done);
    }

    #[tokio::test]
    async fn test_start_import_returns_pollable_token() {
        let fixture = setup();

        let resp = fixture
            .api
            .start_import("/no/such/catalog.csv")
            .expect("提交本身应成功，错误由任务终态承载");
        assert!(!resp.token.is_empty());

        // 提交时已同步写入占位快照
        assert!(fixture.store.get(&resp.token).is_some());

        let state = fixture.api.wait_progress(&resp.token, 0).await;
        assert!(state.done);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_submit_import_records_fatal_error_state() {
        let fixture = setup();

        let handle = fixture.api.submit_import("/no/such/catalog.csv", "job-err");
        let result = handle.await.unwrap();
        assert!(result.is_err());

        let state = fixture.api.get_progress("job-err");
        assert!(state.done);
        assert!(state.error.as_deref().unwrap_or("").contains("导入失败"));
        assert!(state.finished_at.is_some());
        // 失败路径: mark_failed + mark_done 共两次状态写
        assert_eq!(state.ver, 2);
    }
}
