// ==========================================
// 商品目录导入系统 - 应用状态
// ==========================================
// 职责: 装配数据库、仓储、进度存储与API实例
// ==========================================

use std::sync::Arc;

use crate::api::ImportApi;
use crate::config::ImportConfig;
use crate::db::{init_schema, open_sqlite_connection};
use crate::progress::ProgressStore;
use crate::repository::catalog_repo::CatalogImportRepository;
use crate::repository::catalog_repo_impl::CatalogImportRepositoryImpl;

/// 应用状态
///
/// 持有API实例和共享资源，进程内唯一
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 导入配置
    pub config: ImportConfig,

    /// 进度存储（与API共享，便于诊断）
    pub progress_store: Arc<ProgressStore>,

    /// 目录导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并初始化表结构
    /// 2. 初始化Repository与进度存储
    /// 3. 创建API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let config = ImportConfig::from_env();

        // 建库建表（仓储随后各自持有连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化表结构: {}", e))?;
        drop(conn);

        let repo: Arc<dyn CatalogImportRepository> = Arc::new(
            CatalogImportRepositoryImpl::new(&db_path)
                .map_err(|e| format!("无法创建CatalogImportRepository: {}", e))?,
        );

        let progress_store = Arc::new(ProgressStore::new(config.progress_retention_secs));

        let import_api = Arc::new(ImportApi::new(
            repo,
            progress_store.clone(),
            config.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            progress_store,
            import_api,
        })
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 开发环境: 用户数据目录/catalog-import-dev/catalog_import.db
/// - 生产环境: 用户数据目录/catalog-import/catalog_import.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("CATALOG_IMPORT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，拿到 data_dir 后再覆盖
    let mut path = PathBuf::from("./catalog_import.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("catalog-import-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("catalog-import");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("catalog_import.db");
    }

    path.to_string_lossy().to_string()
}
