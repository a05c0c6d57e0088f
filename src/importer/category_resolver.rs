// ==========================================
// 商品目录导入系统 - 类目解析器
// ==========================================
// 职责: 类目路径名 -> 目录 id 的缓存解析
// 说明: 缓存与待写集的生命周期为单次导入任务
// ==========================================

use crate::domain::NewCategory;
use crate::importer::error::ImportResult;
use crate::repository::catalog_repo::CatalogImportRepository;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// 类目解析器
///
/// # 说明
/// 缓存已知的名称到 id 映射；未入库的名称先进入待写集，
/// 冲刷时以忽略冲突的批量插入落库并回查 id。
/// 批量冲刷后仍未命中的名称走单名补插兜底，兜底失败返回 None，
/// 由调用方按行计数而不是让整批失败
pub struct CategoryResolver {
    repo: Arc<dyn CatalogImportRepository>,
    cache: HashMap<String, i64>,
    pending: HashSet<String>,
}

impl CategoryResolver {
    pub fn new(repo: Arc<dyn CatalogImportRepository>) -> Self {
        CategoryResolver {
            repo,
            cache: HashMap::new(),
            pending: HashSet::new(),
        }
    }

    /// 登记一个类目路径名（已缓存的不再入待写集）
    pub fn note(&mut self, name: &str) {
        if !self.cache.contains_key(name) {
            self.pending.insert(name.to_string());
        }
    }

    /// 冲刷待写集：批量落库并回查 id 填充缓存
    pub async fn flush_pending(&mut self) -> ImportResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = self.pending.iter().cloned().collect();
        let categories: Vec<NewCategory> =
            names.iter().map(|n| NewCategory::from_name(n)).collect();

        self.repo.batch_insert_categories_ignore(categories).await?;

        let ids = self.repo.find_category_ids(&names).await?;
        debug!("类目冲刷: 待写 {} 个，回查到 {} 个", names.len(), ids.len());
        for (name, id) in ids {
            self.cache.insert(name, id);
        }

        self.pending.clear();
        Ok(())
    }

    /// 解析单个类目路径名
    ///
    /// # 返回
    /// * `Some(id)` - 命中缓存，或单名补插后回查成功
    /// * `None` - 落库与回查均未得到 id
    pub async fn resolve(&mut self, name: &str) -> ImportResult<Option<i64>> {
        if let Some(id) = self.cache.get(name) {
            return Ok(Some(*id));
        }

        // 单名兜底：补插 + 回查
        let lookup = vec![name.to_string()];
        self.repo
            .batch_insert_categories_ignore(vec![NewCategory::from_name(name)])
            .await?;
        let ids = self.repo.find_category_ids(&lookup).await?;

        match ids.get(name) {
            Some(id) => {
                self.cache.insert(name.to_string(), *id);
                Ok(Some(*id))
            }
            None => Ok(None),
        }
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
