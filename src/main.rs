// ==========================================
// 商品目录导入系统 - CLI 主入口
// ==========================================
// 技术栈: Rust + SQLite + Tokio
// 用法: catalog-importer <目录文件> [数据库路径]
// ==========================================

use catalog_importer::app::{get_default_db_path, AppState};
use catalog_importer::domain::ImportState;

#[tokio::main]
async fn main() {
    // 初始化日志系统
    catalog_importer::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", catalog_importer::APP_NAME);
    tracing::info!("系统版本: {}", catalog_importer::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let Some(file_path) = args.next() else {
        eprintln!("用法: catalog-importer <目录文件.xlsx|.xls|.csv> [数据库路径]");
        std::process::exit(2);
    };
    let db_path = args.next().unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    // 提交任务，随后用长轮询跟踪进度（与服务端轮询协议同一条路径）
    let token = uuid::Uuid::new_v4().to_string();
    let handle = state.import_api.submit_import(&file_path, &token);
    println!("导入任务已提交: token={}", token);

    let mut since = 0u64;
    let final_state = loop {
        let snapshot = state.import_api.wait_progress(&token, since).await;
        println!(
            "进度: 总计 {} / 已导入 {} / 已跳过 {} (ver {})",
            snapshot.total, snapshot.imported, snapshot.skipped, snapshot.ver
        );
        if snapshot.done {
            break snapshot;
        }
        since = snapshot.ver;
    };

    print_summary(&final_state);

    // 任务句柄此时已接近完成，以其结果决定退出码
    match handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("导入失败: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("导入任务异常终止: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_summary(state: &ImportState) {
    println!("==================================================");
    println!("导入完成");
    println!("  总计行数: {}", state.total);
    println!("  已导入:   {}", state.imported);
    println!("  已跳过:   {}", state.skipped);
    if !state.reasons.is_empty() {
        println!("  跳过原因:");
        for (code, count) in &state.reasons {
            println!("    - {}: {}", code, count);
        }
    }
    if let Some(error) = &state.error {
        println!("  错误: {}", error);
    }
    println!("==================================================");
}
