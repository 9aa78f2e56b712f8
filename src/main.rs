use anyhow::{Context, Result};
use citation_batch::models::load_input_files;
use citation_batch::utils::logging;
use citation_batch::{BatchProcessor, Config, VerifyClient};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = load_config()?;

    // 初始化日志
    logging::init(&config.log_filter);
    logging::log_startup(config.concurrency_cap(), &config.api_base_url);

    let client = VerifyClient::new(&config).context("无法创建校验客户端")?;
    match client.health_check().await {
        Ok(health) => info!("✓ 校验服务状态: {} ({})", health.status, health.timestamp),
        Err(e) => warn!("⚠️ 校验服务健康检查失败: {}", e),
    }

    // 加载待处理文件
    info!("\n📁 正在扫描待处理的文件...");
    let files = load_input_files(&config.input_folder).await?;
    if files.is_empty() {
        warn!("⚠️ 没有找到待处理的文件，程序结束");
        return Ok(());
    }

    let loaded = files.len();
    let processor = BatchProcessor::new(config.clone(), Arc::new(client));
    let enqueued = processor.enqueue(files);
    logging::log_files_loaded(loaded, enqueued.accepted.len(), enqueued.rejected.len());
    for rejected in &enqueued.rejected {
        warn!("⚠️ {}", rejected);
    }

    // Ctrl-C 时停止启动新的文件
    let processor = Arc::new(processor);
    let canceller = processor.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    processor.run().await;

    let report = processor.report();
    info!(
        "📊 结果: 通过 {}, 可疑 {}, 失败 {} / 共 {} 条",
        report.summary.verified,
        report.summary.suspicious,
        report.summary.failed,
        report.total()
    );
    for failure in &report.errors {
        warn!("❌ {}: {}", failure.file_name, failure.message);
    }

    let csv = processor.export_csv()?;
    tokio::fs::write(&config.output_csv, csv)
        .await
        .with_context(|| format!("无法写入报告: {}", config.output_csv))?;
    info!("\n报告已保存至: {}", config.output_csv);

    Ok(())
}

/// `CONFIG_FILE` 或当前目录下的 config.toml，都不存在时只读环境变量
fn load_config() -> Result<Config> {
    let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        Ok(Config::from_toml_file(&path)?)
    } else {
        Ok(Config::from_env())
    }
}
