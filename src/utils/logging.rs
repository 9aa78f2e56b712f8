/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先，否则使用传入的过滤规则；重复初始化时静默忽略
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(max_concurrent: usize, api_base_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量引用校验模式");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("🌐 校验服务: {}", api_base_url);
    info!("{}", "=".repeat(60));
}

/// 记录文件加载信息
///
/// # 参数
/// - `loaded`: 读取到的文件数
/// - `accepted`: 入队成功的文件数
/// - `rejected`: 因格式不支持被拒绝的文件数
pub fn log_files_loaded(loaded: usize, accepted: usize, rejected: usize) {
    info!("✓ 找到 {} 个文件", loaded);
    info!("📋 入队 {} 个, 拒绝 {} 个", accepted, rejected);
}

/// 记录批次开始信息
pub fn log_batch_start(total: usize, max_concurrent: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理 {} 个文件 (并发上限 {})", total, max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `elapsed`: 批次耗时
pub fn print_final_stats(success: usize, failed: usize, total: usize, elapsed: Duration) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("⏱️ 耗时: {:.2}s", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
