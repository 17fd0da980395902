//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use crate::config::Config;
use crate::models::question::WrittenExam;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`，否则默认 info 级别，`verbose` 时为 debug。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 试卷乱序生成");
    info!("📁 题目目录: {}", config.question_folder.display());
    info!("📂 输出目录: {}", config.output_folder().display());
    info!("📋 试卷版本: {}", config.versions.join(", "));
    match config.seed {
        Some(seed) => info!("🎲 随机种子: {}", seed),
        None => info!("🎲 随机种子: 未设置（每次结果不同）"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
pub fn log_sources_loaded(total: usize, folder: &Path) {
    info!("✓ 在 {} 中找到 {} 道题目", folder.display(), total);
}

/// 记录版本开始信息
pub fn log_version_start(version: &str, question_count: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📦 [版本 {}] 开始组卷，共 {} 道题目", version, question_count);
}

/// 记录版本完成信息
pub fn log_version_complete(written: &WrittenExam) {
    info!(
        "[版本 {}] ✓ 答案卷: {}",
        written.version,
        written.solution_path.display()
    );
    info!(
        "[版本 {}] ✓ 学生卷: {}",
        written.version,
        written.student_path.display()
    );
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功版本数
/// - `failed`: 失败版本数
/// - `total`: 版本总数
pub fn print_final_stats(success: usize, failed: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_text("中文题干测试", 2), "中文...");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
