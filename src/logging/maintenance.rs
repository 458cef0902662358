//! 历史日志维护: 压缩过往日期的日志, 删除超过保留期的日志.
//!
//! mbview 是短生命周期的交互工具, 只在启动时执行一次, 不需要后台任务.

use super::LoggingConfig;
use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// 清理日志目录 (以今天为基准)
pub fn cleanup_logs(config: &LoggingConfig) -> Result<()> {
    cleanup_logs_at(config, Local::now().date_naive())
}

fn cleanup_logs_at(config: &LoggingConfig, today: NaiveDate) -> Result<()> {
    let directory = Path::new(&config.directory);
    if !directory.exists() {
        return Ok(());
    }

    let cutoff = today - ChronoDuration::days(config.retention_days);

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let file_path = entry.path();

        let Some((date, compressed)) = parse_rotated_log_name(&file_name, &config.file_prefix)
        else {
            continue;
        };

        if date < cutoff {
            let _ = fs::remove_file(&file_path);
            continue;
        }

        if config.compress_history && !compressed && date < today {
            compress_to_gz(&file_path)?;
        }
    }

    Ok(())
}

fn compress_to_gz(path: &Path) -> Result<()> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    if gz_path.exists() {
        return Ok(());
    }

    let mut input =
        File::open(path).with_context(|| format!("打开待压缩日志失败, path={}", path.display()))?;
    let output = File::create(&gz_path)
        .with_context(|| format!("创建压缩日志失败, path={}", gz_path.display()))?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
        .with_context(|| format!("删除已压缩日志失败, path={}", path.display()))?;
    Ok(())
}

/// 解析 "{prefix}.{YYYY-MM-DD}.log[.gz]", 返回 (日期, 是否已压缩)
fn parse_rotated_log_name(file_name: &str, prefix: &str) -> Option<(NaiveDate, bool)> {
    let with_prefix = file_name.strip_prefix(prefix)?;
    let with_dot = with_prefix.strip_prefix('.')?;

    if let Some(date_part) = with_dot.strip_suffix(".log") {
        return Some((parse_date(date_part)?, false));
    }

    if let Some(date_part) = with_dot.strip_suffix(".log.gz") {
        return Some((parse_date(date_part)?, true));
    }

    None
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
