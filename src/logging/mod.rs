//! 日志初始化模块.
//!
//! 双输出 (统一级别):
//! - console: 彩色, 写到 stderr (stdout 留给宏块摘要)
//! - file: 无色, 无 target, 按天滚动
//!
//! 级别体系 (优先级: MBVIEW_LOG 环境变量 > 命令行 > 默认):
//! - 默认:   info  (文件读取、记录数、错误)
//! - `-v`:   debug (字节序、剩余字节、导出路径)
//! - `-vv`:  trace (仅 mbview 项目 crate, 第三方依赖保持 info)
//! - `-vvv`: trace (全局, 含第三方依赖)
//!
//! 日志文件输出到 {directory}/{prefix}.{date}.log, 启动时清理过期日志.
//! 日志目录不可写时只保留 console 输出.

mod maintenance;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub use maintenance::cleanup_logs;

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// 覆盖日志级别的环境变量 (EnvFilter 语法)
pub const LOG_ENV: &str = "MBVIEW_LOG";

/// 本项目所有 crate 的 target 前缀 (用于 -vv 级别的定向 trace)
const MBVIEW_CRATE_TARGETS: &[&str] = &["mbview", "mbview_core", "mbview_render"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 日志文件前缀 (如 "mbview")
    pub file_prefix: String,
    /// 日志目录
    pub directory: String,
    /// 0=info, 1=debug, 2=trace(mbview), 3+=trace(all)
    #[serde(default)]
    pub verbosity: u8,
    /// 日志保留天数
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// 是否把历史日志压缩为 .gz
    #[serde(default = "default_true")]
    pub compress_history: bool,
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> i64 {
    14
}

impl LoggingConfig {
    /// 默认输出到 $cwd/logs
    pub fn new(file_prefix: &str, verbosity: u8) -> Self {
        Self {
            file_prefix: file_prefix.to_string(),
            directory: "logs".to_string(),
            verbosity,
            retention_days: default_retention_days(),
            compress_history: true,
        }
    }
}

/// 根据 verbosity 生成过滤指令
///
/// - 0: info
/// - 1: debug
/// - 2: trace (仅 mbview crate, 第三方依赖保持 info)
/// - 3+: trace (全局, 含第三方依赖)
pub fn filter_directives(verbosity: u8) -> String {
    match verbosity {
        0 => "info".to_string(),
        1 => "debug".to_string(),
        2 => {
            let mut directives = MBVIEW_CRATE_TARGETS
                .iter()
                .map(|t| format!("{t}=trace"))
                .collect::<Vec<_>>();
            directives.push("info".to_string());
            directives.join(",")
        }
        _ => "trace".to_string(),
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(filter_directives(verbosity)))
}

/// 初始化日志系统
///
/// 全局订阅器只能安装一次, 重复调用返回错误.
/// 日志目录或文件无法创建时退化为仅 console 输出, 不影响状态信息显示.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let (file_writer, file_error) = match open_file_writer(config) {
        Ok(writer) => (Some(writer), None),
        Err(err) => (None, Some(err)),
    };

    let console_layer = fmt::Layer::default()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .event_format(ConsoleFormatter)
        .with_filter(build_filter(config.verbosity));

    let file_layer = file_writer.map(|writer| {
        fmt::Layer::default()
            .with_writer(writer)
            .with_ansi(false)
            .event_format(FileFormatter)
            .with_filter(build_filter(config.verbosity))
    });

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("日志系统已初始化")?;

    match file_error {
        Some(err) => tracing::warn!("日志文件不可用, 仅输出到 console: {:#}", err),
        None => {
            if let Err(err) = cleanup_logs(config) {
                tracing::warn!("清理历史日志失败: {:#}", err);
            }
        }
    }

    Ok(())
}

/// 创建按天滚动的日志文件写入器
fn open_file_writer(config: &LoggingConfig) -> Result<NonBlocking> {
    std::fs::create_dir_all(&config.directory)
        .with_context(|| format!("创建日志目录失败, path={}", config.directory))?;

    let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(&config.directory)
        .context("创建日志文件失败")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    LOG_GUARD.set(guard).ok();
    Ok(non_blocking)
}

/// Console 格式: 彩色, 带时间戳
struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let meta = event.metadata();
        let color = match *meta.level() {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            _ => "\x1b[34m",
        };
        write!(
            writer,
            "[{:02}:{:02}:{:02}.{:03}] {}{:5}\x1b[0m > ",
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis(),
            color,
            meta.level(),
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// File 格式: 无色, 带日期与源码位置
struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let meta = event.metadata();
        write!(
            writer,
            "[{:02}-{:02} {:02}:{:02}:{:02}.{:03}] {:5} {}:{} > ",
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis(),
            meta.level(),
            meta.file().unwrap_or("unknown"),
            meta.line().unwrap_or(0)
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
