//! mbview - 宏块预测转储数据查看工具
//!
//! 依次打开候选转储文件, 把每条 522 字节记录显示为左右两栏灰度对比图,
//! 并在标准输出打印摘要. 两个宏块之间等待回车.
//!
//! 无界面场景可用 `--export <DIR>` 导出 PNG, 或 `--json` 只输出摘要.

mod window;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use mbview::core::{
    Driver, DriverConfig, Endianness, FileOutcome, NoPause, NullViewer, Pause, PromptPause,
    RecordViewer, RunReport, SummaryFormat,
};
use mbview::logging::{self, LoggingConfig};
use mbview::render::{PngExporter, RenderOptions};

use window::WindowViewer;

#[derive(Parser, Debug)]
#[command(name = "mbview", version, about = "宏块预测转储数据查看工具")]
struct Cli {
    /// 转储文件 (缺省时依次尝试 pred_inputs_p.bin, pred_inputs_i4.bin, pred_inputs_i16.bin)
    files: Vec<PathBuf>,

    /// mb_x / mb_y 的字节序 (native, little, big)
    #[arg(long, default_value = "native", value_parser = parse_endian)]
    endian: Endianness,

    /// 导出 PNG 到指定目录, 不打开窗口
    #[arg(long, value_name = "DIR", conflicts_with = "json")]
    export: Option<PathBuf>,

    /// 每个样本放大倍数
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u16).range(1..=64))]
    scale: u16,

    /// 以 JSON 行输出摘要, 不显示图像
    #[arg(long)]
    json: bool,

    /// 两个宏块之间不等待回车
    #[arg(long)]
    no_wait: bool,

    /// 每个文件从第几个宏块开始
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// 每个文件最多显示多少个宏块
    #[arg(long)]
    limit: Option<usize>,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// 是否需要在宏块之间等待用户
    fn interactive(&self) -> bool {
        !(self.no_wait || self.json || self.export.is_some())
    }

    fn driver_config(&self) -> DriverConfig {
        let candidates = if self.files.is_empty() {
            DriverConfig::default_candidates()
        } else {
            self.files.clone()
        };
        DriverConfig {
            candidates,
            endian: self.endian,
            start: self.start,
            limit: self.limit,
            summary: if self.json {
                SummaryFormat::Json
            } else {
                SummaryFormat::Text
            },
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            scale: self.scale as usize,
            ..Default::default()
        }
    }
}

fn parse_endian(value: &str) -> Result<Endianness, String> {
    Endianness::from_name(value).ok_or_else(|| format!("未知字节序: {value}"))
}

fn build_viewer(cli: &Cli) -> mbview::core::MbResult<Box<dyn RecordViewer>> {
    if cli.json {
        return Ok(Box::new(NullViewer));
    }
    match &cli.export {
        Some(dir) => Ok(Box::new(PngExporter::new(dir, cli.render_options())?)),
        None => Ok(Box::new(WindowViewer::new(cli.render_options()))),
    }
}

/// 进程退出码
///
/// 任一文件处理失败返回 1; 显式指定的文件不存在也返回 1.
/// 默认候选列表中的文件缺失属于正常情况.
fn exit_code(report: &RunReport, explicit_files: bool) -> u8 {
    let any_failed = report.failed() > 0;
    let missing_explicit = explicit_files
        && report
            .files
            .iter()
            .any(|(_, outcome)| matches!(outcome, FileOutcome::NotFound));
    if any_failed || missing_explicit { 1 } else { 0 }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&LoggingConfig::new("mbview", cli.verbose)) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    info!("mbview 版本 {}", mbview::version());

    let mut viewer = match build_viewer(&cli) {
        Ok(viewer) => viewer,
        Err(e) => {
            error!("无法创建查看器: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut pause: Box<dyn Pause> = if cli.interactive() {
        Box::new(PromptPause::stdio())
    } else {
        Box::new(NoPause)
    };

    let driver = Driver::new(cli.driver_config());
    let report = driver.run(viewer.as_mut(), pause.as_mut(), &mut std::io::stdout());

    if report.found() == 0 {
        info!("没有找到任何转储文件");
    }

    ExitCode::from(exit_code(&report, !cli.files.is_empty()))
}
