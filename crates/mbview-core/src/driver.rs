//! 文件遍历驱动.
//!
//! 对候选文件列表依次执行: 打开 → 切分 → 解码 → 显示 → 等待.
//! 单线程顺序执行, 唯一的挂起点是两条记录之间的 [`Pause`].
//! 任一文件出错只终止该文件, 不影响后续候选文件.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::error::{MbError, MbResult};
use crate::reader::RecordFile;
use crate::record::Endianness;
use crate::viewer::{RecordSummary, RecordView, RecordViewer, SummaryFormat};

/// 默认候选文件 (相对当前工作目录, 按顺序尝试)
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "pred_inputs_p.bin",
    "pred_inputs_i4.bin",
    "pred_inputs_i16.bin",
];

/// 两条记录之间的等待策略
pub trait Pause {
    /// 阻塞直到允许继续
    fn wait(&mut self) -> MbResult<()>;
}

/// 不等待
#[derive(Debug, Default)]
pub struct NoPause;

impl Pause for NoPause {
    fn wait(&mut self) -> MbResult<()> {
        Ok(())
    }
}

/// 打印提示并阻塞读取一行输入
pub struct PromptPause<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptPause<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptPause<std::io::StdinLock<'static>, std::io::Stdout> {
    /// 基于标准输入/输出
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Pause for PromptPause<R, W> {
    fn wait(&mut self) -> MbResult<()> {
        write!(self.output, "Press Enter to see next macroblock...")?;
        self.output.flush()?;
        let mut line = String::new();
        // 输入流结束也视为继续, 不再阻塞
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

/// 驱动配置
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// 候选文件, 按顺序处理
    pub candidates: Vec<PathBuf>,
    /// mb_x / mb_y 的字节序
    pub endian: Endianness,
    /// 每个文件从第几条记录开始
    pub start: usize,
    /// 每个文件最多显示多少条记录 (None 表示不限)
    pub limit: Option<usize>,
    /// 摘要输出格式
    pub summary: SummaryFormat,
}

impl DriverConfig {
    /// 使用默认候选文件列表
    pub fn default_candidates() -> Vec<PathBuf> {
        DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect()
    }

    /// 当前配置下某文件实际处理的记录序号范围
    pub fn selected_range(&self, record_count: usize) -> std::ops::Range<usize> {
        let start = self.start.min(record_count);
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(record_count),
            None => record_count,
        };
        start..end
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            candidates: Self::default_candidates(),
            endian: Endianness::default(),
            start: 0,
            limit: None,
            summary: SummaryFormat::default(),
        }
    }
}

/// 单个候选文件的处理结果
#[derive(Debug)]
pub enum FileOutcome {
    /// 文件不存在, 已跳过
    NotFound,
    /// 全部选中记录处理完成
    Completed {
        /// 文件中的完整记录数
        records: usize,
        /// 实际显示的记录数
        shown: usize,
    },
    /// 处理中途出错, 该文件剩余记录被放弃
    Failed {
        /// 出错前已显示的记录数
        shown: usize,
        error: MbError,
    },
}

/// 一次运行的汇总
#[derive(Debug, Default)]
pub struct RunReport {
    pub files: Vec<(PathBuf, FileOutcome)>,
}

impl RunReport {
    /// 找到的文件数
    pub fn found(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, o)| !matches!(o, FileOutcome::NotFound))
            .count()
    }

    /// 出错的文件数
    pub fn failed(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Failed { .. }))
            .count()
    }

    /// 所有文件累计显示的记录数
    pub fn records_shown(&self) -> usize {
        self.files
            .iter()
            .map(|(_, o)| match o {
                FileOutcome::NotFound => 0,
                FileOutcome::Completed { shown, .. } | FileOutcome::Failed { shown, .. } => *shown,
            })
            .sum()
    }
}

/// 文件遍历驱动
pub struct Driver {
    config: DriverConfig,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// 依次处理全部候选文件
    ///
    /// - `viewer`: 每条记录的显示方式
    /// - `pause`: 两条记录之间的等待策略
    /// - `out`: 摘要输出目标 (通常为 stdout)
    pub fn run(
        &self,
        viewer: &mut dyn RecordViewer,
        pause: &mut dyn Pause,
        out: &mut dyn Write,
    ) -> RunReport {
        let mut report = RunReport::default();
        debug!(
            "候选文件 {} 个, 查看器: {}, 字节序: {}",
            self.config.candidates.len(),
            viewer.name(),
            self.config.endian
        );

        for path in &self.config.candidates {
            let outcome = match RecordFile::open(path) {
                Err(MbError::FileNotFound(_)) => {
                    warn!("Could not find file: {}", path.display());
                    FileOutcome::NotFound
                }
                opened => {
                    info!("Reading {}:", path.display());
                    let mut shown = 0usize;
                    let result = match opened {
                        Ok(file) => self.process_file(path, &file, viewer, pause, out, &mut shown),
                        Err(e) => Err(e),
                    };
                    match result {
                        Ok(records) => FileOutcome::Completed { records, shown },
                        Err(e) => {
                            error!("Error reading file {}: {}", path.display(), e);
                            FileOutcome::Failed { shown, error: e }
                        }
                    }
                }
            };
            report.files.push((path.clone(), outcome));
        }

        info!(
            "处理完成: 找到 {} 个文件, 失败 {} 个, 共显示 {} 个宏块",
            report.found(),
            report.failed(),
            report.records_shown()
        );
        report
    }

    /// 处理已读入的单个文件, 返回文件中的完整记录数
    fn process_file(
        &self,
        path: &Path,
        file: &RecordFile,
        viewer: &mut dyn RecordViewer,
        pause: &mut dyn Pause,
        out: &mut dyn Write,
        shown: &mut usize,
    ) -> MbResult<usize> {
        let record_count = file.record_count();
        info!("Found {} macroblocks in file", record_count);
        if file.trailing_bytes() > 0 {
            debug!("忽略末尾 {} 字节不完整数据", file.trailing_bytes());
        }

        let source = path.display().to_string();
        let range = self.config.selected_range(record_count);
        let last = range.end.saturating_sub(1);
        for index in range {
            let record = file.record(index, self.config.endian)?;
            let view = RecordView {
                source: &source,
                index,
                record: &record,
            };

            RecordSummary::from_view(&view).write_to(out, self.config.summary)?;
            out.flush()?;
            viewer.show(&view)?;
            *shown += 1;

            if index < last {
                pause.wait()?;
            }
        }

        Ok(record_count)
    }
}
