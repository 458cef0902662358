//! 记录查看器接口与文本摘要.
//!
//! 驱动循环把每条解码后的记录交给 [`RecordViewer`], 具体的显示方式
//! (窗口、PNG 导出、纯文本) 由实现者决定.

use std::io::Write;

use serde::Serialize;

use crate::error::MbResult;
use crate::record::{FrameType, PredictionRecord};

/// 一次显示请求: 记录本身加上它在文件中的位置
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    /// 来源名称 (通常为文件路径)
    pub source: &'a str,
    /// 记录在文件中的序号
    pub index: usize,
    /// 记录内容
    pub record: &'a PredictionRecord,
}

impl RecordView<'_> {
    /// 总标题, 如 "Macroblock #3 - I-frame"
    pub fn title(&self) -> String {
        format!(
            "Macroblock #{} - {}-frame",
            self.index,
            self.record.frame_type()
        )
    }
}

/// 记录查看器
///
/// `show` 可以阻塞 (例如等待用户关闭窗口), 返回错误时驱动会放弃当前文件的剩余记录.
pub trait RecordViewer {
    /// 显示一条记录
    fn show(&mut self, view: &RecordView<'_>) -> MbResult<()>;

    /// 查看器名称 (日志用)
    fn name(&self) -> &str;
}

/// 不做任何显示的查看器 (只输出摘要时使用)
#[derive(Debug, Default)]
pub struct NullViewer;

impl RecordViewer for NullViewer {
    fn show(&mut self, _view: &RecordView<'_>) -> MbResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// 摘要输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    /// 人类可读的多行文本
    #[default]
    Text,
    /// 每条记录一行 JSON
    Json,
    /// 不输出
    Quiet,
}

/// 单条记录的摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub source: String,
    pub index: usize,
    pub mb_x: i32,
    pub mb_y: i32,
    pub frame_type: FrameType,
    pub has_left_ref: bool,
    /// 当前块样本均值
    pub current_mean: f64,
    /// 当前块与左参考块的 SAD, 无参考时省略
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_sad: Option<u32>,
}

impl RecordSummary {
    pub fn from_view(view: &RecordView<'_>) -> Self {
        let record = view.record;
        Self {
            source: view.source.to_string(),
            index: view.index,
            mb_x: record.mb_x,
            mb_y: record.mb_y,
            frame_type: record.frame_type(),
            has_left_ref: record.has_left_ref,
            current_mean: record.current_block.mean(),
            left_sad: record
                .left_reference()
                .map(|reference| record.current_block.sad(reference)),
        }
    }

    /// 按指定格式写出摘要
    pub fn write_to(&self, out: &mut dyn Write, format: SummaryFormat) -> MbResult<()> {
        match format {
            SummaryFormat::Text => {
                writeln!(out)?;
                writeln!(out, "=== Macroblock #{} ===", self.index)?;
                writeln!(out, "Position: ({}, {})", self.mb_x, self.mb_y)?;
                writeln!(out, "Frame type: {}", self.frame_type.label())?;
                writeln!(
                    out,
                    "Has left reference: {}",
                    if self.has_left_ref { "Yes" } else { "No" }
                )?;
            }
            SummaryFormat::Json => {
                let line = serde_json::to_string(self).map_err(std::io::Error::other)?;
                writeln!(out, "{line}")?;
            }
            SummaryFormat::Quiet => {}
        }
        Ok(())
    }
}
