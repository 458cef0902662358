//! 对比图的逻辑布局.

use mbview_core::{Macroblock, RecordView};

/// 有参考块时右栏标题
pub const REFERENCE_TITLE: &str = "Reference Block (Left)";
/// 无参考块时右栏标题
pub const NO_REFERENCE_TITLE: &str = "No Reference Block";

/// 单栏内容
#[derive(Debug, Clone, Copy)]
pub enum PanelContent<'a> {
    /// 以 [0, 255] 固定范围显示的 16x16 灰度块
    Block(&'a Macroblock),
    /// 空白占位
    Empty,
}

/// 单栏: 标题 + 内容
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    pub title: String,
    pub content: PanelContent<'a>,
}

/// 整张对比图
#[derive(Debug, Clone)]
pub struct Figure<'a> {
    /// 总标题, 如 "Macroblock #0 - P-frame"
    pub title: String,
    pub left: Panel<'a>,
    pub right: Panel<'a>,
}

impl<'a> Figure<'a> {
    /// 由一次显示请求构造对比图
    ///
    /// 无左参考时右栏只有占位, 不会引用 reference_block 的像素.
    pub fn from_view(view: &RecordView<'a>) -> Self {
        let record = view.record;
        let left = Panel {
            title: format!(
                "Current Block\nPosition: ({}, {})",
                record.mb_x, record.mb_y
            ),
            content: PanelContent::Block(&record.current_block),
        };
        let right = match record.left_reference() {
            Some(reference) => Panel {
                title: REFERENCE_TITLE.to_string(),
                content: PanelContent::Block(reference),
            },
            None => Panel {
                title: NO_REFERENCE_TITLE.to_string(),
                content: PanelContent::Empty,
            },
        };

        Self {
            title: view.title(),
            left,
            right,
        }
    }

    /// 单行标题, 用于窗口标题栏或文件元数据
    pub fn caption(&self) -> String {
        format!(
            "{} | {} | {}",
            self.title,
            self.left.title.replace('\n', ", "),
            self.right.title
        )
    }
}
