//! # mbview-render
//!
//! 把一条宏块预测记录渲染成左右两栏的灰度对比图:
//! - 左栏: 当前块
//! - 右栏: 左侧参考块 (无参考时为空白占位)
//!
//! [`layout`] 描述图中有什么, [`canvas`] 负责把它画成像素,
//! [`export`] 提供无界面的 PNG 导出查看器.

pub mod canvas;
pub mod export;
pub mod layout;

pub use canvas::{Canvas, RenderOptions, render_figure};
pub use export::PngExporter;
pub use layout::{Figure, Panel, PanelContent};
