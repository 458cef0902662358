//! # mbview
//!
//! 宏块预测转储数据查看工具.
//!
//! 编码器在调试时把每个宏块的预测输入 (当前块、左参考块、标志、坐标)
//! 按 522 字节定长记录追加写入 `.bin` 文件. mbview 逐条解析这些记录,
//! 以左右两栏灰度图对比显示, 并打印文本摘要.
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use mbview::core::{Driver, DriverConfig, NoPause, NullViewer};
//!
//! let driver = Driver::new(DriverConfig::default());
//! let report = driver.run(&mut NullViewer, &mut NoPause, &mut std::io::stdout());
//! println!("共显示 {} 个宏块", report.records_shown());
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `mbview-core` | 记录编解码、文件切分、遍历驱动 |
//! | `mbview-render` | 双栏对比图渲染与 PNG 导出 |

pub mod logging;

/// 记录编解码与遍历驱动
pub use mbview_core as core;

/// 对比图渲染与导出
pub use mbview_render as render;

/// 获取 mbview 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
