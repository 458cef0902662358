//! # mbview-core
//!
//! 宏块预测转储数据的核心库: 定长记录的编解码、文件切分, 以及
//! "打开 → 切分 → 解码 → 显示 → 等待" 的遍历驱动.
//!
//! 显示方式通过 [`RecordViewer`] 注入, 本 crate 不依赖任何图形库.

pub mod driver;
pub mod error;
pub mod reader;
pub mod record;
pub mod viewer;

// 重导出常用类型
pub use driver::{Driver, DriverConfig, FileOutcome, NoPause, Pause, PromptPause, RunReport};
pub use error::{MbError, MbResult};
pub use reader::RecordFile;
pub use record::{Endianness, FrameType, MB_WIDTH, Macroblock, PredictionRecord, RECORD_SIZE};
pub use viewer::{NullViewer, RecordSummary, RecordView, RecordViewer, SummaryFormat};
