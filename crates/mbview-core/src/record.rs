//! 宏块预测记录的定长二进制布局与编解码.
//!
//! 单条记录固定 522 字节, 无文件头/尾, 按如下偏移排列:
//! ```text
//! [0, 256)    current_block    16x16 u8, 行优先
//! [256, 512)  reference_block  16x16 u8, 行优先
//! [512]       has_left_ref     非 0 即 true
//! [513, 517)  mb_x             i32
//! [517, 521)  mb_y             i32
//! [521]       is_iframe        非 0 即 true
//! ```
//!
//! 两个 i32 字段沿用转储程序的主机字节序, 默认按本机字节序解码,
//! 也可通过 [`Endianness`] 显式指定.

use std::fmt;

use byteorder::{BigEndian, ByteOrder, LittleEndian, NativeEndian};
use serde::Serialize;

use crate::error::{MbError, MbResult};

/// 宏块边长 (像素)
pub const MB_WIDTH: usize = 16;
/// 单个宏块的样本数
pub const MB_SAMPLES: usize = MB_WIDTH * MB_WIDTH;

/// current_block 起始偏移
pub const CURRENT_OFFSET: usize = 0;
/// reference_block 起始偏移
pub const REFERENCE_OFFSET: usize = CURRENT_OFFSET + MB_SAMPLES;
/// has_left_ref 标志偏移
pub const HAS_LEFT_REF_OFFSET: usize = REFERENCE_OFFSET + MB_SAMPLES;
/// mb_x 起始偏移
pub const MB_X_OFFSET: usize = HAS_LEFT_REF_OFFSET + 1;
/// mb_y 起始偏移
pub const MB_Y_OFFSET: usize = MB_X_OFFSET + 4;
/// is_iframe 标志偏移
pub const IS_IFRAME_OFFSET: usize = MB_Y_OFFSET + 4;
/// 单条记录总字节数 (256 + 256 + 1 + 4 + 4 + 1)
pub const RECORD_SIZE: usize = IS_IFRAME_OFFSET + 1;

/// 整数字段的字节序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    /// 本机字节序 (与转储主机一致时才可移植)
    #[default]
    Native,
    /// 小端
    Little,
    /// 大端
    Big,
}

impl Endianness {
    /// 从名称解析 ("native" / "little" / "le" / "big" / "be")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "native" | "ne" => Some(Self::Native),
            "little" | "le" => Some(Self::Little),
            "big" | "be" => Some(Self::Big),
            _ => None,
        }
    }

    fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            Self::Native => NativeEndian::read_i32(buf),
            Self::Little => LittleEndian::read_i32(buf),
            Self::Big => BigEndian::read_i32(buf),
        }
    }

    fn write_i32(self, buf: &mut [u8], value: i32) {
        match self {
            Self::Native => NativeEndian::write_i32(buf, value),
            Self::Little => LittleEndian::write_i32(buf, value),
            Self::Big => BigEndian::write_i32(buf, value),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Native => "native",
            Self::Little => "little",
            Self::Big => "big",
        };
        write!(f, "{name}")
    }
}

/// 帧类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FrameType {
    /// 帧内编码帧
    I,
    /// 前向预测帧
    P,
}

impl FrameType {
    /// 完整标签, 如 "I-frame"
    pub const fn label(&self) -> &'static str {
        match self {
            Self::I => "I-frame",
            Self::P => "P-frame",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::I => "I",
            Self::P => "P",
        };
        write!(f, "{name}")
    }
}

/// 16x16 8 位样本块, 行优先存储
#[derive(Clone, PartialEq, Eq)]
pub struct Macroblock([[u8; MB_WIDTH]; MB_WIDTH]);

impl Macroblock {
    /// 从 256 字节行优先数据构造
    ///
    /// 长度不足时返回 [`MbError::MalformedRecord`].
    pub fn from_slice(data: &[u8]) -> MbResult<Self> {
        if data.len() < MB_SAMPLES {
            return Err(MbError::MalformedRecord {
                expected: MB_SAMPLES,
                actual: data.len(),
            });
        }
        let mut rows = [[0u8; MB_WIDTH]; MB_WIDTH];
        for (row, src) in rows.iter_mut().zip(data.chunks_exact(MB_WIDTH)) {
            row.copy_from_slice(src);
        }
        Ok(Self(rows))
    }

    /// 由行数组直接构造
    pub const fn from_rows(rows: [[u8; MB_WIDTH]; MB_WIDTH]) -> Self {
        Self(rows)
    }

    /// 所有样本取同一值
    pub const fn filled(value: u8) -> Self {
        Self([[value; MB_WIDTH]; MB_WIDTH])
    }

    /// 第 y 行
    pub fn row(&self, y: usize) -> &[u8; MB_WIDTH] {
        &self.0[y]
    }

    /// 全部行
    pub fn rows(&self) -> &[[u8; MB_WIDTH]; MB_WIDTH] {
        &self.0
    }

    /// (x, y) 处的样本
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        self.0[y][x]
    }

    /// 按行优先展开为 256 字节
    pub fn to_bytes(&self) -> [u8; MB_SAMPLES] {
        let mut out = [0u8; MB_SAMPLES];
        for (dst, row) in out.chunks_exact_mut(MB_WIDTH).zip(self.0.iter()) {
            dst.copy_from_slice(row);
        }
        out
    }

    /// 样本均值
    pub fn mean(&self) -> f64 {
        let sum: u32 = self.0.iter().flatten().map(|&v| v as u32).sum();
        sum as f64 / MB_SAMPLES as f64
    }

    /// 与另一块的绝对差之和 (SAD)
    pub fn sad(&self, other: &Macroblock) -> u32 {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .map(|(&a, &b)| a.abs_diff(b) as u32)
            .sum()
    }
}

impl Default for Macroblock {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl fmt::Debug for Macroblock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Macroblock [")?;
        for row in &self.0 {
            write!(f, "   ")?;
            for v in row {
                write!(f, " {v:3}")?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}

/// 一条宏块预测输入记录
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PredictionRecord {
    /// 当前块
    pub current_block: Macroblock,
    /// 左侧参考块, 仅当 `has_left_ref` 为 true 时有意义
    pub reference_block: Macroblock,
    /// 是否存在有效的左侧参考块
    pub has_left_ref: bool,
    /// 宏块列坐标
    pub mb_x: i32,
    /// 宏块行坐标
    pub mb_y: i32,
    /// 是否属于 I 帧
    pub is_iframe: bool,
}

impl PredictionRecord {
    /// 从定长字节块解码一条记录
    ///
    /// 只读取前 [`RECORD_SIZE`] 字节, 不足时返回 [`MbError::MalformedRecord`].
    pub fn parse(data: &[u8], endian: Endianness) -> MbResult<Self> {
        if data.len() < RECORD_SIZE {
            return Err(MbError::MalformedRecord {
                expected: RECORD_SIZE,
                actual: data.len(),
            });
        }

        Ok(Self {
            current_block: Macroblock::from_slice(&data[CURRENT_OFFSET..REFERENCE_OFFSET])?,
            reference_block: Macroblock::from_slice(
                &data[REFERENCE_OFFSET..HAS_LEFT_REF_OFFSET],
            )?,
            has_left_ref: data[HAS_LEFT_REF_OFFSET] != 0,
            mb_x: endian.read_i32(&data[MB_X_OFFSET..MB_Y_OFFSET]),
            mb_y: endian.read_i32(&data[MB_Y_OFFSET..IS_IFRAME_OFFSET]),
            is_iframe: data[IS_IFRAME_OFFSET] != 0,
        })
    }

    /// 编码为定长字节块 (parse 的逆操作, 标志写为 0/1)
    pub fn encode(&self, endian: Endianness) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        out[CURRENT_OFFSET..REFERENCE_OFFSET].copy_from_slice(&self.current_block.to_bytes());
        out[REFERENCE_OFFSET..HAS_LEFT_REF_OFFSET]
            .copy_from_slice(&self.reference_block.to_bytes());
        out[HAS_LEFT_REF_OFFSET] = self.has_left_ref as u8;
        endian.write_i32(&mut out[MB_X_OFFSET..MB_Y_OFFSET], self.mb_x);
        endian.write_i32(&mut out[MB_Y_OFFSET..IS_IFRAME_OFFSET], self.mb_y);
        out[IS_IFRAME_OFFSET] = self.is_iframe as u8;
        out
    }

    /// 帧类型
    pub fn frame_type(&self) -> FrameType {
        if self.is_iframe {
            FrameType::I
        } else {
            FrameType::P
        }
    }

    /// 有左参考时返回参考块, 否则 None
    pub fn left_reference(&self) -> Option<&Macroblock> {
        self.has_left_ref.then_some(&self.reference_block)
    }
}
