//! 转储文件按定长记录切分.
//!
//! 文件只是记录的平铺拼接, 记录数由文件长度整除 [`RECORD_SIZE`] 得出,
//! 末尾不足一条的剩余字节直接忽略.

use std::path::Path;

use log::debug;

use crate::error::{MbError, MbResult};
use crate::record::{Endianness, PredictionRecord, RECORD_SIZE};

/// 给定字节长度可容纳的完整记录数
pub const fn record_count(byte_len: usize) -> usize {
    byte_len / RECORD_SIZE
}

/// 已整体读入内存的转储文件
pub struct RecordFile {
    /// 文件全部内容
    data: Vec<u8>,
}

impl RecordFile {
    /// 一次性读取整个文件, 文件句柄在返回前释放
    pub fn open(path: impl AsRef<Path>) -> MbResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MbError::FileNotFound(path.to_path_buf()),
            _ => MbError::Io(e),
        })?;
        debug!("已读取 {}: {} 字节", path.display(), data.len());
        Ok(Self::from_bytes(data))
    }

    /// 由内存数据构造
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// 完整记录数
    pub fn record_count(&self) -> usize {
        record_count(self.data.len())
    }

    /// 末尾被忽略的字节数
    pub fn trailing_bytes(&self) -> usize {
        self.data.len() % RECORD_SIZE
    }

    /// 第 index 条记录的原始字节
    ///
    /// 越界时返回剩余的不完整片段 (可能为空), 由解析器报告错误.
    pub fn chunk(&self, index: usize) -> &[u8] {
        let start = index.saturating_mul(RECORD_SIZE).min(self.data.len());
        let end = start.saturating_add(RECORD_SIZE).min(self.data.len());
        &self.data[start..end]
    }

    /// 解码第 index 条记录
    pub fn record(&self, index: usize, endian: Endianness) -> MbResult<PredictionRecord> {
        PredictionRecord::parse(self.chunk(index), endian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_record(mb_x: i32, mb_y: i32) -> PredictionRecord {
        PredictionRecord {
            mb_x,
            mb_y,
            ..Default::default()
        }
    }

    fn concat(records: &[PredictionRecord]) -> Vec<u8> {
        records
            .iter()
            .flat_map(|r| r.encode(Endianness::Native))
            .collect()
    }

    #[test]
    fn test_record_count_is_floor_division() {
        assert_eq!(record_count(0), 0);
        assert_eq!(record_count(RECORD_SIZE - 1), 0);
        assert_eq!(record_count(RECORD_SIZE), 1);
        assert_eq!(record_count(RECORD_SIZE * 3 + 100), 3);
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut data = concat(&[make_record(1, 0), make_record(2, 0)]);
        data.extend_from_slice(&[0xAA; 100]);
        let file = RecordFile::from_bytes(data);

        assert_eq!(file.record_count(), 2);
        assert_eq!(file.trailing_bytes(), 100);

        let last = file.record(1, Endianness::Native).unwrap();
        assert_eq!(last.mb_x, 2);
    }

    #[test]
    fn test_partial_chunk_is_malformed() {
        let mut data = concat(&[make_record(0, 0)]);
        data.extend_from_slice(&[0u8; 10]);
        let file = RecordFile::from_bytes(data);

        assert!(file.record(0, Endianness::Native).is_ok());
        assert!(matches!(
            file.record(1, Endianness::Native),
            Err(MbError::MalformedRecord { actual: 10, .. })
        ));
        assert!(matches!(
            file.record(5, Endianness::Native),
            Err(MbError::MalformedRecord { actual: 0, .. })
        ));
    }

    #[test]
    fn test_open_reads_whole_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&concat(&[make_record(3, 4), make_record(5, 6)]))
            .unwrap();
        tmp.flush().unwrap();

        let file = RecordFile::open(tmp.path()).unwrap();
        assert_eq!(file.record_count(), 2);
        assert_eq!(file.trailing_bytes(), 0);
        let rec = file.record(1, Endianness::Native).unwrap();
        assert_eq!((rec.mb_x, rec.mb_y), (5, 6));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.bin");
        match RecordFile::open(&missing) {
            Err(MbError::FileNotFound(p)) => assert_eq!(p, missing),
            Err(other) => panic!("意外的错误类型: {other:?}"),
            Ok(_) => panic!("不存在的文件不应打开成功"),
        }
    }
}
