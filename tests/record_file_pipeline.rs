//! 端到端集成测试: 转储文件 → 切分 → 解码 → 显示/导出.
//!
//! 测试流程: 构造记录 → 按 522 字节拼接写入文件 → 驱动遍历 → 校验摘要与导出图像

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use mbview::core::{
    Driver, DriverConfig, Endianness, FileOutcome, Macroblock, NoPause, NullViewer,
    PredictionRecord, RECORD_SIZE, SummaryFormat,
};
use mbview::render::{PngExporter, RenderOptions};

/// 生成一条记录: 当前块为水平渐变, 参考块为常量
fn make_record(mb_x: i32, mb_y: i32, has_left_ref: bool, is_iframe: bool) -> PredictionRecord {
    let mut rows = [[0u8; 16]; 16];
    for row in rows.iter_mut() {
        for (x, v) in row.iter_mut().enumerate() {
            *v = (x * 16) as u8;
        }
    }
    PredictionRecord {
        current_block: Macroblock::from_rows(rows),
        reference_block: Macroblock::filled(128),
        has_left_ref,
        mb_x,
        mb_y,
        is_iframe,
    }
}

/// 写出转储文件, 末尾可附加不完整数据
fn write_dump(dir: &Path, name: &str, records: &[PredictionRecord], trailing: usize) -> PathBuf {
    let mut data = Vec::with_capacity(records.len() * RECORD_SIZE + trailing);
    for rec in records {
        data.extend_from_slice(&rec.encode(Endianness::Native));
    }
    data.resize(data.len() + trailing, 0xEE);
    let path = dir.join(name);
    fs::write(&path, data).expect("写入转储文件失败");
    path
}

fn read_png_size(path: &Path) -> (u32, u32) {
    let decoder = png::Decoder::new(File::open(path).expect("打开 PNG 失败"));
    let reader = decoder.read_info().expect("解析 PNG 头失败");
    let info = reader.info();
    (info.width, info.height)
}

#[test]
fn test_pipeline_text_summary_over_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let p_file = write_dump(
        dir.path(),
        "pred_inputs_p.bin",
        &[make_record(0, 0, false, false), make_record(1, 0, true, false)],
        0,
    );
    let i16_file = write_dump(
        dir.path(),
        "pred_inputs_i16.bin",
        &[make_record(4, 2, true, true)],
        RECORD_SIZE / 2,
    );
    let missing = dir.path().join("pred_inputs_i4.bin");

    let config = DriverConfig {
        candidates: vec![p_file, missing, i16_file],
        ..Default::default()
    };
    let mut out = Vec::new();
    let report = Driver::new(config).run(&mut NullViewer, &mut NoPause, &mut out);

    assert_eq!(report.found(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.records_shown(), 3);
    assert!(matches!(report.files[1].1, FileOutcome::NotFound));
    assert!(matches!(
        report.files[2].1,
        FileOutcome::Completed {
            records: 1,
            shown: 1
        }
    ));

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("=== Macroblock #").count(), 3);
    assert!(text.contains("Position: (4, 2)\nFrame type: I-frame\nHas left reference: Yes"));
    assert!(text.contains("Position: (0, 0)\nFrame type: P-frame\nHas left reference: No"));
}

#[test]
fn test_pipeline_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dump(
        dir.path(),
        "dump.bin",
        &[make_record(7, 9, true, false), make_record(8, 9, false, false)],
        0,
    );

    let config = DriverConfig {
        candidates: vec![path],
        summary: SummaryFormat::Json,
        ..Default::default()
    };
    let mut out = Vec::new();
    Driver::new(config).run(&mut NullViewer, &mut NoPause, &mut out);

    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("每行应为合法 JSON"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["mb_x"], 7);
    assert_eq!(lines[0]["mb_y"], 9);
    assert_eq!(lines[0]["has_left_ref"], true);
    // 渐变 0..240 与常量 128 的 SAD
    let expected_sad: u64 = (0..16u64).map(|x| (x * 16).abs_diff(128)).sum::<u64>() * 16;
    assert_eq!(lines[0]["left_sad"], expected_sad);
    assert!(lines[1].get("left_sad").is_none());
}

#[test]
fn test_pipeline_png_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dump(
        dir.path(),
        "pred_inputs_i4.bin",
        &[
            make_record(0, 0, false, true),
            make_record(1, 0, true, true),
            make_record(2, 0, true, true),
        ],
        100,
    );
    let out_dir = dir.path().join("png");
    let options = RenderOptions {
        scale: 2,
        ..Default::default()
    };
    let mut exporter = PngExporter::new(&out_dir, options).unwrap();

    let config = DriverConfig {
        candidates: vec![path],
        start: 1,
        summary: SummaryFormat::Quiet,
        ..Default::default()
    };
    let report = Driver::new(config).run(&mut exporter, &mut NoPause, &mut std::io::sink());

    assert_eq!(report.records_shown(), 2);
    assert_eq!(
        exporter.written(),
        &[
            out_dir.join("pred_inputs_i4_mb00001.png"),
            out_dir.join("pred_inputs_i4_mb00002.png"),
        ]
    );
    assert!(!out_dir.join("pred_inputs_i4_mb00000.png").exists());

    let (w, h) = read_png_size(&exporter.written()[0]);
    assert_eq!((w as usize, h as usize), options.canvas_size());
}

#[test]
fn test_pipeline_big_endian_dump() {
    let dir = tempfile::tempdir().unwrap();
    let rec = make_record(1, 2, false, false);
    let path = dir.path().join("be.bin");
    fs::write(&path, rec.encode(Endianness::Big)).unwrap();

    let config = DriverConfig {
        candidates: vec![path],
        endian: Endianness::Big,
        summary: SummaryFormat::Text,
        ..Default::default()
    };
    let mut out = Vec::new();
    Driver::new(config).run(&mut NullViewer, &mut NoPause, &mut out);
    assert!(String::from_utf8(out).unwrap().contains("Position: (1, 2)"));
}
