//! 无界面 PNG 导出.
//!
//! 每条记录输出一张 `<out_dir>/<文件名主干>_mb<序号:05>.png`,
//! 标题写入 PNG 的 tEXt 块. 不阻塞, 适合批处理.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::debug;
use mbview_core::{MbError, MbResult, RecordView, RecordViewer};

use crate::canvas::{Canvas, RenderOptions, render_figure};
use crate::layout::Figure;

/// PNG 导出查看器
pub struct PngExporter {
    /// 输出目录
    out_dir: PathBuf,
    /// 渲染参数
    options: RenderOptions,
    /// 已写出的文件
    written: Vec<PathBuf>,
}

impl PngExporter {
    /// 创建导出器, 输出目录不存在时自动创建
    pub fn new(out_dir: impl Into<PathBuf>, options: RenderOptions) -> MbResult<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self {
            out_dir,
            options,
            written: Vec::new(),
        })
    }

    /// 已写出的文件列表
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// 某条记录的输出路径
    pub fn output_path(&self, source: &str, index: usize) -> PathBuf {
        let stem = Path::new(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("record");
        self.out_dir.join(format!("{stem}_mb{index:05}.png"))
    }
}

impl RecordViewer for PngExporter {
    fn show(&mut self, view: &RecordView<'_>) -> MbResult<()> {
        let figure = Figure::from_view(view);
        let canvas = render_figure(&figure, &self.options);
        let path = self.output_path(view.source, view.index);
        write_png(&path, &canvas, &figure.caption())?;
        debug!("已导出 {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn name(&self) -> &str {
        "png"
    }
}

/// 把画布写成 8 位 RGB PNG
pub fn write_png(path: &Path, canvas: &Canvas, title: &str) -> MbResult<()> {
    let export_err = |e: png::EncodingError| MbError::Export(format!("{}: {e}", path.display()));

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        canvas.width() as u32,
        canvas.height() as u32,
    );
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder
        .add_text_chunk("Title".to_string(), title.to_string())
        .map_err(export_err)?;

    let mut writer = encoder.write_header().map_err(export_err)?;
    writer
        .write_image_data(&canvas.to_rgb24())
        .map_err(export_err)?;
    writer.finish().map_err(export_err)?;
    Ok(())
}
