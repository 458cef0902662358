//! 对比图光栅化.
//!
//! 像素缓冲区为 0RGB u32 (与 minifb 窗口缓冲区格式一致), 需要时再展开为 RGB24.
//! 灰度映射固定为 [0, 255] → [黑, 白], 不做自动对比度拉伸.
//! 16x16 宏块按整数倍最近邻放大.

use mbview_core::{MB_WIDTH, Macroblock};

use crate::layout::{Figure, PanelContent};

/// 渲染参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// 每个样本放大成 scale x scale 像素
    pub scale: usize,
    /// 四周留白 (像素)
    pub margin: usize,
    /// 两栏之间的间距 (像素)
    pub gap: usize,
    /// 背景色 (0RGB)
    pub background: u32,
    /// 栏边框颜色 (0RGB)
    pub frame: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 16,
            margin: 16,
            gap: 32,
            background: 0xFFFFFF,
            frame: 0xBBBBBB,
        }
    }
}

impl RenderOptions {
    /// 单栏边长 (像素)
    pub fn panel_size(&self) -> usize {
        MB_WIDTH * self.scale.max(1)
    }

    /// 画布尺寸 (宽, 高)
    pub fn canvas_size(&self) -> (usize, usize) {
        let panel = self.panel_size();
        (
            self.margin * 2 + panel * 2 + self.gap,
            self.margin * 2 + panel,
        )
    }

    /// 左栏左上角
    pub fn left_origin(&self) -> (usize, usize) {
        (self.margin, self.margin)
    }

    /// 右栏左上角
    pub fn right_origin(&self) -> (usize, usize) {
        (self.margin + self.panel_size() + self.gap, self.margin)
    }
}

/// 8 位灰度样本转 0RGB
#[inline]
pub const fn gray_to_rgb(v: u8) -> u32 {
    let v = v as u32;
    (v << 16) | (v << 8) | v
}

/// 0RGB 像素缓冲区
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Canvas {
    /// 创建纯色画布
    pub fn new(width: usize, height: usize, fill: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 原始缓冲区 (行优先)
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// (x, y) 处像素
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// 填充矩形, 超出画布部分被裁掉
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(y_end)..y_end {
            let base = row * self.width;
            self.pixels[base + x.min(x_end)..base + x_end].fill(color);
        }
    }

    /// 画 1 像素宽的矩形边框
    pub fn stroke_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w - 1, y, 1, h, color);
    }

    /// 把宏块按最近邻放大 scale 倍画到 (x, y)
    pub fn blit_block(&mut self, block: &Macroblock, x: usize, y: usize, scale: usize) {
        let scale = scale.max(1);
        let size = MB_WIDTH * scale;
        for dy in 0..size {
            let py = y + dy;
            if py >= self.height {
                break;
            }
            let row = block.row(dy / scale);
            let base = py * self.width;
            for dx in 0..size {
                let px = x + dx;
                if px >= self.width {
                    break;
                }
                self.pixels[base + px] = gray_to_rgb(row[dx / scale]);
            }
        }
    }

    /// 展开为 RGB24 字节流
    pub fn to_rgb24(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            out.push((p >> 16) as u8);
            out.push((p >> 8) as u8);
            out.push(p as u8);
        }
        out
    }
}

/// 把对比图画到新画布上
pub fn render_figure(figure: &Figure<'_>, options: &RenderOptions) -> Canvas {
    let (width, height) = options.canvas_size();
    let panel = options.panel_size();
    let mut canvas = Canvas::new(width, height, options.background);

    for (content, (x, y)) in [
        (figure.left.content, options.left_origin()),
        (figure.right.content, options.right_origin()),
    ] {
        match content {
            PanelContent::Block(block) => canvas.blit_block(block, x, y, options.scale),
            PanelContent::Empty => canvas.stroke_rect(x, y, panel, panel, options.frame),
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbview_core::{PredictionRecord, RecordView};

    fn gradient_block() -> Macroblock {
        let mut rows = [[0u8; MB_WIDTH]; MB_WIDTH];
        for (y, row) in rows.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = (y * 16 + x) as u8;
            }
        }
        Macroblock::from_rows(rows)
    }

    fn render(record: &PredictionRecord, options: &RenderOptions) -> Canvas {
        let view = RecordView {
            source: "mem.bin",
            index: 0,
            record,
        };
        render_figure(&Figure::from_view(&view), options)
    }

    #[test]
    fn test_canvas_size() {
        let options = RenderOptions::default();
        assert_eq!(options.panel_size(), 256);
        assert_eq!(options.canvas_size(), (16 * 2 + 256 * 2 + 32, 16 * 2 + 256));
    }

    #[test]
    fn test_gray_mapping_is_not_stretched() {
        // 动态范围很窄的块也必须原样映射
        let record = PredictionRecord {
            current_block: Macroblock::filled(100),
            ..Default::default()
        };
        let options = RenderOptions::default();
        let canvas = render(&record, &options);
        let (x, y) = options.left_origin();
        assert_eq!(canvas.pixel(x, y), gray_to_rgb(100));
        assert_eq!(canvas.pixel(x + 255, y + 255), 0x646464);
    }

    #[test]
    fn test_nearest_upscale() {
        let record = PredictionRecord {
            current_block: gradient_block(),
            ..Default::default()
        };
        let options = RenderOptions {
            scale: 4,
            ..Default::default()
        };
        let canvas = render(&record, &options);
        let (ox, oy) = options.left_origin();
        // 源样本 (x=2, y=3) 覆盖目标 [8, 12) x [12, 16)
        for dy in 12..16 {
            for dx in 8..12 {
                assert_eq!(canvas.pixel(ox + dx, oy + dy), gray_to_rgb(3 * 16 + 2));
            }
        }
        assert_eq!(canvas.pixel(ox + 63, oy + 63), gray_to_rgb(255));
    }

    #[test]
    fn test_empty_panel_ignores_reference_pixels() {
        let record = PredictionRecord {
            reference_block: Macroblock::filled(42),
            has_left_ref: false,
            ..Default::default()
        };
        let options = RenderOptions::default();
        let canvas = render(&record, &options);
        let (rx, ry) = options.right_origin();
        let panel = options.panel_size();
        for y in ry..ry + panel {
            for x in rx..rx + panel {
                let p = canvas.pixel(x, y);
                assert!(
                    p == options.background || p == options.frame,
                    "({x}, {y}) = {p:#08x}"
                );
            }
        }
    }

    #[test]
    fn test_reference_panel_drawn() {
        let record = PredictionRecord {
            reference_block: Macroblock::filled(42),
            has_left_ref: true,
            ..Default::default()
        };
        let options = RenderOptions::default();
        let canvas = render(&record, &options);
        let (rx, ry) = options.right_origin();
        assert_eq!(canvas.pixel(rx + 10, ry + 10), gray_to_rgb(42));
    }

    #[test]
    fn test_to_rgb24() {
        let mut canvas = Canvas::new(2, 1, 0);
        canvas.fill_rect(1, 0, 1, 1, 0x123456);
        assert_eq!(canvas.to_rgb24(), vec![0, 0, 0, 0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(4, 4, 0);
        canvas.fill_rect(2, 2, 10, 10, 1);
        assert_eq!(canvas.pixels().iter().filter(|&&p| p == 1).count(), 4);
    }
}
