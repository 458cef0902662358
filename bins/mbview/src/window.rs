//! 窗口显示模块.
//!
//! 使用 minifb 显示双栏对比图. 每条记录打开一个窗口, 标题栏显示总标题和两栏标题,
//! 关闭窗口或按 Esc / Enter / Q 后窗口销毁, show 返回.

use log::debug;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use mbview::core::{MbError, MbResult, RecordView, RecordViewer};
use mbview::render::{Figure, RenderOptions, render_figure};

/// 阻塞式窗口查看器
pub struct WindowViewer {
    /// 渲染参数
    options: RenderOptions,
}

impl WindowViewer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl RecordViewer for WindowViewer {
    fn show(&mut self, view: &RecordView<'_>) -> MbResult<()> {
        let figure = Figure::from_view(view);
        let canvas = render_figure(&figure, &self.options);
        let (w, h) = (canvas.width(), canvas.height());

        let mut window = Window::new(
            &figure.caption(),
            w,
            h,
            WindowOptions {
                resize: true,
                scale_mode: minifb::ScaleMode::AspectRatioStretch,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| MbError::Display(format!("创建窗口失败: {e}")))?;
        window.set_target_fps(30);

        debug!("窗口已创建: {}x{}, {}", w, h, figure.title);

        while window.is_open() && !is_dismissed(&window) {
            window
                .update_with_buffer(canvas.pixels(), w, h)
                .map_err(|e| MbError::Display(format!("刷新窗口失败: {e}")))?;
        }

        debug!("窗口已关闭: {}", figure.title);
        Ok(())
    }

    fn name(&self) -> &str {
        "window"
    }
}

/// Esc / Enter / Q 关闭当前窗口
fn is_dismissed(window: &Window) -> bool {
    window.is_key_down(Key::Escape)
        || window.is_key_pressed(Key::Enter, KeyRepeat::No)
        || window.is_key_pressed(Key::Q, KeyRepeat::No)
}
