//! ### English
//! Software fallback: the decoder renders `rgb0` into a CPU pixel buffer under the output
//! mutex, on the host main loop.
//!
//! ### 中文
//! 软件回退：解码器在宿主主循环上、输出互斥锁保护下将 `rgb0` 渲染到 CPU 像素缓冲。

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::engine::mpv::MpvApi;
use crate::engine::mpv::types::{MPV_RENDER_PARAM_API_TYPE, MPV_RENDER_API_TYPE_SW, mpv_render_param};

use super::{Backend, VideoOutput};
use super::dimensions::{SW_RENDERING_MAX_HEIGHT, SW_RENDERING_MAX_WIDTH};

/// ### English
/// One full-size frame of `rgb0` pixels at the software maxima.
///
/// ### 中文
/// 按软件上限分配的一整帧 `rgb0` 像素。
const SW_RENDERING_PIXEL_BUFFER_SIZE: usize =
    (SW_RENDERING_MAX_WIDTH * SW_RENDERING_MAX_HEIGHT * 4) as usize;

pub(super) struct SwBackend {
    /// ### English
    /// The pixel buffer; allocated once, stable for the output's lifetime.
    ///
    /// ### 中文
    /// 像素缓冲；一次分配，生命周期内地址稳定。
    pub(super) buffer: Mutex<Box<[u8]>>,
    /// ### English
    /// Dimensions of the last rendered frame (0 until the first frame).
    ///
    /// ### 中文
    /// 最近一帧的尺寸（首帧前为 0）。
    pub(super) last_width: AtomicU32,
    pub(super) last_height: AtomicU32,
}

/// ### English
/// Creates the decoder's software render session; no GL context involved.
///
/// ### 中文
/// 创建解码器的软件渲染会话；不涉及 GL 上下文。
pub(super) fn init_software(mpv: MpvApi, handle: usize) -> Result<(SwBackend, usize), String> {
    let mut params = [
        mpv_render_param {
            kind: MPV_RENDER_PARAM_API_TYPE,
            data: MPV_RENDER_API_TYPE_SW.as_ptr() as *mut std::ffi::c_void,
        },
        mpv_render_param::terminator(),
    ];
    let render_ctx = mpv.create_render_context(handle, &mut params)?;

    Ok((
        SwBackend {
            buffer: Mutex::new(vec![0u8; SW_RENDERING_PIXEL_BUFFER_SIZE].into_boxed_slice()),
            last_width: AtomicU32::new(0),
            last_height: AtomicU32::new(0),
        },
        render_ctx,
    ))
}

impl VideoOutput {
    /// ### English
    /// Renders one software frame. Runs on the host main loop via the scheduled idle callback;
    /// bails when dispose has run (idempotent on "destroyed").
    ///
    /// ### 中文
    /// 渲染一帧软件路径输出。经调度的 idle 回调在宿主主循环执行；dispose 之后直接返回
    ///（对 “destroyed” 幂等）。
    pub(super) fn software_render(&self) {
        if self.destroyed.load(Ordering::Acquire) {
            return;
        }
        let _guard = self.guard.lock();
        if self.destroyed.load(Ordering::Acquire) {
            return;
        }
        let Backend::Software(sw) = &self.backend else {
            return;
        };
        let render_ctx = self.render_ctx.load(Ordering::Acquire);
        if render_ctx == 0 {
            return;
        }

        let size = self.current_dimensions();
        if size.width == 0 || size.height == 0 {
            return;
        }

        {
            let mut buffer = sw.buffer.lock();
            let status = self
                .mpv
                .render_to_buffer(render_ctx, size.width, size.height, &mut buffer);
            if status != 0 {
                log::warn!("mpv_render_context_render (S/W) failed: {status}; frame dropped");
                return;
            }
        }
        sw.last_width.store(size.width, Ordering::Release);
        sw.last_height.store(size.height, Ordering::Release);

        self.notify_dimensions_if_changed(size);
        self.mark_frame_available();
    }

    /// ### English
    /// The pixel-buffer answer for the compositor: buffer pointer plus the last rendered
    /// dimensions ((1, 1) before the first frame). `None` on the GL paths.
    ///
    /// The pointer stays valid for the output's lifetime; the compositor samples it between
    /// two renders, which the host main loop serializes.
    ///
    /// ### 中文
    /// 返回给合成器的像素缓冲结果：缓冲指针加最近渲染尺寸（首帧前为 (1, 1)）。
    /// GL 路径返回 `None`。
    ///
    /// 指针在输出生命周期内有效；合成器的采样发生在两次渲染之间，由宿主主循环串行化。
    pub(crate) fn copy_pixel_buffer(&self) -> Option<(*const u8, u32, u32)> {
        let Backend::Software(sw) = &self.backend else {
            return None;
        };
        let buffer = sw.buffer.lock();
        let width = sw.last_width.load(Ordering::Acquire);
        let height = sw.last_height.load(Ordering::Acquire);
        if width == 0 || height == 0 {
            return Some((buffer.as_ptr(), 1, 1));
        }
        Some((buffer.as_ptr(), width, height))
    }
}
