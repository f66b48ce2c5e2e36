//! ### English
//! Hardware-path backend: producer context, framebuffer pool, render thread, and the decoder
//! render session created on that thread.
//!
//! ### 中文
//! 硬件路径后端：生产者上下文、framebuffer 池、渲染线程，以及在该线程上创建的解码器
//! 渲染会话。

use std::ffi::{c_char, c_void};
use std::sync::Arc;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;

use crate::engine::egl::{EglApi, GlApi};
use crate::engine::frame::FrameExchange;
use crate::engine::mpv::MpvApi;
use crate::engine::mpv::types::{
    MPV_RENDER_PARAM_API_TYPE, MPV_RENDER_PARAM_OPENGL_INIT_PARAMS, MPV_RENDER_PARAM_WL_DISPLAY,
    MPV_RENDER_PARAM_X11_DISPLAY, MPV_RENDER_API_TYPE_OPENGL, mpv_opengl_init_params,
    mpv_render_param,
};
use crate::engine::render_thread::RenderThread;
use crate::engine::rendering::{BufferPool, HostTextureCache, ProducerEglContext};

use super::{Backend, OutputConfig, VideoOutput};

/// ### English
/// State shared with render-thread tasks (they capture an `Arc` of it).
///
/// ### 中文
/// 与渲染线程任务共享的状态（任务闭包捕获其 `Arc`）。
pub(super) struct HwShared {
    pub(super) context: ProducerEglContext,
    pub(super) pool: BufferPool,
    pub(super) host: HostTextureCache,
}

pub(super) struct HwBackend {
    pub(super) thread: RenderThread,
    pub(super) shared: Arc<HwShared>,
}

/// ### English
/// Initializes the hardware path on the host thread (host context current): producer context,
/// pool, render thread, then the decoder render session inside a waited render-thread task.
/// Returns the backend plus the render-context address.
///
/// ### 中文
/// 在宿主线程（宿主上下文 current）初始化硬件路径：生产者上下文、缓冲池、渲染线程，
/// 再于一个被等待的渲染线程任务中创建解码器渲染会话。返回后端与 render context 地址。
pub(super) fn init_hardware(
    mpv: MpvApi,
    handle: usize,
    config: &OutputConfig,
) -> Result<(HwBackend, usize), String> {
    let egl = EglApi::load()?;
    let gl = GlApi::load()?;

    let context = ProducerEglContext::new(egl)?;
    let display = context.display();
    let exchange = Arc::new(FrameExchange::new());
    let pool = BufferPool::new(egl, gl, display, context.context(), exchange);
    let host = HostTextureCache::new(egl, gl, display);
    let shared = Arc::new(HwShared {
        context,
        pool,
        host,
    });

    let thread = RenderThread::new()?;

    let created: Arc<Mutex<Option<Result<usize, String>>>> = Arc::new(Mutex::new(None));
    let task_shared = Arc::clone(&shared);
    let task_created = Arc::clone(&created);
    let x11_display = config.x11_display;
    let wl_display = config.wl_display;
    let posted = thread.post_and_wait(move || {
        let outcome = (|| {
            let _current = task_shared.context.make_scoped_current()?;
            create_render_session(&mpv, handle, x11_display, wl_display)
        })();
        *task_created.lock() = Some(outcome);
    });
    if !posted {
        return Err("Render thread refused the init task".to_string());
    }

    let render_ctx = created
        .lock()
        .take()
        .unwrap_or_else(|| Err("Render-session init task produced no result".to_string()))?;

    Ok((HwBackend { thread, shared }, render_ctx))
}

/// ### English
/// Creates the decoder's OpenGL render session against the current (producer) context, passing
/// the X11/Wayland display through for VA-API when available.
///
/// ### 中文
/// 在当前（生产者）上下文上创建解码器的 OpenGL 渲染会话；可用时透传 X11/Wayland display
/// 以启用 VA-API。
fn create_render_session(
    mpv: &MpvApi,
    handle: usize,
    x11_display: usize,
    wl_display: usize,
) -> Result<usize, String> {
    let mut init = mpv_opengl_init_params {
        get_proc_address: Some(load_gl_symbol),
        get_proc_address_ctx: std::ptr::null_mut(),
    };

    let mut params = Vec::with_capacity(4);
    params.push(mpv_render_param {
        kind: MPV_RENDER_PARAM_API_TYPE,
        data: MPV_RENDER_API_TYPE_OPENGL.as_ptr() as *mut c_void,
    });
    params.push(mpv_render_param {
        kind: MPV_RENDER_PARAM_OPENGL_INIT_PARAMS,
        data: (&raw mut init).cast::<c_void>(),
    });
    if wl_display != 0 {
        params.push(mpv_render_param {
            kind: MPV_RENDER_PARAM_WL_DISPLAY,
            data: wl_display as *mut c_void,
        });
    } else if x11_display != 0 {
        params.push(mpv_render_param {
            kind: MPV_RENDER_PARAM_X11_DISPLAY,
            data: x11_display as *mut c_void,
        });
    }
    params.push(mpv_render_param::terminator());

    mpv.create_render_context(handle, &mut params)
}

/// ### English
/// GL loader handed to the decoder (resolves through the installed EGL table).
///
/// ### 中文
/// 交给解码器的 GL loader（通过已安装的 EGL 表解析）。
unsafe extern "C" fn load_gl_symbol(_ctx: *mut c_void, name: *const c_char) -> *mut c_void {
    match EglApi::load() {
        Ok(egl) => egl.get_proc_address(name) as *mut c_void,
        Err(_) => std::ptr::null_mut(),
    }
}

impl VideoOutput {
    /// ### English
    /// One hardware frame, on the render thread: resolve dimensions, size the pool, render the
    /// decoder into the write slot, publish, then notify the compositor and the widget layer.
    ///
    /// ### 中文
    /// 渲染线程上的单帧硬件路径：确定尺寸、调整缓冲池、让解码器渲染到写入槽位并发布，
    /// 随后通知合成器与 widget 层。
    pub(super) fn render_task(&self) {
        if self.destroyed.load(Ordering::Acquire) {
            return;
        }
        let Backend::Hardware(hw) = &self.backend else {
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

        let shared = &hw.shared;
        let current = match shared.context.make_scoped_current() {
            Ok(current) => current,
            Err(err) => {
                log::warn!("Producer context activation failed: {err}; frame dropped");
                return;
            }
        };
        if let Err(err) = shared.pool.ensure(size) {
            log::warn!("Pool reallocation failed: {err}; frame dropped");
            return;
        }
        let published = shared.pool.render_frame(&self.mpv, render_ctx);
        drop(current);

        if published {
            self.notify_dimensions_if_changed(size);
            self.mark_frame_available();
        }
    }
}
