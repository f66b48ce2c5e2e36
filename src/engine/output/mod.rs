//! ### English
//! `VideoOutput`: the orchestrator owning the decoder render session and one rendering backend.
//!
//! Chooses the hardware path (producer context + pool + render thread) when possible, falls
//! back to the software pixel buffer otherwise, and routes the decoder's "frame available"
//! signal onto the right thread for either.
//!
//! ### 中文
//! `VideoOutput`：持有解码器渲染会话与单个渲染后端的编排器。
//!
//! 可行时选择硬件路径（生产者上下文 + 缓冲池 + 渲染线程），否则回退到软件像素缓冲，
//! 并把解码器的 “frame available” 信号路由到对应路径的正确线程。

use std::ffi::c_void;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::engine::mpv::MpvApi;

mod dimensions;
mod hook;
mod hw;
#[cfg(feature = "sw-fallback")]
mod sw;

use hook::UpdateHook;
use hw::HwBackend;
#[cfg(feature = "sw-fallback")]
use sw::SwBackend;

/// ### English
/// Registrar-facing hooks supplied by the plugin glue at construction.
///
/// ### 中文
/// 由插件胶水层在构造时提供的 registrar 相关钩子。
pub(crate) struct RegistrarHooks {
    /// ### English
    /// Tells the compositor a new frame can be polled. Thread-safe on the Flutter side; invoked
    /// from the render thread (H/W) or the host idle callback (S/W).
    ///
    /// ### 中文
    /// 通知合成器有新帧可供轮询。Flutter 侧线程安全；由渲染线程（硬件）或宿主 idle
    /// 回调（软件）调用。
    pub mark_frame_available: Option<unsafe extern "C" fn(*mut c_void)>,
    pub mark_frame_available_context: usize,
    /// ### English
    /// Schedules a one-shot callback on the host main loop (`g_idle_add` shaped). Required by
    /// the software path; the decoder thread must never touch GL or the registrar directly.
    ///
    /// ### 中文
    /// 在宿主主循环上调度一次性回调（形如 `g_idle_add`）。软件路径必需；解码器线程绝不能
    /// 直接触碰 GL 或 registrar。
    pub schedule_idle: Option<unsafe extern "C" fn(unsafe extern "C" fn(*mut c_void), *mut c_void)>,
}

/// ### English
/// Recognized configuration, plus the VA-API display pointers the glue extracted from GDK.
///
/// ### 中文
/// 可识别的配置项，外加胶水层从 GDK 提取的 VA-API display 指针。
pub(crate) struct OutputConfig {
    /// ### English
    /// Fixed width; 0 = follow the decoder's reported video size.
    ///
    /// ### 中文
    /// 固定宽度；0 = 跟随解码器上报的视频尺寸。
    pub width: i64,
    /// ### English
    /// Fixed height; 0 = follow the decoder's reported video size.
    ///
    /// ### 中文
    /// 固定高度；0 = 跟随解码器上报的视频尺寸。
    pub height: i64,
    pub enable_hardware_acceleration: bool,
    /// ### English
    /// X11 `Display*` for VA-API, or 0.
    ///
    /// ### 中文
    /// VA-API 使用的 X11 `Display*`，无则为 0。
    pub x11_display: usize,
    /// ### English
    /// Wayland `wl_display*` for VA-API, or 0.
    ///
    /// ### 中文
    /// VA-API 使用的 Wayland `wl_display*`，无则为 0。
    pub wl_display: usize,
}

type TextureUpdateFn = unsafe extern "C" fn(i64, i64, i64, *mut c_void);

struct TextureUpdate {
    callback: TextureUpdateFn,
    context: usize,
}

/// ### English
/// The selected rendering backend. Chosen once at construction; `Unavailable` keeps answering
/// polls with a dummy so the widget tree never stalls.
///
/// ### 中文
/// 选定的渲染后端。构造时一次确定；`Unavailable` 仍以 dummy 响应轮询，保证 widget 树不卡死。
enum Backend {
    Hardware(HwBackend),
    #[cfg(feature = "sw-fallback")]
    Software(SwBackend),
    Unavailable,
}

pub(crate) struct VideoOutput {
    mpv: MpvApi,
    /// ### English
    /// Decoder client handle (`mpv_handle*`), owned by the player side.
    ///
    /// ### 中文
    /// 解码器客户端句柄（`mpv_handle*`），由播放器侧持有。
    handle: usize,
    hooks: RegistrarHooks,
    /// ### English
    /// Fixed output dimensions; 0 = follow the decoder (clamped in software mode).
    ///
    /// ### 中文
    /// 固定输出尺寸；0 = 跟随解码器（软件模式下会被钳制）。
    width: AtomicI64,
    height: AtomicI64,
    texture_update: Mutex<Option<TextureUpdate>>,
    /// ### English
    /// Last `(width, height)` pushed through the texture-update callback.
    ///
    /// ### 中文
    /// 最近一次通过纹理更新回调推送的 `(width, height)`。
    last_notified: Mutex<Option<(i64, i64)>>,
    /// ### English
    /// Set under `guard` by dispose; short-circuits every late decoder delivery and GL path.
    ///
    /// ### 中文
    /// 由 dispose 在 `guard` 下置位；短路所有迟到的解码器投递与 GL 路径。
    destroyed: AtomicBool,
    /// ### English
    /// The output mutex: serializes dispose against software rendering.
    ///
    /// ### 中文
    /// 输出互斥锁：使 dispose 与软件渲染互斥。
    guard: Mutex<()>,
    /// ### English
    /// Decoder render context address (`mpv_render_context*`), 0 after teardown.
    ///
    /// ### 中文
    /// 解码器 render context 地址（`mpv_render_context*`），销毁后为 0。
    render_ctx: AtomicUsize,
    backend: Backend,
    /// ### English
    /// Update hook handed to the decoder; kept alive here until dispose clears the callback.
    ///
    /// ### 中文
    /// 交给解码器的更新钩子；由此处保活，直到 dispose 清除回调。
    hook: Arc<UpdateHook>,
}

impl VideoOutput {
    /// ### English
    /// Builds an output for `handle`. Must be called on the host thread with the host EGL
    /// context current (the hardware path captures it for sharing). Hardware failures fall
    /// back to software when compiled in, then to the dummy-only `Unavailable` backend.
    ///
    /// ### 中文
    /// 为 `handle` 构建输出。必须在宿主线程、宿主 EGL 上下文为 current 时调用
    ///（硬件路径需捕获它用于共享）。硬件失败时回退到软件（若编译启用），再退到仅
    /// dummy 的 `Unavailable` 后端。
    pub(crate) fn new(
        handle: usize,
        config: OutputConfig,
        hooks: RegistrarHooks,
    ) -> Result<Arc<Self>, String> {
        if handle == 0 {
            return Err("NULL mpv_handle".to_string());
        }
        let mpv = MpvApi::load()?;

        mpv.set_option(handle, c"video-sync", c"audio");

        #[cfg(not(feature = "sw-fallback"))]
        let config = {
            let mut config = config;
            if !config.enable_hardware_acceleration {
                log::warn!("S/W rendering is not compiled in; forcing hardware acceleration");
                config.enable_hardware_acceleration = true;
            }
            config
        };

        let (backend, render_ctx) = Self::make_backend(mpv, handle, &config);

        let output = Arc::new_cyclic(|weak| Self {
            mpv,
            handle,
            hooks,
            width: AtomicI64::new(0),
            height: AtomicI64::new(0),
            texture_update: Mutex::new(None),
            last_notified: Mutex::new(None),
            destroyed: AtomicBool::new(false),
            guard: Mutex::new(()),
            render_ctx: AtomicUsize::new(render_ctx),
            backend,
            hook: Arc::new(UpdateHook {
                output: weak.clone(),
            }),
        });

        output.set_dimensions(config.width, config.height);
        output.install_update_callback();
        Ok(output)
    }

    fn make_backend(mpv: MpvApi, handle: usize, config: &OutputConfig) -> (Backend, usize) {
        if config.enable_hardware_acceleration {
            match hw::init_hardware(mpv, handle, config) {
                Ok((backend, render_ctx)) => {
                    log::info!("VideoOutput: H/W rendering");
                    return (Backend::Hardware(backend), render_ctx);
                }
                Err(err) => {
                    log::warn!("VideoOutput: H/W init failed: {err}");
                }
            }
        }

        #[cfg(feature = "sw-fallback")]
        {
            match sw::init_software(mpv, handle) {
                Ok((backend, render_ctx)) => {
                    log::info!("VideoOutput: S/W rendering");
                    return (Backend::Software(backend), render_ctx);
                }
                Err(err) => {
                    log::warn!("VideoOutput: S/W init failed: {err}");
                }
            }
        }

        log::warn!("VideoOutput: no rendering path available; serving the dummy texture");
        (Backend::Unavailable, 0)
    }

    fn install_update_callback(&self) {
        let render_ctx = self.render_ctx.load(Ordering::Acquire);
        if render_ctx == 0 {
            return;
        }
        let data = Arc::as_ptr(&self.hook) as *mut c_void;
        self.mpv
            .set_update_callback(render_ctx, hook::update_trampoline, data);
    }

    /// ### English
    /// Decoder's "frame available" signal. Hardware: enqueue a render task. Software: schedule
    /// a host idle callback. Never does GL work on the calling (decoder) thread.
    ///
    /// ### 中文
    /// 解码器的 “frame available” 信号。硬件：入队渲染任务。软件：调度宿主 idle 回调。
    /// 绝不在调用（解码器）线程做 GL 工作。
    pub(crate) fn on_frame_available(self: &Arc<Self>) {
        if self.destroyed.load(Ordering::Acquire) {
            return;
        }
        match &self.backend {
            Backend::Hardware(hw) => {
                let output = Arc::clone(self);
                hw.thread.post(move || output.render_task());
            }
            #[cfg(feature = "sw-fallback")]
            Backend::Software(_) => self.schedule_software_render(),
            Backend::Unavailable => {}
        }
    }

    #[cfg(feature = "sw-fallback")]
    fn schedule_software_render(&self) {
        let Some(schedule_idle) = self.hooks.schedule_idle else {
            log::warn!("S/W rendering needs a schedule_idle hook; frame dropped");
            return;
        };
        let data = Arc::into_raw(Arc::clone(&self.hook)) as *mut c_void;
        unsafe { schedule_idle(hook::software_idle_trampoline, data) };
    }

    /// ### English
    /// The opaque identifier the host uses for this output (stable for its lifetime).
    ///
    /// ### 中文
    /// 宿主用于标识该输出的不透明 id（生命周期内稳定）。
    pub(crate) fn texture_id(&self) -> i64 {
        self as *const Self as i64
    }

    /// ### English
    /// Installs the widget-layer dimension callback and immediately emits the configured size
    /// ((1, 1) when following the decoder), so the `Texture` widget mounts and polling starts.
    ///
    /// ### 中文
    /// 安装 widget 层尺寸回调，并立即推送配置尺寸（跟随解码器时为 (1, 1)），
    /// 使 `Texture` widget 完成挂载、轮询得以开始。
    pub(crate) fn set_texture_update_callback(&self, callback: TextureUpdateFn, context: usize) {
        *self.texture_update.lock() = Some(TextureUpdate { callback, context });

        let width = self.width.load(Ordering::Relaxed);
        let height = self.height.load(Ordering::Relaxed);
        let (width, height) = if width == 0 || height == 0 {
            (1, 1)
        } else {
            (width, height)
        };
        *self.last_notified.lock() = Some((width, height));
        unsafe { callback(self.texture_id(), width, height, context as *mut c_void) };
    }

    pub(super) fn notify_dimensions_if_changed(&self, size: dpi::PhysicalSize<u32>) {
        let dimensions = (size.width as i64, size.height as i64);
        let update = {
            let mut last = self.last_notified.lock();
            if *last == Some(dimensions) {
                return;
            }
            *last = Some(dimensions);
            let installed = self.texture_update.lock();
            installed
                .as_ref()
                .map(|update| (update.callback, update.context))
        };
        if let Some((callback, context)) = update {
            unsafe {
                callback(
                    self.texture_id(),
                    dimensions.0,
                    dimensions.1,
                    context as *mut c_void,
                )
            };
        }
    }

    pub(super) fn mark_frame_available(&self) {
        if let Some(callback) = self.hooks.mark_frame_available {
            unsafe { callback(self.hooks.mark_frame_available_context as *mut c_void) };
        }
    }

    /// ### English
    /// One compositor poll. `Some` for the GL paths (dummy 1×1 until a frame is displayable),
    /// `None` for the software backend, whose frames travel through the pixel-buffer call.
    ///
    /// ### 中文
    /// 单次合成器轮询。GL 路径返回 `Some`（帧可显示前为 1×1 dummy）；软件后端返回 `None`，
    /// 其帧走像素缓冲调用。
    pub(crate) fn poll_texture(&self) -> Option<(u32, u32, u32)> {
        match &self.backend {
            Backend::Hardware(hw) => {
                if self.destroyed.load(Ordering::Acquire) {
                    return Some(hw.shared.host.degraded_texture());
                }
                Some(hw.shared.host.poll(hw.shared.pool.exchange()))
            }
            #[cfg(feature = "sw-fallback")]
            Backend::Software(_) => None,
            Backend::Unavailable => Some((0, 1, 1)),
        }
    }

    /// ### English
    /// Deletes the host-context texture names (called by the glue from its texture object's
    /// dispose, on the raster thread with the host context current).
    ///
    /// ### 中文
    /// 删除宿主上下文纹理名（由胶水层在其纹理对象 dispose 中、raster 线程且宿主上下文
    /// current 时调用）。
    pub(crate) fn release_host_textures(&self) {
        if let Backend::Hardware(hw) = &self.backend {
            hw.shared.host.release_host_textures();
        }
    }

    /// ### English
    /// Tears the output down: raise `destroyed` under the mutex, silence the decoder callback,
    /// then drain GL teardown through the render thread, join it, and destroy the producer
    /// context. Safe against decoder callbacks still in flight.
    ///
    /// ### 中文
    /// 销毁输出：在互斥锁下置位 `destroyed`，静默解码器回调，随后经渲染线程完成 GL 销毁、
    /// join 线程并销毁生产者上下文。对仍在途的解码器回调安全。
    pub(crate) fn dispose(&self) {
        {
            let _guard = self.guard.lock();
            if self.destroyed.swap(true, Ordering::AcqRel) {
                return;
            }
        }

        let render_ctx = self.render_ctx.load(Ordering::Acquire);
        if render_ctx != 0 {
            self.mpv.clear_update_callback(render_ctx);
        }

        match &self.backend {
            Backend::Hardware(hw) => {
                let shared = Arc::clone(&hw.shared);
                let mpv = self.mpv;
                hw.thread.post_and_wait(move || match shared.context.make_scoped_current() {
                    Ok(current) => {
                        shared.pool.destroy_all();
                        if render_ctx != 0 {
                            mpv.free_render_context(render_ctx);
                        }
                        drop(current);
                    }
                    Err(err) => {
                        /*
                        ### English
                        Freeing without the context may leak decoder GL state, but beats
                        hanging the teardown.

                        ### 中文
                        无上下文释放可能泄漏解码器 GL 状态，但好过销毁流程挂死。
                        */
                        log::warn!("Producer context lost during teardown: {err}");
                        if render_ctx != 0 {
                            mpv.free_render_context(render_ctx);
                        }
                    }
                });
                self.render_ctx.store(0, Ordering::Release);
                hw.thread.shutdown_and_join();
                hw.shared.context.destroy();
            }
            #[cfg(feature = "sw-fallback")]
            Backend::Software(_) => {
                if render_ctx != 0 {
                    self.mpv.free_render_context(render_ctx);
                }
                self.render_ctx.store(0, Ordering::Release);
            }
            Backend::Unavailable => {}
        }
    }
}

impl Drop for VideoOutput {
    /// ### English
    /// Backstop for a handle dropped without an explicit dispose (idempotent).
    ///
    /// ### 中文
    /// 未显式 dispose 即被丢弃时的兜底（幂等）。
    fn drop(&mut self) {
        self.dispose();
    }
}
