//! ### English
//! ABI version, configuration struct and the process-wide function-table installers.
//!
//! ### 中文
//! ABI 版本、配置结构体与进程级函数表安装入口。

use std::ffi::c_void;

use crate::engine::egl::{EmbedderEglApi, install_embedder_egl_api};
use crate::engine::mpv::{EmbedderMpvApi, install_embedder_mpv_api};

/// ### English
/// Bumped on any breaking change to the exported symbols or `#[repr(C)]` layouts.
///
/// ### 中文
/// 导出符号或 `#[repr(C)]` 布局发生破坏性变更时递增。
const ABI_VERSION: u32 = 1;

/// ### English
/// Widget-layer dimension callback: `(texture_id, width, height, context)`.
///
/// ### 中文
/// widget 层尺寸回调：`(texture_id, width, height, context)`。
pub type MpvTextureBridgeTextureUpdateCallback =
    unsafe extern "C" fn(i64, i64, i64, *mut c_void);

#[repr(C)]
/// ### English
/// Construction-time configuration. `width`/`height` of 0 mean "follow the decoder";
/// `enable_hardware_acceleration` is forced on when software support is compiled out.
/// The remaining fields are the registrar hooks and VA-API display pointers the glue extracted
/// from the embedder.
///
/// ### 中文
/// 构造期配置。`width`/`height` 为 0 表示“跟随解码器”；未编译软件支持时
/// `enable_hardware_acceleration` 会被强制开启。其余字段为 registrar 钩子与胶水层从宿主
/// 提取的 VA-API display 指针。
pub struct MpvTextureBridgeConfig {
    pub width: i64,
    pub height: i64,
    /// ### English
    /// Non-zero requests the hardware path.
    ///
    /// ### 中文
    /// 非 0 表示请求硬件路径。
    pub enable_hardware_acceleration: u8,
    /// ### English
    /// Marks the registered texture as having a new frame (thread-safe on the Flutter side).
    ///
    /// ### 中文
    /// 将已注册纹理标记为有新帧（Flutter 侧线程安全）。
    pub mark_frame_available: Option<unsafe extern "C" fn(*mut c_void)>,
    pub mark_frame_available_context: *mut c_void,
    /// ### English
    /// Schedules a one-shot callback on the host main loop (`g_idle_add` shaped); required for
    /// the software path.
    ///
    /// ### 中文
    /// 在宿主主循环调度一次性回调（形如 `g_idle_add`）；软件路径必需。
    pub schedule_idle:
        Option<unsafe extern "C" fn(unsafe extern "C" fn(*mut c_void), *mut c_void)>,
    /// ### English
    /// X11 `Display*` for VA-API, or NULL.
    ///
    /// ### 中文
    /// VA-API 使用的 X11 `Display*`，无则为 NULL。
    pub x11_display: *mut c_void,
    /// ### English
    /// Wayland `wl_display*` for VA-API, or NULL.
    ///
    /// ### 中文
    /// VA-API 使用的 Wayland `wl_display*`，无则为 NULL。
    pub wl_display: *mut c_void,
}

#[unsafe(no_mangle)]
/// ### English
/// Reports the ABI version compiled into this library; the glue refuses to run on a mismatch.
///
/// ### 中文
/// 返回编译进本库的 ABI 版本；不匹配时胶水层应拒绝运行。
pub extern "C" fn mpv_texture_bridge_abi_version() -> u32 {
    ABI_VERSION
}

#[unsafe(no_mangle)]
/// ### English
/// Installs the embedder-provided EGL function table (once per process). Must precede any
/// `..._video_output_new`. Returns `false` on a NULL/incomplete table or repeated install.
///
/// ### 中文
/// 安装宿主提供的 EGL 函数表（每进程一次）。必须先于任何 `..._video_output_new`。
/// 表为 NULL/不完整或重复安装时返回 `false`。
pub unsafe extern "C" fn mpv_texture_bridge_set_egl_api(api: *const EmbedderEglApi) -> bool {
    if api.is_null() {
        return false;
    }
    match install_embedder_egl_api(unsafe { *api }) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("EGL API install rejected: {err}");
            false
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Installs the embedder-provided libmpv function table (once per process). Must precede any
/// `..._video_output_new`. Returns `false` on a NULL/incomplete table or repeated install.
///
/// ### 中文
/// 安装宿主提供的 libmpv 函数表（每进程一次）。必须先于任何 `..._video_output_new`。
/// 表为 NULL/不完整或重复安装时返回 `false`。
pub unsafe extern "C" fn mpv_texture_bridge_set_mpv_api(api: *const EmbedderMpvApi) -> bool {
    if api.is_null() {
        return false;
    }
    match install_embedder_mpv_api(unsafe { *api }) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("mpv API install rejected: {err}");
            false
        }
    }
}
