//! ### English
//! C ABI surface for `mpv_texture_bridge`.
//!
//! All exported symbols are `extern "C"` functions; structs are `#[repr(C)]`. The glue must
//! install the EGL and mpv function tables (`mpv_texture_bridge_set_egl_api` /
//! `mpv_texture_bridge_set_mpv_api`) before creating any output.
//!
//! ### 中文
//! `mpv_texture_bridge` 的 C ABI 接口层。
//!
//! 所有导出符号均为 `extern "C"` 函数；结构体使用 `#[repr(C)]`。胶水层必须在创建任何
//! 输出之前安装 EGL 与 mpv 函数表（`mpv_texture_bridge_set_egl_api` /
//! `mpv_texture_bridge_set_mpv_api`）。
mod abi;
mod output;
mod texture;

use std::sync::Arc;

use crate::engine::output::VideoOutput;

#[repr(C)]
/// ### English
/// Opaque video-output handle. Lifecycle: `..._video_output_new` → use from the registrar
/// callbacks → `..._video_output_dispose`.
///
/// ### 中文
/// 不透明的 video output 句柄。生命周期：`..._video_output_new` → 在 registrar 回调中
/// 使用 → `..._video_output_dispose`。
pub struct MpvTextureBridgeVideoOutput {
    /// ### English
    /// Shared core output; render-thread tasks and decoder hooks hold clones/weaks of it.
    ///
    /// ### 中文
    /// 共享的核心输出；渲染线程任务与解码器钩子持有其克隆/弱引用。
    inner: Arc<VideoOutput>,
}
