//! ### English
//! C ABI bindings for video-output lifecycle (create/configure/dispose).
//!
//! ### 中文
//! video output 生命周期相关的 C ABI 绑定（create/configure/dispose）。

use std::ffi::c_void;

use crate::engine::output::{OutputConfig, RegistrarHooks, VideoOutput};

use super::MpvTextureBridgeVideoOutput;
use super::abi::{MpvTextureBridgeConfig, MpvTextureBridgeTextureUpdateCallback};

#[unsafe(no_mangle)]
/// ### English
/// Creates a video output bound to a player-owned `mpv_handle*` (passed as `i64`, the
/// platform-channel convention).
///
/// When hardware acceleration is requested this must be called on the host thread with the
/// host EGL context current, because the producer context snapshots it for sharing. Returns
/// NULL if the function tables are not installed or the handle/config is NULL.
///
/// ### 中文
/// 基于播放器持有的 `mpv_handle*`（按平台通道惯例以 `i64` 传递）创建 video output。
///
/// 请求硬件加速时必须在宿主线程、宿主 EGL 上下文为 current 时调用，因为生产者上下文
/// 需快照它用于共享。函数表未安装或句柄/配置为 NULL 时返回 NULL。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_new(
    handle: i64,
    config: *const MpvTextureBridgeConfig,
) -> *mut MpvTextureBridgeVideoOutput {
    if handle == 0 || config.is_null() {
        return std::ptr::null_mut();
    }
    let config = unsafe { &*config };

    let hooks = RegistrarHooks {
        mark_frame_available: config.mark_frame_available,
        mark_frame_available_context: config.mark_frame_available_context as usize,
        schedule_idle: config.schedule_idle,
    };
    let output_config = OutputConfig {
        width: config.width,
        height: config.height,
        enable_hardware_acceleration: config.enable_hardware_acceleration != 0,
        x11_display: config.x11_display as usize,
        wl_display: config.wl_display as usize,
    };

    match VideoOutput::new(handle as usize, output_config, hooks) {
        Ok(inner) => Box::into_raw(Box::new(MpvTextureBridgeVideoOutput { inner })),
        Err(err) => {
            log::warn!("VideoOutput creation failed: {err}");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Disposes an output created by `..._video_output_new` and frees the handle. Safe against
/// decoder callbacks still in flight; do not use the pointer afterwards.
///
/// ### 中文
/// 销毁由 `..._video_output_new` 创建的输出并释放句柄。对仍在途的解码器回调安全；
/// 此后不得再使用该指针。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_dispose(
    output: *mut MpvTextureBridgeVideoOutput,
) {
    if output.is_null() {
        return;
    }
    let output = unsafe { Box::from_raw(output) };
    output.inner.dispose();
}

#[unsafe(no_mangle)]
/// ### English
/// Updates the fixed output dimensions; 0 on either axis means "follow the decoder's reported
/// video size". Clamped to the software maxima in software mode.
///
/// ### 中文
/// 更新固定输出尺寸；任一轴为 0 表示“跟随解码器上报的视频尺寸”。软件模式下按软件上限钳制。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_set_size(
    output: *mut MpvTextureBridgeVideoOutput,
    width: i64,
    height: i64,
) {
    if output.is_null() {
        return;
    }
    unsafe { &(*output).inner }.set_dimensions(width, height);
}

#[unsafe(no_mangle)]
/// ### English
/// The opaque identifier the host uses to refer to this output's texture.
///
/// ### 中文
/// 宿主用于指代该输出纹理的不透明 id。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_texture_id(
    output: *mut MpvTextureBridgeVideoOutput,
) -> i64 {
    if output.is_null() {
        return 0;
    }
    unsafe { &(*output).inner }.texture_id()
}

#[unsafe(no_mangle)]
/// ### English
/// Current render dimensions: the fixed size when set, else the decoder's reported size with
/// rotation applied (clamped in software mode). 0 until the first frame is decoded.
///
/// ### 中文
/// 当前渲染宽度：已设置固定尺寸时取固定值，否则取解码器上报尺寸并应用旋转
///（软件模式下钳制）。首帧解码前为 0。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_width(
    output: *mut MpvTextureBridgeVideoOutput,
) -> i64 {
    if output.is_null() {
        return 0;
    }
    unsafe { &(*output).inner }.current_dimensions().width as i64
}

#[unsafe(no_mangle)]
/// ### English
/// See `mpv_texture_bridge_video_output_width`.
///
/// ### 中文
/// 参见 `mpv_texture_bridge_video_output_width`。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_height(
    output: *mut MpvTextureBridgeVideoOutput,
) -> i64 {
    if output.is_null() {
        return 0;
    }
    unsafe { &(*output).inner }.current_dimensions().height as i64
}

#[unsafe(no_mangle)]
/// ### English
/// Installs the widget-layer dimension callback. The current dimensions are emitted
/// immediately ((1, 1) when following the decoder), so the `Texture` widget mounts and the
/// frame-available notifications actually reach a sampler.
///
/// ### 中文
/// 安装 widget 层尺寸回调。当前尺寸会立即推送（跟随解码器时为 (1, 1)），
/// 使 `Texture` widget 完成挂载、帧可用通知真正有人消费。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_set_texture_update_callback(
    output: *mut MpvTextureBridgeVideoOutput,
    callback: Option<MpvTextureBridgeTextureUpdateCallback>,
    context: *mut c_void,
) {
    if output.is_null() {
        return;
    }
    let Some(callback) = callback else {
        return;
    };
    unsafe { &(*output).inner }.set_texture_update_callback(callback, context as usize);
}
