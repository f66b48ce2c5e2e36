//! ### English
//! C ABI bindings for the compositor's texture polling.
//!
//! ### 中文
//! 合成器纹理轮询相关的 C ABI 绑定。

use crate::engine::egl::GL_TEXTURE_2D;

use super::MpvTextureBridgeVideoOutput;

#[unsafe(no_mangle)]
/// ### English
/// The polled texture callback for the hardware path (the glue's `FlTextureGL::populate`).
///
/// Must be called on the Flutter raster thread with the host context current. Writes
/// `(GL_TEXTURE_2D, name, width, height)` and returns `true`; a 1×1 dummy is reported before
/// the first frame and during resizes. Never blocks on GPU work. Returns `false` only for the
/// software backend (poll the pixel buffer instead) or NULL arguments.
///
/// ### 中文
/// 硬件路径的纹理轮询回调（胶水层的 `FlTextureGL::populate`）。
///
/// 必须在 Flutter raster 线程、宿主上下文为 current 时调用。写出
/// `(GL_TEXTURE_2D, name, width, height)` 并返回 `true`；首帧前与 resize 期间报告 1×1
/// dummy。绝不阻塞等待 GPU。仅软件后端（请改用像素缓冲轮询）或参数为 NULL 时返回 `false`。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_populate_texture(
    output: *mut MpvTextureBridgeVideoOutput,
    target_out: *mut u32,
    name_out: *mut u32,
    width_out: *mut u32,
    height_out: *mut u32,
) -> bool {
    if output.is_null()
        || target_out.is_null()
        || name_out.is_null()
        || width_out.is_null()
        || height_out.is_null()
    {
        return false;
    }

    let Some((name, width, height)) = unsafe { &(*output).inner }.poll_texture() else {
        return false;
    };

    unsafe {
        *target_out = GL_TEXTURE_2D;
        *name_out = name;
        *width_out = width;
        *height_out = height;
    }
    true
}

#[unsafe(no_mangle)]
/// ### English
/// The pixel-buffer callback for the software path (the glue's `FlPixelBufferTexture`
/// `copy_pixels`). Writes the stable buffer pointer plus the last rendered dimensions and
/// returns `true`; `false` on the GL paths or NULL arguments.
///
/// ### 中文
/// 软件路径的像素缓冲回调（胶水层 `FlPixelBufferTexture` 的 `copy_pixels`）。
/// 写出稳定的缓冲指针与最近渲染尺寸并返回 `true`；GL 路径或参数为 NULL 时返回 `false`。
#[cfg(feature = "sw-fallback")]
pub unsafe extern "C" fn mpv_texture_bridge_video_output_copy_pixel_buffer(
    output: *mut MpvTextureBridgeVideoOutput,
    buffer_out: *mut *const u8,
    width_out: *mut u32,
    height_out: *mut u32,
) -> bool {
    if output.is_null() || buffer_out.is_null() || width_out.is_null() || height_out.is_null() {
        return false;
    }

    let Some((buffer, width, height)) = unsafe { &(*output).inner }.copy_pixel_buffer() else {
        return false;
    };

    unsafe {
        *buffer_out = buffer;
        *width_out = width;
        *height_out = height;
    }
    true
}

#[unsafe(no_mangle)]
/// ### English
/// Deletes the host-context texture names the bridge bound for this output. The glue calls
/// this from its texture object's dispose, on the raster thread with the host context current
/// (polling afterwards re-creates them).
///
/// ### 中文
/// 删除本桥接为该输出绑定的宿主上下文纹理名。胶水层在其纹理对象 dispose 中、raster 线程
/// 且宿主上下文 current 时调用（之后再轮询会重新创建）。
pub unsafe extern "C" fn mpv_texture_bridge_video_output_release_host_textures(
    output: *mut MpvTextureBridgeVideoOutput,
) {
    if output.is_null() {
        return;
    }
    unsafe { &(*output).inner }.release_host_textures();
}
