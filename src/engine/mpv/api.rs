//! ### English
//! Typed libmpv function table: installation and thin wrappers over the render API.
//!
//! ### 中文
//! 类型化 libmpv 函数表：安装与 render API 的轻量封装。

use std::ffi::{c_char, c_int, c_void};
use std::sync::OnceLock;

use super::types::*;

type MpvSetOptionString =
    unsafe extern "C" fn(*mut mpv_handle, *const c_char, *const c_char) -> c_int;
type MpvGetProperty =
    unsafe extern "C" fn(*mut mpv_handle, *const c_char, c_int, *mut c_void) -> c_int;
type MpvFreeNodeContents = unsafe extern "C" fn(*mut mpv_node);
type MpvRenderContextCreate = unsafe extern "C" fn(
    *mut *mut mpv_render_context,
    *mut mpv_handle,
    *mut mpv_render_param,
) -> c_int;
type MpvRenderContextSetUpdateCallback =
    unsafe extern "C" fn(*mut mpv_render_context, Option<mpv_render_update_fn>, *mut c_void);
type MpvRenderContextRender =
    unsafe extern "C" fn(*mut mpv_render_context, *mut mpv_render_param) -> c_int;
type MpvRenderContextFree = unsafe extern "C" fn(*mut mpv_render_context);

static EMBEDDER_MPV_API: OnceLock<MpvApi> = OnceLock::new();

/// ### English
/// Installs the embedder-provided libmpv function table for this process.
///
/// This is a one-time installation backed by `OnceLock`; repeated calls return an error.
///
/// #### Parameters
/// - `api`: Embedder function pointer table for required libmpv symbols.
///
/// ### 中文
/// 为当前进程安装宿主提供的 libmpv 函数表。
///
/// 该安装由 `OnceLock` 保证只执行一次；重复调用会返回错误。
///
/// #### 参数
/// - `api`：宿主提供的 libmpv 必需符号函数指针表。
pub(crate) fn install_embedder_mpv_api(api: super::EmbedderMpvApi) -> Result<(), String> {
    macro_rules! require {
        ($field:ident) => {
            if api.$field == 0 {
                return Err(concat!("EmbedderMpvApi.", stringify!($field), " is NULL").to_string());
            }
        };
    }
    require!(mpv_set_option_string);
    require!(mpv_get_property);
    require!(mpv_free_node_contents);
    require!(mpv_render_context_create);
    require!(mpv_render_context_set_update_callback);
    require!(mpv_render_context_render);
    require!(mpv_render_context_free);

    let table = MpvApi {
        set_option_string: unsafe {
            std::mem::transmute::<usize, MpvSetOptionString>(api.mpv_set_option_string)
        },
        get_property: unsafe {
            std::mem::transmute::<usize, MpvGetProperty>(api.mpv_get_property)
        },
        free_node_contents: unsafe {
            std::mem::transmute::<usize, MpvFreeNodeContents>(api.mpv_free_node_contents)
        },
        render_context_create: unsafe {
            std::mem::transmute::<usize, MpvRenderContextCreate>(api.mpv_render_context_create)
        },
        render_context_set_update_callback: unsafe {
            std::mem::transmute::<usize, MpvRenderContextSetUpdateCallback>(
                api.mpv_render_context_set_update_callback,
            )
        },
        render_context_render: unsafe {
            std::mem::transmute::<usize, MpvRenderContextRender>(api.mpv_render_context_render)
        },
        render_context_free: unsafe {
            std::mem::transmute::<usize, MpvRenderContextFree>(api.mpv_render_context_free)
        },
    };

    EMBEDDER_MPV_API
        .set(table)
        .map_err(|_| "Embedder mpv API is already installed".to_string())?;
    Ok(())
}

#[derive(Clone, Copy)]
/// ### English
/// Loaded libmpv API used by the bridge (options, property queries, render contexts).
///
/// ### 中文
/// 桥接使用的已加载 libmpv API（选项、属性查询、render context）。
pub(crate) struct MpvApi {
    set_option_string: MpvSetOptionString,
    get_property: MpvGetProperty,
    free_node_contents: MpvFreeNodeContents,
    render_context_create: MpvRenderContextCreate,
    render_context_set_update_callback: MpvRenderContextSetUpdateCallback,
    render_context_render: MpvRenderContextRender,
    render_context_free: MpvRenderContextFree,
}

impl MpvApi {
    /// ### English
    /// Loads the installed libmpv API table.
    ///
    /// An embedder-provided function table must be installed via
    /// `mpv_texture_bridge_set_mpv_api` before calling this.
    ///
    /// ### 中文
    /// 加载已安装的 libmpv API 表。
    ///
    /// 调用前必须由宿主通过 `mpv_texture_bridge_set_mpv_api` 安装函数表。
    #[inline]
    pub(crate) fn load() -> Result<Self, String> {
        EMBEDDER_MPV_API.get().copied().ok_or_else(|| {
            "Embedder mpv API is not installed; call mpv_texture_bridge_set_mpv_api first"
                .to_string()
        })
    }

    /// ### English
    /// Sets a string option on the client handle; a non-zero return is reported but not fatal.
    ///
    /// ### 中文
    /// 在客户端句柄上设置字符串选项；非 0 返回值仅上报、不致命。
    pub(crate) fn set_option(&self, handle: usize, name: &core::ffi::CStr, value: &core::ffi::CStr) {
        let status = unsafe {
            (self.set_option_string)(handle as *mut mpv_handle, name.as_ptr(), value.as_ptr())
        };
        if status != 0 {
            log::warn!(
                "mpv_set_option_string({}) failed: {status}",
                name.to_string_lossy()
            );
        }
    }

    /// ### English
    /// Reads a property in `MPV_FORMAT_NODE`, hands the node to `read`, then frees the node
    /// contents. Returns `None` when the property read fails.
    ///
    /// ### 中文
    /// 以 `MPV_FORMAT_NODE` 读取属性，将节点交给 `read` 处理后释放节点内容。
    /// 属性读取失败时返回 `None`。
    pub(crate) fn get_property_node<R>(
        &self,
        handle: usize,
        name: &core::ffi::CStr,
        read: impl FnOnce(&mpv_node) -> R,
    ) -> Option<R> {
        let mut node = mpv_node::zeroed();
        let status = unsafe {
            (self.get_property)(
                handle as *mut mpv_handle,
                name.as_ptr(),
                MPV_FORMAT_NODE,
                (&raw mut node).cast::<c_void>(),
            )
        };
        if status != 0 {
            return None;
        }
        let result = read(&node);
        unsafe { (self.free_node_contents)(&raw mut node) };
        Some(result)
    }

    /// ### English
    /// Creates a render context with the given parameter list (must end with the terminator).
    /// Returns the context address or an error with mpv's status code.
    ///
    /// ### 中文
    /// 以给定参数列表（必须以终止项结尾）创建 render context。
    /// 返回上下文地址，失败时返回包含 mpv 状态码的错误。
    pub(crate) fn create_render_context(
        &self,
        handle: usize,
        params: &mut [mpv_render_param],
    ) -> Result<usize, String> {
        let mut context: *mut mpv_render_context = std::ptr::null_mut();
        let status = unsafe {
            (self.render_context_create)(
                &mut context,
                handle as *mut mpv_handle,
                params.as_mut_ptr(),
            )
        };
        if status != 0 || context.is_null() {
            return Err(format!("mpv_render_context_create failed: {status}"));
        }
        Ok(context as usize)
    }

    pub(crate) fn set_update_callback(
        &self,
        context: usize,
        callback: mpv_render_update_fn,
        data: *mut c_void,
    ) {
        unsafe {
            (self.render_context_set_update_callback)(
                context as *mut mpv_render_context,
                Some(callback),
                data,
            )
        };
    }

    /// ### English
    /// Clears the update callback; must happen before any teardown so no further frame
    /// notifications can arrive.
    ///
    /// ### 中文
    /// 清除更新回调；必须在任何销毁动作之前执行，确保不再有帧通知到达。
    pub(crate) fn clear_update_callback(&self, context: usize) {
        unsafe {
            (self.render_context_set_update_callback)(
                context as *mut mpv_render_context,
                None,
                std::ptr::null_mut(),
            )
        };
    }

    /// ### English
    /// Renders the next frame into `fbo` at the given size (`FLIP_Y` off). Returns mpv's
    /// status code (0 = success).
    ///
    /// ### 中文
    /// 将下一帧渲染到给定尺寸的 `fbo`（关闭 `FLIP_Y`）。返回 mpv 状态码（0 为成功）。
    pub(crate) fn render_to_fbo(&self, context: usize, fbo: u32, width: u32, height: u32) -> c_int {
        let mut target = mpv_opengl_fbo {
            fbo: fbo as c_int,
            w: width as c_int,
            h: height as c_int,
            internal_format: 0,
        };
        let mut flip_y: c_int = 0;
        let mut params = [
            mpv_render_param {
                kind: MPV_RENDER_PARAM_OPENGL_FBO,
                data: (&raw mut target).cast::<c_void>(),
            },
            mpv_render_param {
                kind: MPV_RENDER_PARAM_FLIP_Y,
                data: (&raw mut flip_y).cast::<c_void>(),
            },
            mpv_render_param::terminator(),
        ];
        unsafe { (self.render_context_render)(context as *mut mpv_render_context, params.as_mut_ptr()) }
    }

    /// ### English
    /// Renders the next frame into a CPU buffer as packed `rgb0`. Returns mpv's status code.
    ///
    /// #### Parameters
    /// - `buffer`: Destination; must hold at least `stride * height` bytes.
    ///
    /// ### 中文
    /// 将下一帧以 `rgb0` 排列渲染到 CPU 缓冲区。返回 mpv 状态码。
    ///
    /// #### 参数
    /// - `buffer`：目标缓冲区；至少容纳 `stride * height` 字节。
    pub(crate) fn render_to_buffer(
        &self,
        context: usize,
        width: u32,
        height: u32,
        buffer: &mut [u8],
    ) -> c_int {
        let mut size: [c_int; 2] = [width as c_int, height as c_int];
        let mut stride: c_int = 4 * width as c_int;
        let mut params = [
            mpv_render_param {
                kind: MPV_RENDER_PARAM_SW_SIZE,
                data: size.as_mut_ptr().cast::<c_void>(),
            },
            mpv_render_param {
                kind: MPV_RENDER_PARAM_SW_FORMAT,
                data: c"rgb0".as_ptr() as *mut c_void,
            },
            mpv_render_param {
                kind: MPV_RENDER_PARAM_SW_STRIDE,
                data: (&raw mut stride).cast::<c_void>(),
            },
            mpv_render_param {
                kind: MPV_RENDER_PARAM_SW_POINTER,
                data: buffer.as_mut_ptr().cast::<c_void>(),
            },
            mpv_render_param::terminator(),
        ];
        unsafe { (self.render_context_render)(context as *mut mpv_render_context, params.as_mut_ptr()) }
    }

    pub(crate) fn free_render_context(&self, context: usize) {
        unsafe { (self.render_context_free)(context as *mut mpv_render_context) };
    }
}
