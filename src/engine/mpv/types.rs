//! ### English
//! `#[repr(C)]` mirrors of the libmpv types crossed by the render API, plus the constants this
//! crate consumes. Field layout follows `client.h` / `render.h` / `render_gl.h`.
//!
//! ### 中文
//! render API 交互所需 libmpv 类型的 `#[repr(C)]` 镜像，以及本 crate 使用的常量。
//! 字段布局遵循 `client.h` / `render.h` / `render_gl.h`。

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_void};

#[repr(C)]
/// ### English
/// Opaque libmpv client handle (`mpv_handle`).
///
/// ### 中文
/// 不透明 libmpv 客户端句柄（`mpv_handle`）。
pub(crate) struct mpv_handle {
    /// ### English
    /// Opaque zero-sized marker to prevent construction.
    ///
    /// ### 中文
    /// 不透明的零大小占位字段，用于阻止外部构造。
    _private: [u8; 0],
}

#[repr(C)]
/// ### English
/// Opaque libmpv render context (`mpv_render_context`).
///
/// ### 中文
/// 不透明 libmpv render context（`mpv_render_context`）。
pub(crate) struct mpv_render_context {
    /// ### English
    /// Opaque zero-sized marker to prevent construction.
    ///
    /// ### 中文
    /// 不透明的零大小占位字段，用于阻止外部构造。
    _private: [u8; 0],
}

/// ### English
/// Update callback registered with `mpv_render_context_set_update_callback`.
///
/// ### 中文
/// 通过 `mpv_render_context_set_update_callback` 注册的更新回调。
pub(crate) type mpv_render_update_fn = unsafe extern "C" fn(*mut c_void);

/* mpv_render_param_type */
pub(crate) const MPV_RENDER_PARAM_INVALID: c_int = 0;
pub(crate) const MPV_RENDER_PARAM_API_TYPE: c_int = 1;
pub(crate) const MPV_RENDER_PARAM_OPENGL_INIT_PARAMS: c_int = 2;
pub(crate) const MPV_RENDER_PARAM_OPENGL_FBO: c_int = 3;
pub(crate) const MPV_RENDER_PARAM_FLIP_Y: c_int = 4;
pub(crate) const MPV_RENDER_PARAM_X11_DISPLAY: c_int = 8;
pub(crate) const MPV_RENDER_PARAM_WL_DISPLAY: c_int = 9;
pub(crate) const MPV_RENDER_PARAM_SW_SIZE: c_int = 17;
pub(crate) const MPV_RENDER_PARAM_SW_FORMAT: c_int = 18;
pub(crate) const MPV_RENDER_PARAM_SW_STRIDE: c_int = 19;
pub(crate) const MPV_RENDER_PARAM_SW_POINTER: c_int = 20;

pub(crate) const MPV_RENDER_API_TYPE_OPENGL: &core::ffi::CStr = c"opengl";
pub(crate) const MPV_RENDER_API_TYPE_SW: &core::ffi::CStr = c"sw";

/* mpv_format */
pub(crate) const MPV_FORMAT_INT64: c_int = 4;
pub(crate) const MPV_FORMAT_NODE: c_int = 6;
pub(crate) const MPV_FORMAT_NODE_MAP: c_int = 8;

#[repr(C)]
/// ### English
/// One typed render parameter (`mpv_render_param`).
///
/// ### 中文
/// 单个带类型的渲染参数（`mpv_render_param`）。
pub(crate) struct mpv_render_param {
    pub kind: c_int,
    pub data: *mut c_void,
}

impl mpv_render_param {
    pub(crate) fn terminator() -> Self {
        Self {
            kind: MPV_RENDER_PARAM_INVALID,
            data: std::ptr::null_mut(),
        }
    }
}

#[repr(C)]
/// ### English
/// OpenGL init parameters (`mpv_opengl_init_params`): the proc-address loader mpv uses to
/// resolve GL on the context current at creation time.
///
/// ### 中文
/// OpenGL 初始化参数（`mpv_opengl_init_params`）：mpv 用于在创建时的 current 上下文上
/// 解析 GL 的 proc-address loader。
pub(crate) struct mpv_opengl_init_params {
    pub get_proc_address:
        Option<unsafe extern "C" fn(ctx: *mut c_void, name: *const c_char) -> *mut c_void>,
    pub get_proc_address_ctx: *mut c_void,
}

#[repr(C)]
/// ### English
/// Target framebuffer description (`mpv_opengl_fbo`).
///
/// ### 中文
/// 目标 framebuffer 描述（`mpv_opengl_fbo`）。
pub(crate) struct mpv_opengl_fbo {
    pub fbo: c_int,
    pub w: c_int,
    pub h: c_int,
    pub internal_format: c_int,
}

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Value union of `mpv_node`.
///
/// ### 中文
/// `mpv_node` 的取值联合体。
pub(crate) union mpv_node_data {
    pub string: *mut c_char,
    pub flag: c_int,
    pub int64: i64,
    pub double_: f64,
    pub list: *mut mpv_node_list,
    pub ba: *mut c_void,
}

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Tagged value node (`mpv_node`); `format` selects the active union member.
///
/// ### 中文
/// 带标签的值节点（`mpv_node`）；`format` 决定联合体的活动成员。
pub(crate) struct mpv_node {
    pub u: mpv_node_data,
    pub format: c_int,
}

impl mpv_node {
    pub(crate) fn zeroed() -> Self {
        Self {
            u: mpv_node_data { int64: 0 },
            format: 0,
        }
    }
}

#[repr(C)]
/// ### English
/// Node list / map storage (`mpv_node_list`); for maps, `keys[i]` names `values[i]`.
///
/// ### 中文
/// 节点列表 / map 存储（`mpv_node_list`）；对 map 而言，`keys[i]` 是 `values[i]` 的键。
pub(crate) struct mpv_node_list {
    pub num: c_int,
    pub values: *mut mpv_node,
    pub keys: *mut *mut c_char,
}
