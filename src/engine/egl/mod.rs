/// ### English
/// Minimal EGL loader driven by an embedder-provided function table.
///
/// The Flutter plugin glue runs in a process where libEGL is already resolved (the embedder
/// renders through it), so instead of a dynamic library lookup the glue installs the handful of
/// core entry points this crate needs; GL and KHR-extension symbols are then resolved internally
/// through `eglGetProcAddress`.
///
/// ### 中文
/// 由宿主提供函数表驱动的最小 EGL loader。
///
/// Flutter 插件胶水层所在进程中 libEGL 已被解析（宿主自身通过它渲染），因此不做动态库
/// 按名查找，而是由胶水层安装本 crate 所需的少量核心入口；GL 与 KHR 扩展符号随后通过
/// `eglGetProcAddress` 在内部解析。
mod api;
mod gl;
pub(crate) mod types;

pub(crate) use api::{EglApi, install_embedder_egl_api};
pub(crate) use gl::{GL_TEXTURE_2D, GlApi};

#[repr(C)]
#[derive(Clone, Copy, Default)]
/// ### English
/// Function pointer table for core EGL symbols provided by the embedder (Flutter plugin glue).
///
/// All fields are raw addresses (`usize`) and must be non-zero when installing.
/// `egl_get_proc_address` must resolve both EGL extension and GL symbols (the same requirement
/// libmpv places on its `get_proc_address` callback).
///
/// ### 中文
/// 由宿主（Flutter 插件胶水层）提供的核心 EGL 符号函数指针表。
///
/// 所有字段都是原始地址（`usize`），安装时必须全部为非 0。
/// `egl_get_proc_address` 必须能解析 EGL 扩展与 GL 符号（与 libmpv 对其
/// `get_proc_address` 回调的要求一致）。
pub struct EmbedderEglApi {
    pub egl_get_proc_address: usize,
    pub egl_get_error: usize,
    pub egl_get_current_display: usize,
    pub egl_get_current_context: usize,
    pub egl_get_current_surface: usize,
    pub egl_bind_api: usize,
    pub egl_query_context: usize,
    pub egl_choose_config: usize,
    pub egl_get_config_attrib: usize,
    pub egl_create_context: usize,
    pub egl_destroy_context: usize,
    pub egl_create_pbuffer_surface: usize,
    pub egl_destroy_surface: usize,
    pub egl_make_current: usize,
}
