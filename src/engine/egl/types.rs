//! ### English
//! Raw EGL types and the constants this crate consumes.
//!
//! Handles cross module boundaries as `usize` (0 = the respective `EGL_NO_*` value) so shared
//! structs stay `Send`/`Sync`; they are only widened back to pointers inside the typed wrappers.
//!
//! ### 中文
//! 本 crate 使用的原始 EGL 类型与常量。
//!
//! 句柄以 `usize` 跨模块传递（0 即对应的 `EGL_NO_*`），使共享结构体保持 `Send`/`Sync`；
//! 仅在类型化封装内部转换回指针。

use std::ffi::c_void;

pub(crate) type EGLBoolean = u32;
pub(crate) type EGLint = i32;
pub(crate) type EGLenum = u32;
pub(crate) type EGLTimeKHR = u64;
pub(crate) type EGLDisplay = *mut c_void;
pub(crate) type EGLContext = *mut c_void;
pub(crate) type EGLSurface = *mut c_void;
pub(crate) type EGLConfig = *mut c_void;
pub(crate) type EGLClientBuffer = *mut c_void;
pub(crate) type EGLImageKHR = *mut c_void;
pub(crate) type EGLSyncKHR = *mut c_void;

pub(crate) const EGL_TRUE: EGLBoolean = 1;

pub(crate) const EGL_DRAW: EGLint = 0x3059;
pub(crate) const EGL_READ: EGLint = 0x305A;

pub(crate) const EGL_OPENGL_ES_API: EGLenum = 0x30A0;

pub(crate) const EGL_NONE: EGLint = 0x3038;
pub(crate) const EGL_CONFIG_ID: EGLint = 0x3028;
pub(crate) const EGL_SURFACE_TYPE: EGLint = 0x3033;
pub(crate) const EGL_RENDERABLE_TYPE: EGLint = 0x3040;
pub(crate) const EGL_RED_SIZE: EGLint = 0x3024;
pub(crate) const EGL_GREEN_SIZE: EGLint = 0x3023;
pub(crate) const EGL_BLUE_SIZE: EGLint = 0x3022;
pub(crate) const EGL_ALPHA_SIZE: EGLint = 0x3021;
pub(crate) const EGL_WIDTH: EGLint = 0x3057;
pub(crate) const EGL_HEIGHT: EGLint = 0x3056;

pub(crate) const EGL_WINDOW_BIT: EGLint = 0x0004;
pub(crate) const EGL_PBUFFER_BIT: EGLint = 0x0001;
pub(crate) const EGL_OPENGL_ES2_BIT: EGLint = 0x0004;
pub(crate) const EGL_OPENGL_ES3_BIT: EGLint = 0x0040;

pub(crate) const EGL_CONTEXT_CLIENT_VERSION: EGLint = 0x3098;

/* KHR_fence_sync */
pub(crate) const EGL_SYNC_FENCE_KHR: EGLenum = 0x30F9;
pub(crate) const EGL_SYNC_FLUSH_COMMANDS_BIT_KHR: EGLint = 0x0001;
pub(crate) const EGL_TIMEOUT_EXPIRED_KHR: EGLint = 0x30F5;
pub(crate) const EGL_FOREVER_KHR: EGLTimeKHR = u64::MAX;

/* KHR_gl_texture_2D_image */
pub(crate) const EGL_GL_TEXTURE_2D_KHR: EGLenum = 0x30B1;
