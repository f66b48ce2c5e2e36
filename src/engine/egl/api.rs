//! ### English
//! Typed EGL function table: installation, extension resolution and thin wrappers.
//!
//! ### 中文
//! 类型化 EGL 函数表：安装、扩展符号解析与轻量封装。

use std::ffi::{CStr, c_char, c_void};
use std::sync::OnceLock;

use super::gl::GlApi;
use super::types::*;

type EglGetProcAddress = unsafe extern "C" fn(*const c_char) -> *const c_void;
type EglGetError = unsafe extern "C" fn() -> EGLint;
type EglGetCurrentDisplay = unsafe extern "C" fn() -> EGLDisplay;
type EglGetCurrentContext = unsafe extern "C" fn() -> EGLContext;
type EglGetCurrentSurface = unsafe extern "C" fn(EGLint) -> EGLSurface;
type EglBindApi = unsafe extern "C" fn(EGLenum) -> EGLBoolean;
type EglQueryContext = unsafe extern "C" fn(EGLDisplay, EGLContext, EGLint, *mut EGLint) -> EGLBoolean;
type EglChooseConfig =
    unsafe extern "C" fn(EGLDisplay, *const EGLint, *mut EGLConfig, EGLint, *mut EGLint) -> EGLBoolean;
type EglGetConfigAttrib =
    unsafe extern "C" fn(EGLDisplay, EGLConfig, EGLint, *mut EGLint) -> EGLBoolean;
type EglCreateContext =
    unsafe extern "C" fn(EGLDisplay, EGLConfig, EGLContext, *const EGLint) -> EGLContext;
type EglDestroyContext = unsafe extern "C" fn(EGLDisplay, EGLContext) -> EGLBoolean;
type EglCreatePbufferSurface =
    unsafe extern "C" fn(EGLDisplay, EGLConfig, *const EGLint) -> EGLSurface;
type EglDestroySurface = unsafe extern "C" fn(EGLDisplay, EGLSurface) -> EGLBoolean;
type EglMakeCurrent = unsafe extern "C" fn(EGLDisplay, EGLSurface, EGLSurface, EGLContext) -> EGLBoolean;
type EglCreateImageKhr =
    unsafe extern "C" fn(EGLDisplay, EGLContext, EGLenum, EGLClientBuffer, *const EGLint) -> EGLImageKHR;
type EglDestroyImageKhr = unsafe extern "C" fn(EGLDisplay, EGLImageKHR) -> EGLBoolean;
type EglCreateSyncKhr = unsafe extern "C" fn(EGLDisplay, EGLenum, *const EGLint) -> EGLSyncKHR;
type EglDestroySyncKhr = unsafe extern "C" fn(EGLDisplay, EGLSyncKHR) -> EGLBoolean;
type EglClientWaitSyncKhr =
    unsafe extern "C" fn(EGLDisplay, EGLSyncKHR, EGLint, EGLTimeKHR) -> EGLint;

/// ### English
/// Installed table: core entry points from the embedder plus internally resolved extensions
/// and the GL subset.
///
/// ### 中文
/// 已安装的表：宿主提供的核心入口，加上内部解析的扩展符号与 GL 子集。
struct EglStack {
    egl: EglApi,
    gl: GlApi,
}

static EMBEDDER_EGL_API: OnceLock<EglStack> = OnceLock::new();

/// ### English
/// Installs the embedder-provided EGL function table for this process and resolves the
/// KHR-extension and GL symbols through it.
///
/// This is a one-time installation backed by `OnceLock`; repeated calls return an error.
///
/// #### Parameters
/// - `api`: Embedder function pointer table for required core EGL symbols.
///
/// ### 中文
/// 为当前进程安装宿主提供的 EGL 函数表，并通过它解析 KHR 扩展与 GL 符号。
///
/// 该安装由 `OnceLock` 保证只执行一次；重复调用会返回错误。
///
/// #### 参数
/// - `api`：宿主提供的核心 EGL 必需符号函数指针表。
pub(crate) fn install_embedder_egl_api(api: super::EmbedderEglApi) -> Result<(), String> {
    macro_rules! require {
        ($field:ident) => {
            if api.$field == 0 {
                return Err(concat!("EmbedderEglApi.", stringify!($field), " is NULL").to_string());
            }
        };
    }
    require!(egl_get_proc_address);
    require!(egl_get_error);
    require!(egl_get_current_display);
    require!(egl_get_current_context);
    require!(egl_get_current_surface);
    require!(egl_bind_api);
    require!(egl_query_context);
    require!(egl_choose_config);
    require!(egl_get_config_attrib);
    require!(egl_create_context);
    require!(egl_destroy_context);
    require!(egl_create_pbuffer_surface);
    require!(egl_destroy_surface);
    require!(egl_make_current);

    let get_proc_address =
        unsafe { std::mem::transmute::<usize, EglGetProcAddress>(api.egl_get_proc_address) };

    let resolve = |name: &CStr| -> Result<usize, String> {
        let address = unsafe { get_proc_address(name.as_ptr()) } as usize;
        if address == 0 {
            return Err(format!(
                "eglGetProcAddress could not resolve {}",
                name.to_string_lossy()
            ));
        }
        Ok(address)
    };

    let egl = EglApi {
        get_proc_address,
        get_error: unsafe { std::mem::transmute::<usize, EglGetError>(api.egl_get_error) },
        get_current_display: unsafe {
            std::mem::transmute::<usize, EglGetCurrentDisplay>(api.egl_get_current_display)
        },
        get_current_context: unsafe {
            std::mem::transmute::<usize, EglGetCurrentContext>(api.egl_get_current_context)
        },
        get_current_surface: unsafe {
            std::mem::transmute::<usize, EglGetCurrentSurface>(api.egl_get_current_surface)
        },
        bind_api: unsafe { std::mem::transmute::<usize, EglBindApi>(api.egl_bind_api) },
        query_context: unsafe {
            std::mem::transmute::<usize, EglQueryContext>(api.egl_query_context)
        },
        choose_config: unsafe {
            std::mem::transmute::<usize, EglChooseConfig>(api.egl_choose_config)
        },
        get_config_attrib: unsafe {
            std::mem::transmute::<usize, EglGetConfigAttrib>(api.egl_get_config_attrib)
        },
        create_context: unsafe {
            std::mem::transmute::<usize, EglCreateContext>(api.egl_create_context)
        },
        destroy_context: unsafe {
            std::mem::transmute::<usize, EglDestroyContext>(api.egl_destroy_context)
        },
        create_pbuffer_surface: unsafe {
            std::mem::transmute::<usize, EglCreatePbufferSurface>(api.egl_create_pbuffer_surface)
        },
        destroy_surface: unsafe {
            std::mem::transmute::<usize, EglDestroySurface>(api.egl_destroy_surface)
        },
        make_current: unsafe { std::mem::transmute::<usize, EglMakeCurrent>(api.egl_make_current) },
        create_image_khr: unsafe {
            std::mem::transmute::<usize, EglCreateImageKhr>(resolve(c"eglCreateImageKHR")?)
        },
        destroy_image_khr: unsafe {
            std::mem::transmute::<usize, EglDestroyImageKhr>(resolve(c"eglDestroyImageKHR")?)
        },
        create_sync_khr: unsafe {
            std::mem::transmute::<usize, EglCreateSyncKhr>(resolve(c"eglCreateSyncKHR")?)
        },
        destroy_sync_khr: unsafe {
            std::mem::transmute::<usize, EglDestroySyncKhr>(resolve(c"eglDestroySyncKHR")?)
        },
        client_wait_sync_khr: unsafe {
            std::mem::transmute::<usize, EglClientWaitSyncKhr>(resolve(c"eglClientWaitSyncKHR")?)
        },
    };

    let gl = GlApi::resolve_with(|name| unsafe { get_proc_address(name.as_ptr()) } as usize)?;

    EMBEDDER_EGL_API
        .set(EglStack { egl, gl })
        .map_err(|_| "Embedder EGL API is already installed".to_string())?;
    Ok(())
}

#[derive(Clone, Copy)]
/// ### English
/// Loaded EGL API used by the bridge (context control, fences, shareable images).
///
/// ### 中文
/// 桥接使用的已加载 EGL API（上下文控制、fence、可共享 image）。
pub(crate) struct EglApi {
    get_proc_address: EglGetProcAddress,
    get_error: EglGetError,
    get_current_display: EglGetCurrentDisplay,
    get_current_context: EglGetCurrentContext,
    get_current_surface: EglGetCurrentSurface,
    bind_api: EglBindApi,
    query_context: EglQueryContext,
    choose_config: EglChooseConfig,
    get_config_attrib: EglGetConfigAttrib,
    create_context: EglCreateContext,
    destroy_context: EglDestroyContext,
    create_pbuffer_surface: EglCreatePbufferSurface,
    destroy_surface: EglDestroySurface,
    make_current: EglMakeCurrent,
    create_image_khr: EglCreateImageKhr,
    destroy_image_khr: EglDestroyImageKhr,
    create_sync_khr: EglCreateSyncKhr,
    destroy_sync_khr: EglDestroySyncKhr,
    client_wait_sync_khr: EglClientWaitSyncKhr,
}

impl EglApi {
    /// ### English
    /// Loads the installed EGL API table.
    ///
    /// An embedder-provided function table must be installed via
    /// `mpv_texture_bridge_set_egl_api` before calling this.
    ///
    /// ### 中文
    /// 加载已安装的 EGL API 表。
    ///
    /// 调用前必须由宿主通过 `mpv_texture_bridge_set_egl_api` 安装函数表。
    #[inline]
    pub(crate) fn load() -> Result<Self, String> {
        EMBEDDER_EGL_API.get().map(|stack| stack.egl).ok_or_else(|| {
            "Embedder EGL API is not installed; call mpv_texture_bridge_set_egl_api first"
                .to_string()
        })
    }

    #[inline]
    pub(crate) fn get_proc_address(&self, name: *const c_char) -> *const c_void {
        unsafe { (self.get_proc_address)(name) }
    }

    #[inline]
    pub(crate) fn get_error(&self) -> EGLint {
        unsafe { (self.get_error)() }
    }

    #[inline]
    pub(crate) fn current_display(&self) -> usize {
        unsafe { (self.get_current_display)() as usize }
    }

    #[inline]
    pub(crate) fn current_context(&self) -> usize {
        unsafe { (self.get_current_context)() as usize }
    }

    #[inline]
    pub(crate) fn current_surface(&self, which: EGLint) -> usize {
        unsafe { (self.get_current_surface)(which) as usize }
    }

    #[inline]
    pub(crate) fn bind_es_api(&self) -> bool {
        unsafe { (self.bind_api)(EGL_OPENGL_ES_API) == EGL_TRUE }
    }

    /// ### English
    /// Queries one context attribute, e.g. `EGL_CONFIG_ID`.
    ///
    /// ### 中文
    /// 查询单个上下文属性，例如 `EGL_CONFIG_ID`。
    pub(crate) fn query_context_attrib(
        &self,
        display: usize,
        context: usize,
        attrib: EGLint,
    ) -> Option<EGLint> {
        let mut value: EGLint = 0;
        let ok = unsafe {
            (self.query_context)(display as EGLDisplay, context as EGLContext, attrib, &mut value)
        };
        (ok == EGL_TRUE).then_some(value)
    }

    /// ### English
    /// Runs `eglChooseConfig` with `attribs` (must end with `EGL_NONE`) and returns the first
    /// matching config.
    ///
    /// ### 中文
    /// 以 `attribs`（必须以 `EGL_NONE` 结尾）执行 `eglChooseConfig`，返回首个匹配的 config。
    pub(crate) fn choose_first_config(&self, display: usize, attribs: &[EGLint]) -> Option<usize> {
        let mut config: EGLConfig = std::ptr::null_mut();
        let mut count: EGLint = 0;
        let ok = unsafe {
            (self.choose_config)(display as EGLDisplay, attribs.as_ptr(), &mut config, 1, &mut count)
        };
        (ok == EGL_TRUE && count > 0 && !config.is_null()).then_some(config as usize)
    }

    pub(crate) fn config_attrib(&self, display: usize, config: usize, attrib: EGLint) -> Option<EGLint> {
        let mut value: EGLint = 0;
        let ok = unsafe {
            (self.get_config_attrib)(display as EGLDisplay, config as EGLConfig, attrib, &mut value)
        };
        (ok == EGL_TRUE).then_some(value)
    }

    /// ### English
    /// Creates a context sharing objects with `share`, requesting the given ES client version.
    /// Returns 0 on failure.
    ///
    /// ### 中文
    /// 创建与 `share` 共享对象的上下文，并请求给定的 ES client 版本。失败返回 0。
    pub(crate) fn create_shared_context(
        &self,
        display: usize,
        config: usize,
        share: usize,
        client_version: EGLint,
    ) -> usize {
        let attribs = [EGL_CONTEXT_CLIENT_VERSION, client_version, EGL_NONE];
        unsafe {
            (self.create_context)(
                display as EGLDisplay,
                config as EGLConfig,
                share as EGLContext,
                attribs.as_ptr(),
            ) as usize
        }
    }

    pub(crate) fn destroy_context(&self, display: usize, context: usize) {
        unsafe {
            (self.destroy_context)(display as EGLDisplay, context as EGLContext);
        }
    }

    /// ### English
    /// Creates the 1×1 pbuffer drawable used by the producer context. Returns 0 on failure.
    ///
    /// ### 中文
    /// 创建生产者上下文使用的 1×1 pbuffer drawable。失败返回 0。
    pub(crate) fn create_pbuffer_1x1(&self, display: usize, config: usize) -> usize {
        let attribs = [EGL_WIDTH, 1, EGL_HEIGHT, 1, EGL_NONE];
        unsafe {
            (self.create_pbuffer_surface)(display as EGLDisplay, config as EGLConfig, attribs.as_ptr())
                as usize
        }
    }

    pub(crate) fn destroy_surface(&self, display: usize, surface: usize) {
        unsafe {
            (self.destroy_surface)(display as EGLDisplay, surface as EGLSurface);
        }
    }

    pub(crate) fn make_current(&self, display: usize, draw: usize, read: usize, context: usize) -> bool {
        unsafe {
            (self.make_current)(
                display as EGLDisplay,
                draw as EGLSurface,
                read as EGLSurface,
                context as EGLContext,
            ) == EGL_TRUE
        }
    }

    /// ### English
    /// Wraps `texture` (living in `context`) as a shareable `EGLImageKHR`. Returns 0 on failure.
    ///
    /// ### 中文
    /// 将位于 `context` 的 `texture` 包装为可共享的 `EGLImageKHR`。失败返回 0。
    pub(crate) fn create_texture_image(&self, display: usize, context: usize, texture: u32) -> u64 {
        unsafe {
            (self.create_image_khr)(
                display as EGLDisplay,
                context as EGLContext,
                EGL_GL_TEXTURE_2D_KHR,
                texture as usize as EGLClientBuffer,
                std::ptr::null(),
            ) as u64
        }
    }

    pub(crate) fn destroy_image(&self, display: usize, image: u64) {
        if image == 0 {
            return;
        }
        unsafe {
            (self.destroy_image_khr)(display as EGLDisplay, image as usize as EGLImageKHR);
        }
    }

    /// ### English
    /// Creates a fence sync on the current context. Returns 0 on failure; a fence-less slot is
    /// treated as "always ready" by the consumer.
    ///
    /// ### 中文
    /// 在当前上下文创建 fence sync。失败返回 0；无 fence 的槽位由消费者按“始终就绪”处理。
    pub(crate) fn create_fence(&self, display: usize) -> u64 {
        unsafe {
            (self.create_sync_khr)(display as EGLDisplay, EGL_SYNC_FENCE_KHR, std::ptr::null())
                as u64
        }
    }

    pub(crate) fn destroy_fence(&self, display: usize, fence: u64) {
        if fence == 0 {
            return;
        }
        unsafe {
            (self.destroy_sync_khr)(display as EGLDisplay, fence as usize as EGLSyncKHR);
        }
    }

    /// ### English
    /// Zero-timeout fence poll. An unmet fence is "no newer frame this poll", never an error;
    /// a wait error counts as signaled so a broken fence cannot starve the consumer.
    ///
    /// ### 中文
    /// 零超时 fence 轮询。未就绪表示“本次轮询没有更新的帧”，绝不是错误；
    /// 等待出错按已 signal 处理，避免损坏的 fence 饿死消费者。
    pub(crate) fn fence_signaled(&self, display: usize, fence: u64) -> bool {
        let status = unsafe {
            (self.client_wait_sync_khr)(display as EGLDisplay, fence as usize as EGLSyncKHR, 0, 0)
        };
        status != EGL_TIMEOUT_EXPIRED_KHR
    }

    /// ### English
    /// Blocking fence wait with an implicit flush; used only on the render thread during
    /// reallocation and teardown.
    ///
    /// ### 中文
    /// 带隐式 flush 的阻塞 fence 等待；仅在渲染线程的重新分配与销毁路径使用。
    pub(crate) fn wait_fence_forever(&self, display: usize, fence: u64) {
        unsafe {
            (self.client_wait_sync_khr)(
                display as EGLDisplay,
                fence as usize as EGLSyncKHR,
                EGL_SYNC_FLUSH_COMMANDS_BIT_KHR,
                EGL_FOREVER_KHR,
            );
        }
    }
}

impl GlApi {
    /// ### English
    /// Loads the installed GL subset (resolved through the embedder's `eglGetProcAddress`).
    ///
    /// ### 中文
    /// 加载已安装的 GL 子集（通过宿主的 `eglGetProcAddress` 解析）。
    #[inline]
    pub(crate) fn load() -> Result<Self, String> {
        EMBEDDER_EGL_API.get().map(|stack| stack.gl).ok_or_else(|| {
            "Embedder EGL API is not installed; call mpv_texture_bridge_set_egl_api first"
                .to_string()
        })
    }
}
