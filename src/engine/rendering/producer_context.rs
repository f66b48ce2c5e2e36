//! ### English
//! Producer EGL context: shares objects with the host (Flutter) context so pool textures can be
//! sampled by the compositor without copies.
//!
//! Created on the host thread while the host context is current (its state is snapshotted for
//! sharing and restoration); afterwards the context is only ever made current on the render
//! thread, always through the scoped guard.
//!
//! ### 中文
//! 生产者 EGL 上下文：与宿主（Flutter）上下文共享对象，使缓冲池纹理可被合成器零拷贝采样。
//!
//! 必须在宿主线程、宿主上下文为 current 时创建（此时快照宿主状态用于共享与恢复）；
//! 此后该上下文只会在渲染线程上、且总是通过 scoped guard 变为 current。

use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::egl::EglApi;
use crate::engine::egl::types::*;

/// ### English
/// Config-discovery ladder used when the host's own config id cannot be reused: first configs
/// usable for both window and pbuffer rendering (ES3, then ES2), then pbuffer-only variants.
///
/// ### 中文
/// 无法复用宿主 config id 时的 config 探测阶梯：先尝试 window+pbuffer 通用 config
/// （ES3，其次 ES2），再退化到仅 pbuffer 的变体。
const CONFIG_LADDER: [&[EGLint]; 4] = [
    &[
        EGL_SURFACE_TYPE,
        EGL_WINDOW_BIT | EGL_PBUFFER_BIT,
        EGL_RENDERABLE_TYPE,
        EGL_OPENGL_ES3_BIT,
        EGL_RED_SIZE,
        8,
        EGL_GREEN_SIZE,
        8,
        EGL_BLUE_SIZE,
        8,
        EGL_ALPHA_SIZE,
        8,
        EGL_NONE,
    ],
    &[
        EGL_SURFACE_TYPE,
        EGL_WINDOW_BIT | EGL_PBUFFER_BIT,
        EGL_RENDERABLE_TYPE,
        EGL_OPENGL_ES2_BIT,
        EGL_RED_SIZE,
        8,
        EGL_GREEN_SIZE,
        8,
        EGL_BLUE_SIZE,
        8,
        EGL_ALPHA_SIZE,
        8,
        EGL_NONE,
    ],
    &[
        EGL_SURFACE_TYPE,
        EGL_PBUFFER_BIT,
        EGL_RENDERABLE_TYPE,
        EGL_OPENGL_ES3_BIT,
        EGL_NONE,
    ],
    &[
        EGL_SURFACE_TYPE,
        EGL_PBUFFER_BIT,
        EGL_RENDERABLE_TYPE,
        EGL_OPENGL_ES2_BIT,
        EGL_NONE,
    ],
];

/// ### English
/// Owns the producer context and (if created) its 1×1 pbuffer drawable. The host's surfaces are
/// referenced for sharing and restoration but never owned.
///
/// ### 中文
/// 持有生产者上下文及其（若创建）1×1 pbuffer drawable。宿主的 surface 仅作共享与恢复之用，
/// 绝不持有所有权。
pub(crate) struct ProducerEglContext {
    egl: EglApi,
    /// ### English
    /// Shared EGL display, snapshotted from the host at init.
    ///
    /// ### 中文
    /// 共享 EGL display，初始化时从宿主快照。
    display: usize,
    /// ### English
    /// The producer context (shares objects with the host context).
    ///
    /// ### 中文
    /// 生产者上下文（与宿主上下文共享对象）。
    context: usize,
    /// ### English
    /// Drawable bound on activation: the owned pbuffer, 0 for surfaceless mode, or the host's
    /// draw surface as an emergency last resort.
    ///
    /// ### 中文
    /// 激活时绑定的 drawable：自有 pbuffer、0（surfaceless 模式）、或作为最后手段的宿主
    /// draw surface。
    draw_surface: usize,
    /// ### English
    /// Owned 1×1 pbuffer, or 0 if running surfaceless.
    ///
    /// ### 中文
    /// 自有的 1×1 pbuffer；surfaceless 运行时为 0。
    pbuffer: usize,
    /// ### English
    /// Host context/surfaces snapshotted at init (not owned).
    ///
    /// ### 中文
    /// 初始化时快照的宿主上下文/surface（不持有）。
    host_context: usize,
    host_draw: usize,
    host_read: usize,
    /// ### English
    /// Guard flag to make EGL teardown idempotent.
    ///
    /// ### 中文
    /// 防重入标记：保证 EGL 资源销毁幂等。
    destroyed: AtomicBool,
}

impl ProducerEglContext {
    /// ### English
    /// Creates the producer context. Must be called on the host thread with the host context
    /// current; the host state is restored before returning. Any failure reports unavailable
    /// and the caller falls back to software rendering.
    ///
    /// ### 中文
    /// 创建生产者上下文。必须在宿主线程、宿主上下文为 current 时调用；返回前恢复宿主状态。
    /// 任何失败都按不可用上报，由调用方回退到软件渲染。
    pub(crate) fn new(egl: EglApi) -> Result<Self, String> {
        let display = egl.current_display();
        let host_context = egl.current_context();
        let host_draw = egl.current_surface(EGL_DRAW);
        let host_read = egl.current_surface(EGL_READ);
        if display == 0 || host_context == 0 {
            return Err("No current EGL display/context to share with".to_string());
        }

        if !egl.bind_es_api() {
            log::warn!("eglBindAPI(EGL_OPENGL_ES_API) failed: 0x{:x}", egl.get_error());
        }

        let config = Self::discover_config(&egl, display, host_context)
            .ok_or_else(|| "No usable EGL config for the producer context".to_string())?;

        let renderable = egl
            .config_attrib(display, config, EGL_RENDERABLE_TYPE)
            .unwrap_or(0);
        let mut context = egl.create_shared_context(display, config, host_context, 2);
        if context == 0 && renderable & EGL_OPENGL_ES3_BIT != 0 {
            context = egl.create_shared_context(display, config, host_context, 3);
        }
        if context == 0 {
            return Err(format!(
                "eglCreateContext failed: 0x{:x}",
                egl.get_error()
            ));
        }

        let surface_type = egl
            .config_attrib(display, config, EGL_SURFACE_TYPE)
            .unwrap_or(0);
        let pbuffer = if surface_type & EGL_PBUFFER_BIT != 0 {
            egl.create_pbuffer_1x1(display, config)
        } else {
            0
        };

        let mut created = Self {
            egl,
            display,
            context,
            draw_surface: pbuffer,
            pbuffer,
            host_context,
            host_draw,
            host_read,
            destroyed: AtomicBool::new(false),
        };

        if let Err(err) = created.first_activation() {
            created.destroy();
            return Err(err);
        }
        Ok(created)
    }

    /// ### English
    /// Host config id first; the generic ladder only when that exact config is gone.
    ///
    /// ### 中文
    /// 优先按宿主 config id 匹配；仅当该精确 config 不可得时才走通用阶梯。
    fn discover_config(egl: &EglApi, display: usize, host_context: usize) -> Option<usize> {
        if let Some(config_id) = egl.query_context_attrib(display, host_context, EGL_CONFIG_ID) {
            let attribs = [EGL_CONFIG_ID, config_id, EGL_NONE];
            if let Some(config) = egl.choose_first_config(display, &attribs) {
                return Some(config);
            }
        }

        CONFIG_LADDER
            .iter()
            .find_map(|attribs| egl.choose_first_config(display, attribs))
    }

    /// ### English
    /// Verifies the context can actually become current (surfaceless configs may refuse
    /// `EGL_NO_SURFACE`; the host draw surface is the emergency fallback), then restores the
    /// host state.
    ///
    /// ### 中文
    /// 验证上下文确实能变为 current（surfaceless config 可能拒绝 `EGL_NO_SURFACE`；
    /// 此时以宿主 draw surface 作为紧急回退），随后恢复宿主状态。
    fn first_activation(&mut self) -> Result<(), String> {
        let egl = self.egl;
        let mut activated =
            egl.make_current(self.display, self.draw_surface, self.draw_surface, self.context);
        if !activated && self.draw_surface == 0 && self.host_draw != 0 {
            log::warn!(
                "Surfaceless activation failed (0x{:x}); borrowing the host draw surface",
                egl.get_error()
            );
            self.draw_surface = self.host_draw;
            activated =
                egl.make_current(self.display, self.draw_surface, self.draw_surface, self.context);
        }

        let restored =
            egl.make_current(self.display, self.host_draw, self.host_read, self.host_context);
        if !restored {
            log::warn!(
                "Failed to restore the host EGL context after init: 0x{:x}",
                egl.get_error()
            );
        }

        if activated {
            Ok(())
        } else {
            Err(format!(
                "Producer context activation failed: 0x{:x}",
                egl.get_error()
            ))
        }
    }

    /// ### English
    /// Makes the producer context current, returning a guard that restores whatever was current
    /// on this thread when dropped. Saving and restoring is a hard precondition for every
    /// render-thread task, even when the previous state is "nothing".
    ///
    /// ### 中文
    /// 使生产者上下文变为 current，返回的 guard 在 drop 时恢复本线程此前的 current 状态。
    /// 保存并恢复是每个渲染线程任务的硬性前置条件，即便此前状态为“无”。
    pub(crate) fn make_scoped_current(&self) -> Result<ScopedCurrent<'_>, String> {
        let prev_context = self.egl.current_context();
        if prev_context == self.context {
            return Ok(ScopedCurrent {
                owner: self,
                prev_context: 0,
                prev_draw: 0,
                prev_read: 0,
                switched: false,
            });
        }

        let prev_draw = self.egl.current_surface(EGL_DRAW);
        let prev_read = self.egl.current_surface(EGL_READ);
        if !self
            .egl
            .make_current(self.display, self.draw_surface, self.draw_surface, self.context)
        {
            return Err(format!(
                "eglMakeCurrent(producer) failed: 0x{:x}",
                self.egl.get_error()
            ));
        }

        Ok(ScopedCurrent {
            owner: self,
            prev_context,
            prev_draw,
            prev_read,
            switched: true,
        })
    }

    pub(crate) fn display(&self) -> usize {
        self.display
    }

    pub(crate) fn context(&self) -> usize {
        self.context
    }

    /// ### English
    /// Destroys the context and the owned pbuffer (idempotent). The context must no longer be
    /// current anywhere: the render thread is joined before this runs.
    ///
    /// ### 中文
    /// 销毁上下文与自有 pbuffer（幂等）。此时上下文必须不在任何线程上为 current：
    /// 渲染线程已先行 join。
    pub(crate) fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        if self.context != 0 {
            self.egl.destroy_context(self.display, self.context);
        }
        if self.pbuffer != 0 {
            self.egl.destroy_surface(self.display, self.pbuffer);
        }
    }
}

impl Drop for ProducerEglContext {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// ### English
/// RAII guard for producer-context activation; restores the previously current state on drop.
///
/// ### 中文
/// 生产者上下文激活的 RAII guard；drop 时恢复此前的 current 状态。
pub(crate) struct ScopedCurrent<'a> {
    owner: &'a ProducerEglContext,
    prev_context: usize,
    prev_draw: usize,
    prev_read: usize,
    switched: bool,
}

impl Drop for ScopedCurrent<'_> {
    fn drop(&mut self) {
        if !self.switched {
            return;
        }
        let egl = self.owner.egl;
        if !egl.make_current(
            self.owner.display,
            self.prev_draw,
            self.prev_read,
            self.prev_context,
        ) {
            log::warn!(
                "Failed to restore the previous EGL context: 0x{:x}",
                egl.get_error()
            );
        }
    }
}
