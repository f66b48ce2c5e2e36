//! ### English
//! Consumer-side texture cache (Flutter raster thread, host context current).
//!
//! Binds a host-context texture name against each slot's shareable image exactly once per pool
//! epoch; a reallocation bumps the epoch and the stale names are replaced lazily on the next
//! poll. Also owns the 1×1 dummy returned while no frame is displayable.
//!
//! ### 中文
//! 消费者侧纹理缓存（Flutter raster 线程、宿主上下文 current）。
//!
//! 每个池 epoch 内，槽位的可共享 image 只绑定一次宿主上下文纹理名；重新分配会递增 epoch，
//! 过期纹理名在下次轮询时惰性替换。同时持有无帧可显示时返回的 1×1 dummy。

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::engine::egl::{EglApi, GlApi};
use crate::engine::frame::{BUFFER_SLOT_COUNT, DisplayFrame, FrameExchange};

/// ### English
/// One polled texture answer: `(name, width, height)` for `GL_TEXTURE_2D`.
///
/// ### 中文
/// 单次轮询的纹理结果：`GL_TEXTURE_2D` 的 `(name, width, height)`。
pub(crate) type PolledTexture = (u32, u32, u32);

pub(crate) struct HostTextureCache {
    egl: EglApi,
    gl: GlApi,
    display: usize,
    /// ### English
    /// Host-context texture name bound for each slot (0 = not bound this epoch).
    ///
    /// ### 中文
    /// 每个槽位已绑定的宿主上下文纹理名（0 = 本 epoch 尚未绑定）。
    names: [AtomicU32; BUFFER_SLOT_COUNT],
    /// ### English
    /// Pool epoch each cached name was bound in.
    ///
    /// ### 中文
    /// 每个缓存纹理名绑定时的池 epoch。
    epochs: [AtomicU64; BUFFER_SLOT_COUNT],
    /// ### English
    /// Lazily created 1×1 dummy texture (0 until first needed).
    ///
    /// ### 中文
    /// 惰性创建的 1×1 dummy 纹理（首次需要前为 0）。
    dummy: AtomicU32,
    /// ### English
    /// Last successfully returned texture, kept for degraded polls.
    ///
    /// ### 中文
    /// 最近一次成功返回的纹理，供降级轮询复用。
    last_name: AtomicU32,
    last_width: AtomicU32,
    last_height: AtomicU32,
}

impl HostTextureCache {
    pub(crate) fn new(egl: EglApi, gl: GlApi, display: usize) -> Self {
        Self {
            egl,
            gl,
            display,
            names: std::array::from_fn(|_| AtomicU32::new(0)),
            epochs: std::array::from_fn(|_| AtomicU64::new(0)),
            dummy: AtomicU32::new(0),
            last_name: AtomicU32::new(0),
            last_width: AtomicU32::new(1),
            last_height: AtomicU32::new(1),
        }
    }

    /// ### English
    /// One consumer poll: advance to the newest complete frame if any, else keep the current
    /// display slot, else return the dummy. Never blocks on GPU work.
    ///
    /// ### 中文
    /// 单次消费者轮询：有新完整帧则推进，否则维持当前显示槽位，再不然返回 dummy。
    /// 绝不阻塞等待 GPU。
    pub(crate) fn poll(&self, exchange: &FrameExchange) -> PolledTexture {
        if exchange.is_resizing() {
            return self.dummy_texture();
        }

        let epoch = exchange.epoch();
        let display = self.display;
        let selected = exchange.select_display_frame(
            |fence| self.egl.fence_signaled(display, fence),
            |fence| self.egl.destroy_fence(display, fence),
        );

        let Some(frame) = selected.or_else(|| exchange.current_display_frame()) else {
            return self.dummy_texture();
        };

        match self.bind_frame(epoch, &frame) {
            Some(name) => {
                log::trace!(
                    "displaying seq {} from slot {} as texture {name}",
                    frame.seq,
                    frame.slot
                );
                self.last_name.store(name, Ordering::Relaxed);
                self.last_width.store(frame.width, Ordering::Relaxed);
                self.last_height.store(frame.height, Ordering::Relaxed);
                (name, frame.width, frame.height)
            }
            None => self.degraded_texture(),
        }
    }

    /// ### English
    /// Returns the cached name for the frame's slot, binding a fresh one when the slot has no
    /// binding for the current epoch.
    ///
    /// ### 中文
    /// 返回该帧槽位的缓存纹理名；若本 epoch 尚未绑定则新建绑定。
    fn bind_frame(&self, epoch: u64, frame: &DisplayFrame) -> Option<u32> {
        let slot = frame.slot;
        let cached = self.names[slot].load(Ordering::Relaxed);
        if cached != 0 && self.epochs[slot].load(Ordering::Acquire) == epoch {
            return Some(cached);
        }

        if frame.image == 0 {
            return None;
        }

        if cached != 0 {
            self.gl.delete_texture(cached);
            self.names[slot].store(0, Ordering::Relaxed);
        }

        let name = self.gl.gen_texture();
        if name == 0 {
            log::warn!("glGenTextures failed on the host context");
            return None;
        }
        self.gl.bind_texture(name);
        self.gl.bind_image_to_texture(frame.image);
        self.gl.tex_parameters_linear_clamp();
        self.gl.bind_texture(0);

        self.names[slot].store(name, Ordering::Relaxed);
        self.epochs[slot].store(epoch, Ordering::Release);
        Some(name)
    }

    /// ### English
    /// Degraded answer when no frame can be bound this poll: the last valid texture, else the
    /// dummy. State is never freed on this path.
    ///
    /// ### 中文
    /// 本次轮询无法绑定任何帧时的降级结果：最近一次有效纹理，否则 dummy。该路径绝不释放状态。
    pub(crate) fn degraded_texture(&self) -> PolledTexture {
        let name = self.last_name.load(Ordering::Relaxed);
        if name != 0 {
            return (
                name,
                self.last_width.load(Ordering::Relaxed),
                self.last_height.load(Ordering::Relaxed),
            );
        }
        self.dummy_texture()
    }

    /// ### English
    /// The 1×1 dummy answer; the texture is created on first use in the host context.
    ///
    /// ### 中文
    /// 1×1 dummy 结果；纹理在首次使用时于宿主上下文创建。
    pub(crate) fn dummy_texture(&self) -> PolledTexture {
        let mut dummy = self.dummy.load(Ordering::Relaxed);
        if dummy == 0 {
            dummy = self.gl.gen_texture();
            if dummy != 0 {
                self.gl.bind_texture(dummy);
                self.gl.tex_storage_rgba(1, 1);
                self.gl.tex_parameters_linear_clamp();
                self.gl.bind_texture(0);
                self.dummy.store(dummy, Ordering::Relaxed);
            }
        }
        (dummy, 1, 1)
    }

    /// ### English
    /// Deletes every host-context texture name this cache created. Must run on the host thread
    /// with the host context current (the glue calls it from its texture object's dispose).
    ///
    /// ### 中文
    /// 删除本缓存创建的所有宿主上下文纹理名。必须在宿主线程、宿主上下文 current 时执行
    ///（胶水层在其纹理对象 dispose 中调用）。
    pub(crate) fn release_host_textures(&self) {
        for slot in 0..BUFFER_SLOT_COUNT {
            let name = self.names[slot].swap(0, Ordering::AcqRel);
            self.gl.delete_texture(name);
            self.epochs[slot].store(0, Ordering::Release);
        }
        self.gl.delete_texture(self.dummy.swap(0, Ordering::AcqRel));
        self.last_name.store(0, Ordering::Relaxed);
        self.last_width.store(1, Ordering::Relaxed);
        self.last_height.store(1, Ordering::Relaxed);
    }
}
