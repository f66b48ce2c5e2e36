//! ### English
//! Triple-buffered framebuffer pool: three FBO/texture/image slots shared with the host context
//! through `EGLImageKHR` handles, guarded per slot by a render-done fence.
//!
//! All slot creation and destruction happens on the render thread under the producer context;
//! the consumer only binds texture names against already-published images.
//!
//! ### 中文
//! 三缓冲 framebuffer 池：三个 FBO/纹理/image 槽位，通过 `EGLImageKHR` 句柄与宿主上下文共享，
//! 每个槽位由渲染完成 fence 保护。
//!
//! 所有槽位的创建与销毁都在渲染线程、生产者上下文下进行；消费者只会将纹理名绑定到已发布的
//! image 上。

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use dpi::PhysicalSize;
use parking_lot::Mutex;

use crate::engine::egl::{EglApi, GlApi};
use crate::engine::frame::{BUFFER_SLOT_COUNT, FrameExchange};

use self::slot::PoolSlot;

mod consumer;
mod ensure;
mod render;
mod slot;
mod teardown;

pub(crate) use consumer::HostTextureCache;

/// ### English
/// The pool and its structural state. `state` is the resize mutex from the hand-off protocol:
/// structural fields change only while it is held on the render thread.
///
/// ### 中文
/// 缓冲池及其结构状态。`state` 即交接协议中的 resize 互斥锁：结构字段仅在渲染线程持锁时变更。
pub(crate) struct BufferPool {
    pub(super) egl: EglApi,
    pub(super) gl: GlApi,
    /// ### English
    /// Shared EGL display (snapshotted from the host at init).
    ///
    /// ### 中文
    /// 共享 EGL display（初始化时从宿主快照）。
    pub(super) display: usize,
    /// ### English
    /// Producer context owning the slot textures; images are created against it.
    ///
    /// ### 中文
    /// 持有槽位纹理的生产者上下文；image 以其为源创建。
    pub(super) image_context: usize,
    /// ### English
    /// Lock-free hand-off state shared with the consumer.
    ///
    /// ### 中文
    /// 与消费者共享的无锁交接状态。
    pub(super) exchange: Arc<FrameExchange>,
    /// ### English
    /// Resize mutex guarding the slots and the allocation size.
    ///
    /// ### 中文
    /// 保护槽位与分配尺寸的 resize 互斥锁。
    pub(super) state: Mutex<PoolState>,
    /// ### English
    /// Slot the producer wrote last; private to the render thread, stored atomically only so
    /// the pool stays `Sync`.
    ///
    /// ### 中文
    /// 生产者最近写入的槽位；仅渲染线程使用，采用原子存储只是为了让池保持 `Sync`。
    pub(super) write_index: AtomicUsize,
}

/// ### English
/// Structural fields behind the resize mutex.
///
/// ### 中文
/// 位于 resize 互斥锁之后的结构字段。
pub(super) struct PoolState {
    pub(super) slots: [PoolSlot; BUFFER_SLOT_COUNT],
    pub(super) size: PhysicalSize<u32>,
    /// ### English
    /// Once true, every slot FBO is valid at `size`.
    ///
    /// ### 中文
    /// 为 true 后，所有槽位 FBO 均按 `size` 有效。
    pub(super) initialized: bool,
}

impl BufferPool {
    pub(crate) fn new(
        egl: EglApi,
        gl: GlApi,
        display: usize,
        image_context: usize,
        exchange: Arc<FrameExchange>,
    ) -> Self {
        Self {
            egl,
            gl,
            display,
            image_context,
            exchange,
            state: Mutex::new(PoolState {
                slots: std::array::from_fn(|_| PoolSlot::empty()),
                size: PhysicalSize::new(0, 0),
                initialized: false,
            }),
            write_index: AtomicUsize::new(0),
        }
    }

    pub(crate) fn exchange(&self) -> &Arc<FrameExchange> {
        &self.exchange
    }
}
