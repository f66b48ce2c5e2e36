/// ### English
/// Lock-free frame-exchange state shared between the render thread (producer) and the Flutter
/// raster thread (consumer). Uses atomics to avoid OS locks on the hot path.
///
/// ### 中文
/// 渲染线程（生产者）与 Flutter raster 线程（消费者）共享的无锁帧交换状态。
/// 热路径使用原子操作避免系统锁。
mod exchange;
mod slot;

pub(crate) use exchange::FrameExchange;

/// ### English
/// Fixed framebuffer slot count (always 3; with one slot protected by the consumer, the producer
/// always finds a writable slot without waiting).
///
/// ### 中文
/// 固定的 framebuffer 槽位数量（始终为 3；消费者至多保护一个槽位，生产者无需等待即可找到可写槽位）。
pub(crate) const BUFFER_SLOT_COUNT: usize = 3;

/// ### English
/// Slot has no published frame (never rendered, or the last render was aborted).
///
/// ### 中文
/// 槽位没有已发布的帧（从未渲染，或上次渲染被中止）。
pub(crate) const SLOT_FREE: u8 = 0;
/// ### English
/// Slot carries a published frame; the only state the consumer may select.
///
/// ### 中文
/// 槽位携带已发布的帧；消费者唯一可选择的状态。
pub(crate) const SLOT_READY: u8 = 1;
/// ### English
/// The producer is rendering into this slot. Its old sequence may still be visible, so the
/// consumer must never treat the slot's zero fence as "ready".
///
/// ### 中文
/// 生产者正在渲染写入该槽位。其旧序号可能仍然可见，因此消费者绝不能把该槽位的零 fence
/// 当作“就绪”。
pub(crate) const SLOT_RENDERING: u8 = 2;

/// ### English
/// Metadata for the slot currently chosen for display (consumer side / Flutter raster thread).
///
/// ### 中文
/// 当前被选为显示槽位的元数据（消费者侧 / Flutter raster 线程）。
#[derive(Clone, Copy, Debug)]
pub(crate) struct DisplayFrame {
    /// ### English
    /// Buffer-pool slot index (0..=2).
    ///
    /// ### 中文
    /// 缓冲池槽位索引（0..=2）。
    pub slot: usize,
    /// ### English
    /// Sequence number the slot carried when it was chosen.
    ///
    /// ### 中文
    /// 选中时该槽位携带的帧序号。
    pub seq: u64,
    /// ### English
    /// Shareable image handle (`EGLImageKHR` cast to `u64`), or 0 if the slot has no image.
    ///
    /// ### 中文
    /// 可共享 image 句柄（`EGLImageKHR` 转为 `u64`），槽位无 image 时为 0。
    pub image: u64,
    /// ### English
    /// Frame width in pixels.
    ///
    /// ### 中文
    /// 帧宽度（像素）。
    pub width: u32,
    /// ### English
    /// Frame height in pixels.
    ///
    /// ### 中文
    /// 帧高度（像素）。
    pub height: u32,
}
