use std::sync::atomic::{AtomicU8, AtomicU32, AtomicU64};

use super::SLOT_FREE;

#[repr(C, align(64))]
pub(super) struct SlotAtomics {
    /// ### English
    /// Slot state (`SLOT_*`). Written by the producer; the consumer only selects `SLOT_READY`
    /// slots, which is what keeps an in-flight overwrite invisible.
    ///
    /// ### 中文
    /// 槽位状态（`SLOT_*`）。由生产者写入；消费者只选择 `SLOT_READY` 槽位，
    /// 正在被覆盖写入的槽位因此不可见。
    pub(super) state: AtomicU8,
    /// ### English
    /// Frame sequence number published into this slot. 0 means "empty / never rendered".
    ///
    /// ### 中文
    /// 发布到该槽位的帧序号。0 表示“空 / 从未渲染”。
    pub(super) seq: AtomicU64,
    /// ### English
    /// Render-done fence (`EGLSyncKHR` cast to `u64`) inserted after rendering into this slot,
    /// or 0 if absent. Destruction ownership transfers by a CAS/swap to 0.
    ///
    /// ### 中文
    /// 渲染完成 fence（`EGLSyncKHR` 转为 `u64`）：渲染写入该槽位后插入；0 表示无。
    /// 销毁所有权通过 CAS/swap 置 0 转移。
    pub(super) fence: AtomicU64,
    /// ### English
    /// Shareable image handle (`EGLImageKHR` cast to `u64`) backing this slot's color texture.
    ///
    /// ### 中文
    /// 该槽位颜色纹理对应的可共享 image 句柄（`EGLImageKHR` 转为 `u64`）。
    pub(super) image: AtomicU64,
    /// ### English
    /// Cached frame width (pixels) for this slot.
    ///
    /// ### 中文
    /// 该槽位缓存的帧宽度（像素）。
    pub(super) width: AtomicU32,
    /// ### English
    /// Cached frame height (pixels) for this slot.
    ///
    /// ### 中文
    /// 该槽位缓存的帧高度（像素）。
    pub(super) height: AtomicU32,
}

impl SlotAtomics {
    pub(super) fn new() -> Self {
        Self {
            state: AtomicU8::new(SLOT_FREE),
            seq: AtomicU64::new(0),
            fence: AtomicU64::new(0),
            image: AtomicU64::new(0),
            width: AtomicU32::new(0),
            height: AtomicU32::new(0),
        }
    }
}
