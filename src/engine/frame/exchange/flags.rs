//! ### English
//! Global flags and the epoch reset for `FrameExchange` (resizing / epoch).
//!
//! ### 中文
//! `FrameExchange` 的全局标记位与 epoch 重置（resizing / epoch）。

use std::sync::atomic::Ordering;

use super::super::{BUFFER_SLOT_COUNT, SLOT_FREE};
use super::FrameExchange;

impl FrameExchange {
    /// ### English
    /// Marks the whole pool as "resizing" (the consumer must return the dummy texture while set).
    ///
    /// #### Parameters
    /// - `resizing`: Whether a reallocation is in progress.
    ///
    /// ### 中文
    /// 标记整个缓冲池处于 “resizing” 状态（期间消费者必须返回 dummy 纹理）。
    ///
    /// #### 参数
    /// - `resizing`：是否正在重新分配。
    pub(crate) fn set_resizing(&self, resizing: bool) {
        self.meta
            .flags
            .resizing
            .store(u8::from(resizing), Ordering::Release);
    }

    /// ### English
    /// Returns whether a reallocation is in progress.
    ///
    /// ### 中文
    /// 返回是否正在重新分配。
    pub(crate) fn is_resizing(&self) -> bool {
        self.meta.flags.resizing.load(Ordering::Acquire) != 0
    }

    /// ### English
    /// Returns the current reallocation generation (consumer-side cache key).
    ///
    /// ### 中文
    /// 返回当前重新分配代数（消费者侧缓存键）。
    pub(crate) fn epoch(&self) -> u64 {
        self.meta.flags.epoch.load(Ordering::Acquire)
    }

    /// ### English
    /// Starts a new epoch after a pool reallocation: returns every slot to `SLOT_FREE` with a
    /// zero sequence, resets `producer_seq` to 1 and `display_seq`/`consumer_seq` to 0, and
    /// bumps the epoch so the consumer drops its cached texture bindings.
    ///
    /// Must run on the render thread with `resizing` set; slot fences must already be gone.
    ///
    /// ### 中文
    /// 缓冲池重新分配后开启新 epoch：将所有槽位回到 `SLOT_FREE` 且序号清零，将
    /// `producer_seq` 重置为 1、`display_seq`/`consumer_seq` 重置为 0，并递增 epoch
    /// 使消费者丢弃缓存的纹理绑定。
    ///
    /// 必须在渲染线程、`resizing` 置位期间执行；此时槽位 fence 必须已全部清理。
    pub(crate) fn epoch_reset(&self) {
        for slot in 0..BUFFER_SLOT_COUNT {
            self.slots[slot].seq.store(0, Ordering::Relaxed);
            self.slots[slot].state.store(SLOT_FREE, Ordering::Relaxed);
        }
        self.meta.producer_seq.store(1, Ordering::Relaxed);
        self.meta.display_seq.store(0, Ordering::Relaxed);
        self.meta.consumer_seq.store(0, Ordering::Relaxed);
        self.meta.flags.epoch.fetch_add(1, Ordering::AcqRel);
    }

    #[cfg(test)]
    pub(crate) fn display_seq_value(&self) -> u64 {
        self.meta.display_seq.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn consumer_seq_value(&self) -> u64 {
        self.meta.consumer_seq.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn producer_seq_value(&self) -> u64 {
        self.meta.producer_seq.load(Ordering::Acquire)
    }
}
