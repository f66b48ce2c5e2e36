//! ### English
//! Producer-side operations for `FrameExchange` (render thread only).
//!
//! ### 中文
//! `FrameExchange` 的生产者侧操作（仅渲染线程）。

use std::sync::atomic::Ordering;

use super::super::{BUFFER_SLOT_COUNT, SLOT_FREE, SLOT_READY, SLOT_RENDERING};
use super::FrameExchange;

impl FrameExchange {
    /// ### English
    /// Chooses the next write slot and reserves it: any slot whose sequence differs from
    /// `display_seq`, preferring the smallest sequence (oldest frame). The displayed slot is
    /// never chosen. The winner is marked `SLOT_RENDERING` before this returns, so the
    /// consumer stops considering it even though its old sequence is still stored; the caller
    /// must finish with either `publish` or `abort_write`.
    ///
    /// With three slots and at most one of them displayed, a candidate always exists.
    ///
    /// ### 中文
    /// 选择并预留下一个写入槽位：任意序号不等于 `display_seq` 的槽位，并优先选择序号最小
    ///（最旧）的那个。显示槽位绝不会被选中。返回前胜者被标记为 `SLOT_RENDERING`，
    /// 即使其旧序号仍然在槽位中，消费者也不再将其纳入考虑；调用方必须以 `publish` 或
    /// `abort_write` 收尾。
    ///
    /// 三个槽位中至多一个处于显示状态，因此候选槽位必然存在。
    pub(crate) fn select_write_slot(&self) -> usize {
        let display = self.meta.display_seq.load(Ordering::Acquire);

        let mut chosen: Option<(usize, u64)> = None;
        for slot in 0..BUFFER_SLOT_COUNT {
            let seq = self.slots[slot].seq.load(Ordering::Relaxed);
            if display != 0 && seq == display {
                continue;
            }
            match chosen {
                Some((_, best)) if best <= seq => {}
                _ => chosen = Some((slot, seq)),
            }
        }

        let slot = chosen.map_or(0, |(slot, _)| slot);
        self.slots[slot].state.store(SLOT_RENDERING, Ordering::Release);
        slot
    }

    /// ### English
    /// Publishes a rendered slot: assigns the next sequence, stores the render-done fence and
    /// flips the slot to `SLOT_READY` last (release), so a consumer that observes the state
    /// also observes the matching sequence and fence. Returns the assigned sequence.
    ///
    /// #### Parameters
    /// - `slot`: Slot index that was rendered (reserved by `select_write_slot`).
    /// - `fence`: Render-done fence handle (`EGLSyncKHR` cast to `u64`), or 0 if unavailable.
    ///
    /// ### 中文
    /// 发布渲染完成的槽位：分配下一个序号、写入渲染完成 fence，最后（release）将槽位翻转为
    /// `SLOT_READY`，保证消费者看到该状态时也能看到配套的序号与 fence。返回分配的序号。
    ///
    /// #### 参数
    /// - `slot`：已渲染完成的槽位索引（由 `select_write_slot` 预留）。
    /// - `fence`：渲染完成 fence 句柄（`EGLSyncKHR` 转 `u64`），不可用则为 0。
    pub(crate) fn publish(&self, slot: usize, fence: u64) -> u64 {
        let seq = self.meta.producer_seq.fetch_add(1, Ordering::AcqRel);
        self.slots[slot].seq.store(seq, Ordering::Relaxed);
        self.slots[slot].fence.store(fence, Ordering::Relaxed);
        self.slots[slot].state.store(SLOT_READY, Ordering::Release);
        seq
    }

    /// ### English
    /// Abandons a reserved slot after a failed render: the stale pixels were painted over, so
    /// the slot returns to empty. The sequence counter does not advance.
    ///
    /// #### Parameters
    /// - `slot`: Slot index reserved by `select_write_slot`.
    ///
    /// ### 中文
    /// 渲染失败后放弃已预留的槽位：旧像素已被覆盖，槽位回到空状态。序号计数器不会推进。
    ///
    /// #### 参数
    /// - `slot`：由 `select_write_slot` 预留的槽位索引。
    pub(crate) fn abort_write(&self, slot: usize) {
        self.slots[slot].seq.store(0, Ordering::Relaxed);
        self.slots[slot].state.store(SLOT_FREE, Ordering::Release);
    }
}
