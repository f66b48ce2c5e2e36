//! ### English
//! Consumer-side operations for `FrameExchange` (Flutter raster thread only).
//!
//! Fence readiness and destruction are injected as closures so the selection protocol stays
//! independent of EGL and fully testable.
//!
//! ### 中文
//! `FrameExchange` 的消费者侧操作（仅 Flutter raster 线程）。
//!
//! fence 的就绪判断与销毁以闭包注入，使选择协议与 EGL 解耦并可完整测试。

use std::sync::atomic::Ordering;

use super::super::{BUFFER_SLOT_COUNT, DisplayFrame, SLOT_READY};
use super::FrameExchange;

impl FrameExchange {
    /// ### English
    /// Tries to advance to the newest fully-rendered frame.
    ///
    /// Scans every `SLOT_READY` slot whose sequence is newer than `consumer_seq`, polls its
    /// fence without blocking, and picks the ready candidate with the largest sequence.
    /// Non-`READY` slots are skipped outright: a slot under an in-flight overwrite still
    /// carries its old sequence and a zero fence, and must never be handed out. The winner's
    /// sequence is published into `display_seq` (release) *before* returning, which keeps the
    /// producer away from the chosen slot on its next selection.
    ///
    /// Returns `None` while resizing, or when no newer complete frame exists this poll.
    ///
    /// #### Parameters
    /// - `fence_ready`: Zero-timeout poll; `true` iff the fence has signaled.
    /// - `destroy_fence`: Destroys a fence whose ownership this call has claimed.
    ///
    /// ### 中文
    /// 尝试推进到最新的完整渲染帧。
    ///
    /// 扫描所有序号大于 `consumer_seq` 的 `SLOT_READY` 槽位，以非阻塞方式轮询其 fence，
    /// 并在就绪候选中选择序号最大者。非 `READY` 槽位一律跳过：正在被覆盖写入的槽位仍携带
    /// 旧序号与零 fence，绝不能交出。被选中槽位的序号会在返回*之前*以 release 写入
    /// `display_seq`，使生产者在下一次选择时避开该槽位。
    ///
    /// resizing 期间或本次轮询没有更新的完整帧时返回 `None`。
    ///
    /// #### 参数
    /// - `fence_ready`：零超时轮询；fence 已 signal 时返回 `true`。
    /// - `destroy_fence`：销毁本次调用已取得所有权的 fence。
    pub(crate) fn select_display_frame(
        &self,
        mut fence_ready: impl FnMut(u64) -> bool,
        mut destroy_fence: impl FnMut(u64),
    ) -> Option<DisplayFrame> {
        if self.is_resizing() {
            return None;
        }

        let consumer = self.meta.consumer_seq.load(Ordering::Relaxed);

        let mut candidate: Option<(usize, u64)> = None;
        for slot in 0..BUFFER_SLOT_COUNT {
            if self.slots[slot].state.load(Ordering::Acquire) != SLOT_READY {
                continue;
            }
            let seq = self.slots[slot].seq.load(Ordering::Acquire);
            if seq <= consumer {
                continue;
            }

            let fence = self.slots[slot].fence.load(Ordering::Acquire);
            if fence != 0 {
                if !fence_ready(fence) {
                    continue;
                }
                /*
                ### English
                The producer may have reclaimed this slot concurrently; whoever wins the CAS
                owns destruction of the sync object.

                ### 中文
                生产者可能并发回收了该槽位；CAS 的胜者获得 sync 对象的销毁所有权。
                */
                if self.try_claim_fence(slot, fence) {
                    destroy_fence(fence);
                }
            }

            match candidate {
                Some((_, best)) if best >= seq => {}
                _ => candidate = Some((slot, seq)),
            }
        }

        let (slot, seq) = candidate?;
        self.meta.consumer_seq.store(seq, Ordering::Relaxed);
        self.meta.display_seq.store(seq, Ordering::Release);
        Some(self.display_frame(slot, seq))
    }

    /// ### English
    /// Returns the frame currently protected by `display_seq` without advancing anything,
    /// re-publishing its sequence so the protection stays in force. On a cold start (nothing
    /// displayed yet) falls back to the `SLOT_READY`, fence-free slot with the largest
    /// non-zero sequence.
    ///
    /// ### 中文
    /// 返回当前由 `display_seq` 保护的帧且不推进任何状态，并重新发布其序号以维持保护。
    /// 冷启动（尚未显示任何帧）时回退到序号最大、`SLOT_READY` 且无未决 fence 的非空槽位。
    pub(crate) fn current_display_frame(&self) -> Option<DisplayFrame> {
        if self.is_resizing() {
            return None;
        }

        let display = self.meta.display_seq.load(Ordering::Relaxed);

        let mut fallback: Option<(usize, u64)> = None;
        for slot in 0..BUFFER_SLOT_COUNT {
            if self.slots[slot].state.load(Ordering::Acquire) != SLOT_READY {
                continue;
            }
            let seq = self.slots[slot].seq.load(Ordering::Acquire);
            if seq == 0 {
                continue;
            }
            if display != 0 && seq == display {
                self.meta.display_seq.store(seq, Ordering::Release);
                return Some(self.display_frame(slot, seq));
            }
            if self.slots[slot].fence.load(Ordering::Acquire) != 0 {
                continue;
            }
            match fallback {
                Some((_, best)) if best >= seq => {}
                _ => fallback = Some((slot, seq)),
            }
        }

        let (slot, seq) = fallback?;
        self.meta.display_seq.store(seq, Ordering::Release);
        Some(self.display_frame(slot, seq))
    }

    fn display_frame(&self, slot: usize, seq: u64) -> DisplayFrame {
        let size = self.slot_size(slot);
        DisplayFrame {
            slot,
            seq,
            image: self.slot_image(slot),
            width: size.width,
            height: size.height,
        }
    }
}
