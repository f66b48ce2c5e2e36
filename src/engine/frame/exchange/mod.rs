//! ### English
//! Lock-free frame exchange between the producer (render thread) and the consumer (Flutter
//! raster thread).
//!
//! Includes the global sequence counters, the displayed-slot protection word and the resize
//! flags; per-slot state lives in [`super::slot::SlotAtomics`].
//!
//! ### 中文
//! 生产者（渲染线程）与消费者（Flutter raster 线程）之间的无锁帧交换。
//!
//! 包含全局序号计数器、显示槽位保护字与 resize 标记位；每槽位状态位于
//! [`super::slot::SlotAtomics`]。

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use dpi::PhysicalSize;

use crate::engine::cache::{pad_after, pad_after2};

use super::BUFFER_SLOT_COUNT;
use super::slot::SlotAtomics;

const CACHE_PAD_U64_BYTES: usize = pad_after::<AtomicU64>();
const EXCHANGE_FLAGS_PAD_BYTES: usize = pad_after2::<AtomicU64, AtomicU8>();

/// ### English
/// Lock-free shared state for the triple-buffered frame hand-off.
///
/// ### 中文
/// 三缓冲帧交接的无锁共享状态。
#[repr(C)]
pub(crate) struct FrameExchange {
    /// ### English
    /// Per-slot atomics (triple buffer).
    ///
    /// ### 中文
    /// 每个槽位的原子状态（三缓冲）。
    slots: [SlotAtomics; BUFFER_SLOT_COUNT],
    /// ### English
    /// Global metadata shared by all slots (sequence counters / flags).
    ///
    /// ### 中文
    /// 全局元数据（序号计数器/标记位等）。
    meta: ExchangeMeta,
}

#[repr(C, align(64))]
/// ### English
/// Cache-line separated global metadata shared by all slots.
///
/// ### 中文
/// 与槽位分离、按 cache line 隔离的全局元数据。
struct ExchangeMeta {
    /// ### English
    /// Next sequence number the producer will assign. Monotonic; 1 after every epoch reset.
    ///
    /// ### 中文
    /// 生产者将要分配的下一个帧序号。单调递增；每次 epoch 重置后为 1。
    producer_seq: AtomicU64,
    /// ### English
    /// Padding to keep `display_seq` on a separate cache line from `producer_seq`
    /// (reduces false sharing).
    ///
    /// ### 中文
    /// 填充：让 `display_seq` 与 `producer_seq` 尽量处于不同缓存行（降低伪共享）。
    _pad_producer: [u8; CACHE_PAD_U64_BYTES],
    /// ### English
    /// Sequence the consumer is currently showing; the producer never writes to the slot
    /// carrying this sequence. 0 means "nothing displayed yet".
    ///
    /// ### 中文
    /// 消费者当前显示的帧序号；生产者绝不写入携带该序号的槽位。0 表示“尚未显示任何帧”。
    display_seq: AtomicU64,
    /// ### English
    /// Padding for cache-line separation.
    ///
    /// ### 中文
    /// cache line 隔离填充。
    _pad_display: [u8; CACHE_PAD_U64_BYTES],
    /// ### English
    /// Largest sequence the consumer has accepted. Written by the consumer only; monotonic
    /// within an epoch.
    ///
    /// ### 中文
    /// 消费者已接受的最大帧序号。仅由消费者写入；在一个 epoch 内单调递增。
    consumer_seq: AtomicU64,
    /// ### English
    /// Padding for cache-line separation.
    ///
    /// ### 中文
    /// cache line 隔离填充。
    _pad_consumer: [u8; CACHE_PAD_U64_BYTES],
    /// ### English
    /// Global flags shared by all slots.
    ///
    /// ### 中文
    /// 由所有槽位共享的全局标记位。
    flags: ExchangeFlags,
}

#[repr(C, align(64))]
/// ### English
/// Cache-line separated global flags shared by all slots.
///
/// ### 中文
/// 与槽位分离、按 cache line 隔离的全局标记位。
struct ExchangeFlags {
    /// ### English
    /// Pool reallocation generation. Bumped on every epoch reset so the consumer can drop its
    /// cached texture bindings.
    ///
    /// ### 中文
    /// 缓冲池重新分配代数。每次 epoch 重置时递增，供消费者丢弃缓存的纹理绑定。
    epoch: AtomicU64,
    /// ### English
    /// Global resizing flag (consumer must fall back to the dummy texture while non-zero).
    ///
    /// ### 中文
    /// 全局 resizing 标记（非 0 时消费者必须回退到 dummy 纹理）。
    resizing: AtomicU8,
    /// ### English
    /// Padding for cache-line separation.
    ///
    /// ### 中文
    /// cache line 隔离填充。
    _padding: [u8; EXCHANGE_FLAGS_PAD_BYTES],
}

impl FrameExchange {
    /// ### English
    /// Creates a new exchange with all slots empty; sequence 0 is reserved for "empty".
    ///
    /// ### 中文
    /// 创建新的交换状态，所有槽位为空；序号 0 保留表示“空”。
    pub(crate) fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| SlotAtomics::new()),
            meta: ExchangeMeta {
                producer_seq: AtomicU64::new(1),
                _pad_producer: [0; CACHE_PAD_U64_BYTES],
                display_seq: AtomicU64::new(0),
                _pad_display: [0; CACHE_PAD_U64_BYTES],
                consumer_seq: AtomicU64::new(0),
                _pad_consumer: [0; CACHE_PAD_U64_BYTES],
                flags: ExchangeFlags {
                    epoch: AtomicU64::new(0),
                    resizing: AtomicU8::new(0),
                    _padding: [0; EXCHANGE_FLAGS_PAD_BYTES],
                },
            },
        }
    }

    /// ### English
    /// Loads a slot's fence word with Acquire ordering (0 = none).
    ///
    /// ### 中文
    /// 以 Acquire 顺序读取槽位的 fence（0 = 无）。
    #[cfg(test)]
    pub(crate) fn slot_fence(&self, slot: usize) -> u64 {
        self.slots[slot].fence.load(Ordering::Acquire)
    }

    /// ### English
    /// Takes a slot's fence, transferring destruction ownership to the caller (0 = none).
    ///
    /// ### 中文
    /// 取走槽位的 fence，并将销毁所有权转移给调用方（0 = 无）。
    pub(crate) fn take_slot_fence(&self, slot: usize) -> u64 {
        self.slots[slot].fence.swap(0, Ordering::AcqRel)
    }

    /// ### English
    /// CAS a specific fence value to 0; the winner owns destruction of the sync object.
    ///
    /// ### 中文
    /// 将特定 fence 值 CAS 置 0；胜者获得 sync 对象的销毁所有权。
    pub(crate) fn try_claim_fence(&self, slot: usize, fence: u64) -> bool {
        self.slots[slot]
            .fence
            .compare_exchange(fence, 0, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }

    /// ### English
    /// Updates the cached size for a slot (producer / resize path only).
    ///
    /// ### 中文
    /// 更新槽位缓存尺寸（仅生产者 / resize 路径）。
    pub(crate) fn set_slot_size(&self, slot: usize, size: PhysicalSize<u32>) {
        self.slots[slot].width.store(size.width, Ordering::Relaxed);
        self.slots[slot].height.store(size.height, Ordering::Relaxed);
    }

    /// ### English
    /// Stores the shareable image handle for a slot (producer / resize path only).
    ///
    /// ### 中文
    /// 写入槽位的可共享 image 句柄（仅生产者 / resize 路径）。
    pub(crate) fn set_slot_image(&self, slot: usize, image: u64) {
        self.slots[slot].image.store(image, Ordering::Release);
    }

    fn slot_image(&self, slot: usize) -> u64 {
        self.slots[slot].image.load(Ordering::Acquire)
    }

    fn slot_size(&self, slot: usize) -> PhysicalSize<u32> {
        PhysicalSize::new(
            self.slots[slot].width.load(Ordering::Relaxed),
            self.slots[slot].height.load(Ordering::Relaxed),
        )
    }
}

mod consumer;
mod flags;
mod producer;

#[cfg(test)]
mod tests;
