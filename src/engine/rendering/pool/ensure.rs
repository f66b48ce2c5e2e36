//! ### English
//! Pool (re)allocation. Runs only on the render thread with the producer context current.
//!
//! ### 中文
//! 缓冲池（重新）分配。仅在渲染线程、生产者上下文为 current 时执行。

use std::sync::atomic::Ordering;

use dpi::PhysicalSize;

use crate::engine::frame::BUFFER_SLOT_COUNT;

use super::{BufferPool, slot::PoolSlot};

impl BufferPool {
    /// ### English
    /// Ensures every slot is allocated at `size`. A no-op (no fence wait, no reallocation)
    /// when already initialized at that size. Otherwise:
    ///
    /// 1. raise `resizing` (the consumer returns the dummy from here on), take the resize mutex;
    /// 2. wait out and destroy every live fence, then free all slot resources;
    /// 3. allocate three fresh slots, flush, and start a new epoch (sequence counters reset,
    ///    consumer caches invalidated).
    ///
    /// #### Parameters
    /// - `size`: Requested allocation size; both axes must be non-zero.
    ///
    /// ### 中文
    /// 确保所有槽位按 `size` 分配。已按该尺寸初始化时为 no-op（不等 fence、不重新分配）。
    /// 否则：
    ///
    /// 1. 置位 `resizing`（此后消费者返回 dummy），获取 resize 互斥锁；
    /// 2. 等待并销毁所有存活 fence，然后释放全部槽位资源；
    /// 3. 分配三个新槽位，flush，并开启新 epoch（序号计数器重置、消费者缓存失效）。
    ///
    /// #### 参数
    /// - `size`：请求的分配尺寸；两轴都必须非 0。
    pub(crate) fn ensure(&self, size: PhysicalSize<u32>) -> Result<(), String> {
        if size.width == 0 || size.height == 0 {
            return Err("Zero-sized pool allocation requested".to_string());
        }

        {
            let state = self.state.lock();
            if state.initialized && state.size == size {
                return Ok(());
            }
        }

        log::debug!(
            "Reallocating the framebuffer pool at {}x{}",
            size.width,
            size.height
        );

        self.exchange.set_resizing(true);
        let mut state = self.state.lock();

        self.release_slots(&mut state);

        let mut failure = None;
        for index in 0..BUFFER_SLOT_COUNT {
            match PoolSlot::allocate(&self.gl, &self.egl, self.display, self.image_context, size) {
                Ok(slot) => {
                    self.exchange.set_slot_image(index, slot.image);
                    self.exchange.set_slot_size(index, size);
                    state.slots[index] = slot;
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        if let Some(err) = failure {
            self.release_slots(&mut state);
            // Stale sequences must not outlive their images.
            self.exchange.epoch_reset();
            drop(state);
            self.exchange.set_resizing(false);
            return Err(err);
        }

        self.gl.flush();
        self.exchange.epoch_reset();
        self.write_index.store(0, Ordering::Relaxed);

        state.size = size;
        state.initialized = true;
        drop(state);
        self.exchange.set_resizing(false);
        Ok(())
    }

    /// ### English
    /// Waits out every live fence (forever, with flush) and frees all slot resources.
    /// Caller holds the resize mutex on the render thread.
    ///
    /// ### 中文
    /// 等待所有存活 fence（forever、带 flush）并释放全部槽位资源。
    /// 调用方须在渲染线程持有 resize 互斥锁。
    pub(super) fn release_slots(&self, state: &mut super::PoolState) {
        for index in 0..BUFFER_SLOT_COUNT {
            let fence = self.exchange.take_slot_fence(index);
            if fence != 0 {
                self.egl.wait_fence_forever(self.display, fence);
                self.egl.destroy_fence(self.display, fence);
            }

            self.exchange.set_slot_image(index, 0);
            let slot = std::mem::replace(&mut state.slots[index], PoolSlot::empty());
            slot.destroy(&self.gl, &self.egl, self.display);
        }
        state.initialized = false;
    }
}
