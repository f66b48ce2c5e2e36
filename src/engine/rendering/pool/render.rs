//! ### English
//! Producer render path: slot selection, decoder render call, fence creation, publish.
//!
//! ### 中文
//! 生产者渲染路径：槽位选择、解码器渲染调用、fence 创建、发布。

use std::sync::atomic::Ordering;

use crate::engine::mpv::MpvApi;

use super::BufferPool;

impl BufferPool {
    /// ### English
    /// Renders one decoder frame into the next write slot and publishes it.
    ///
    /// Returns `true` when a frame was published, `false` when it was discarded (pool not
    /// initialized, or the decoder reported a render error; the sequence counter does not
    /// advance in that case).
    ///
    /// Must run on the render thread with the producer context current.
    ///
    /// #### Parameters
    /// - `mpv`: Decoder API table.
    /// - `render_context`: Decoder render context address.
    ///
    /// ### 中文
    /// 将一帧解码器输出渲染到下一个写入槽位并发布。
    ///
    /// 发布成功返回 `true`；被丢弃（池未初始化，或解码器渲染报错，此时序号计数器不会推进）
    /// 返回 `false`。
    ///
    /// 必须在渲染线程、生产者上下文为 current 时执行。
    ///
    /// #### 参数
    /// - `mpv`：解码器 API 表。
    /// - `render_context`：解码器 render context 地址。
    pub(crate) fn render_frame(&self, mpv: &MpvApi, render_context: usize) -> bool {
        let (slot, framebuffer, width, height) = {
            let state = self.state.lock();
            if !state.initialized {
                return false;
            }
            // Reserves the slot as SLOT_RENDERING; the consumer stops considering it.
            let slot = self.exchange.select_write_slot();
            (
                slot,
                state.slots[slot].framebuffer,
                state.size.width,
                state.size.height,
            )
        };
        self.write_index.store(slot, Ordering::Relaxed);

        let stale_fence = self.exchange.take_slot_fence(slot);
        if stale_fence != 0 {
            self.egl.destroy_fence(self.display, stale_fence);
        }

        self.gl.bind_framebuffer(framebuffer);
        let status = mpv.render_to_fbo(render_context, framebuffer, width, height);
        self.gl.bind_framebuffer(0);

        if status != 0 {
            log::warn!("mpv_render_context_render failed: {status}; frame dropped");
            self.exchange.abort_write(slot);
            return false;
        }

        self.gl.flush();
        let fence = self.egl.create_fence(self.display);
        if fence == 0 {
            /*
            ### English
            Without a fence the slot publishes as "always ready"; drain the pipeline first so
            the consumer cannot sample a half-written frame.

            ### 中文
            没有 fence 时槽位按“始终就绪”发布；先排空流水线，避免消费者采到半写帧。
            */
            log::warn!("eglCreateSyncKHR failed: 0x{:x}", self.egl.get_error());
            self.gl.finish();
        }

        self.exchange.publish(slot, fence);
        true
    }
}
