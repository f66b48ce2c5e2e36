use super::BufferPool;

impl BufferPool {
    /// ### English
    /// Destroys all slot resources during shutdown: waits on every outstanding fence, then
    /// frees images, textures and FBOs. Leaves `resizing` raised so late consumer polls keep
    /// returning the dummy texture.
    ///
    /// Must run on the render thread with the producer context current.
    ///
    /// ### 中文
    /// 关停期间销毁所有槽位资源：等待全部未决 fence，然后释放 image、纹理与 FBO。
    /// 保持 `resizing` 置位，使迟到的消费者轮询继续返回 dummy 纹理。
    ///
    /// 必须在渲染线程、生产者上下文为 current 时执行。
    pub(crate) fn destroy_all(&self) {
        self.exchange.set_resizing(true);
        let mut state = self.state.lock();
        self.release_slots(&mut state);
    }
}
