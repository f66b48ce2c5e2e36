/// ### English
/// Core implementation of the mpv → Flutter texture bridge.
///
/// `frame` holds the lock-free producer/consumer hand-off, `rendering` the producer EGL context
/// and the framebuffer pool, `output` the orchestrator, `egl`/`mpv` the embedder-installed
/// function tables for the two external collaborators.
///
/// ### 中文
/// mpv → Flutter 纹理桥接的核心实现。
///
/// `frame` 为无锁生产者/消费者交接，`rendering` 为生产者 EGL 上下文与 framebuffer 池，
/// `output` 为编排器，`egl`/`mpv` 为宿主安装的两个外部协作者函数表。
mod cache;
pub(crate) mod egl;
pub(crate) mod frame;
pub(crate) mod mpv;
pub(crate) mod output;
pub(crate) mod render_thread;
pub(crate) mod rendering;
