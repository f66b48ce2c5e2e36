/// ### English
/// Producer-side rendering: the isolated EGL context and the triple-buffered framebuffer pool.
///
/// ### 中文
/// 生产者侧渲染：隔离的 EGL 上下文与三缓冲 framebuffer 池。
mod pool;
mod producer_context;

pub(crate) use pool::{BufferPool, HostTextureCache};
pub(crate) use producer_context::ProducerEglContext;
