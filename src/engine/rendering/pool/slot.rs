use dpi::PhysicalSize;

use crate::engine::egl::{EglApi, GlApi};

/// ### English
/// GL/EGL resources of one pool slot. Lives on the render thread; the consumer sees only the
/// image handle republished through the frame exchange.
///
/// ### 中文
/// 单个池槽位的 GL/EGL 资源。归属渲染线程；消费者只通过帧交换看到重新发布的 image 句柄。
pub(super) struct PoolSlot {
    /// ### English
    /// Offscreen framebuffer object the decoder renders into.
    ///
    /// ### 中文
    /// 解码器渲染写入的离屏 framebuffer 对象。
    pub(super) framebuffer: u32,
    /// ### English
    /// Color texture attached to `framebuffer` (source of the shareable image).
    ///
    /// ### 中文
    /// 绑定到 `framebuffer` 的颜色纹理（可共享 image 的来源）。
    pub(super) texture: u32,
    /// ### English
    /// Shareable image wrapping `texture` (`EGLImageKHR` as `u64`; 0 = none).
    ///
    /// ### 中文
    /// 包装 `texture` 的可共享 image（`EGLImageKHR` 转 `u64`；0 = 无）。
    pub(super) image: u64,
}

impl PoolSlot {
    pub(super) fn empty() -> Self {
        Self {
            framebuffer: 0,
            texture: 0,
            image: 0,
        }
    }

    /// ### English
    /// Allocates FBO → RGBA texture (linear, clamp-to-edge) → attachment → shareable image.
    /// Must run on the render thread with the producer context current.
    ///
    /// ### 中文
    /// 依次分配 FBO → RGBA 纹理（linear、clamp-to-edge）→ 附着 → 可共享 image。
    /// 必须在渲染线程、生产者上下文为 current 时执行。
    pub(super) fn allocate(
        gl: &GlApi,
        egl: &EglApi,
        display: usize,
        image_context: usize,
        size: PhysicalSize<u32>,
    ) -> Result<Self, String> {
        let framebuffer = gl.gen_framebuffer();
        gl.bind_framebuffer(framebuffer);

        let texture = gl.gen_texture();
        gl.bind_texture(texture);
        gl.tex_storage_rgba(size.width, size.height);
        gl.tex_parameters_linear_clamp();
        gl.attach_color_texture(texture);
        gl.bind_texture(0);

        let complete = gl.framebuffer_complete();
        gl.bind_framebuffer(0);
        if !complete {
            let partial = Self {
                framebuffer,
                texture,
                image: 0,
            };
            partial.destroy(gl, egl, display);
            return Err(format!(
                "Slot framebuffer incomplete at {}x{}",
                size.width, size.height
            ));
        }

        let image = egl.create_texture_image(display, image_context, texture);
        if image == 0 {
            let partial = Self {
                framebuffer,
                texture,
                image: 0,
            };
            partial.destroy(gl, egl, display);
            return Err(format!(
                "eglCreateImageKHR failed: 0x{:x}",
                egl.get_error()
            ));
        }

        Ok(Self {
            framebuffer,
            texture,
            image,
        })
    }

    /// ### English
    /// Destroys image, texture and FBO (render thread, producer context current).
    ///
    /// ### 中文
    /// 销毁 image、纹理与 FBO（渲染线程、生产者上下文 current）。
    pub(super) fn destroy(&self, gl: &GlApi, egl: &EglApi, display: usize) {
        egl.destroy_image(display, self.image);
        gl.delete_texture(self.texture);
        gl.delete_framebuffer(self.framebuffer);
    }
}
