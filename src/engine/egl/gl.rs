//! ### English
//! The dozen GL entry points the pool and the consumer need, resolved through the embedder's
//! `eglGetProcAddress` and stored as typed pointers (same idiom as the EGL table).
//!
//! These are callable from either context on either thread; which context a call affects is
//! purely a matter of what is current on the calling thread.
//!
//! ### 中文
//! 缓冲池与消费者所需的十余个 GL 入口，通过宿主的 `eglGetProcAddress` 解析并存为
//! 类型化指针（与 EGL 表同一惯用法）。
//!
//! 这些入口可在任一线程、任一上下文调用；作用于哪个上下文仅取决于调用线程上何者为 current。

use std::ffi::{CStr, c_void};

type GLenum = u32;
type GLint = i32;
type GLsizei = i32;
type GLuint = u32;

pub(crate) const GL_TEXTURE_2D: GLenum = 0x0DE1;

const GL_FRAMEBUFFER: GLenum = 0x8D40;
const GL_COLOR_ATTACHMENT0: GLenum = 0x8CE0;
const GL_FRAMEBUFFER_COMPLETE: GLenum = 0x8CD5;
const GL_RGBA: GLenum = 0x1908;
const GL_UNSIGNED_BYTE: GLenum = 0x1401;
const GL_TEXTURE_MIN_FILTER: GLenum = 0x2801;
const GL_TEXTURE_MAG_FILTER: GLenum = 0x2800;
const GL_TEXTURE_WRAP_S: GLenum = 0x2802;
const GL_TEXTURE_WRAP_T: GLenum = 0x2803;
const GL_LINEAR: GLint = 0x2601;
const GL_CLAMP_TO_EDGE: GLint = 0x812F;

type GlGenObjects = unsafe extern "C" fn(GLsizei, *mut GLuint);
type GlDeleteObjects = unsafe extern "C" fn(GLsizei, *const GLuint);
type GlBindFramebuffer = unsafe extern "C" fn(GLenum, GLuint);
type GlFramebufferTexture2D = unsafe extern "C" fn(GLenum, GLenum, GLenum, GLuint, GLint);
type GlCheckFramebufferStatus = unsafe extern "C" fn(GLenum) -> GLenum;
type GlBindTexture = unsafe extern "C" fn(GLenum, GLuint);
type GlTexImage2D = unsafe extern "C" fn(
    GLenum,
    GLint,
    GLint,
    GLsizei,
    GLsizei,
    GLint,
    GLenum,
    GLenum,
    *const c_void,
);
type GlTexParameteri = unsafe extern "C" fn(GLenum, GLenum, GLint);
type GlFlush = unsafe extern "C" fn();
type GlFinish = unsafe extern "C" fn();
type GlEglImageTargetTexture2DOes = unsafe extern "C" fn(GLenum, *mut c_void);

#[derive(Clone, Copy)]
/// ### English
/// Loaded GL subset used by the bridge (FBO/texture management, flush, image binding).
///
/// ### 中文
/// 桥接使用的已加载 GL 子集（FBO/纹理管理、flush、image 绑定）。
pub(crate) struct GlApi {
    gen_framebuffers: GlGenObjects,
    delete_framebuffers: GlDeleteObjects,
    bind_framebuffer: GlBindFramebuffer,
    framebuffer_texture_2d: GlFramebufferTexture2D,
    check_framebuffer_status: GlCheckFramebufferStatus,
    gen_textures: GlGenObjects,
    delete_textures: GlDeleteObjects,
    bind_texture: GlBindTexture,
    tex_image_2d: GlTexImage2D,
    tex_parameter_i: GlTexParameteri,
    flush: GlFlush,
    finish: GlFinish,
    egl_image_target_texture_2d_oes: GlEglImageTargetTexture2DOes,
}

impl GlApi {
    /// ### English
    /// Resolves every required GL symbol through `resolve` (address of the named proc, 0 if
    /// unknown). Fails on the first unresolved symbol.
    ///
    /// ### 中文
    /// 通过 `resolve`（按名返回符号地址，未知返回 0）解析所有必需的 GL 符号。
    /// 首个解析失败即返回错误。
    pub(super) fn resolve_with(resolve: impl Fn(&CStr) -> usize) -> Result<Self, String> {
        macro_rules! proc_address {
            ($ty:ty, $name:expr) => {{
                let address = resolve($name);
                if address == 0 {
                    return Err(format!(
                        "eglGetProcAddress could not resolve {}",
                        $name.to_string_lossy()
                    ));
                }
                unsafe { std::mem::transmute::<usize, $ty>(address) }
            }};
        }

        Ok(Self {
            gen_framebuffers: proc_address!(GlGenObjects, c"glGenFramebuffers"),
            delete_framebuffers: proc_address!(GlDeleteObjects, c"glDeleteFramebuffers"),
            bind_framebuffer: proc_address!(GlBindFramebuffer, c"glBindFramebuffer"),
            framebuffer_texture_2d: proc_address!(GlFramebufferTexture2D, c"glFramebufferTexture2D"),
            check_framebuffer_status: proc_address!(
                GlCheckFramebufferStatus,
                c"glCheckFramebufferStatus"
            ),
            gen_textures: proc_address!(GlGenObjects, c"glGenTextures"),
            delete_textures: proc_address!(GlDeleteObjects, c"glDeleteTextures"),
            bind_texture: proc_address!(GlBindTexture, c"glBindTexture"),
            tex_image_2d: proc_address!(GlTexImage2D, c"glTexImage2D"),
            tex_parameter_i: proc_address!(GlTexParameteri, c"glTexParameteri"),
            flush: proc_address!(GlFlush, c"glFlush"),
            finish: proc_address!(GlFinish, c"glFinish"),
            egl_image_target_texture_2d_oes: proc_address!(
                GlEglImageTargetTexture2DOes,
                c"glEGLImageTargetTexture2DOES"
            ),
        })
    }

    pub(crate) fn gen_framebuffer(&self) -> u32 {
        let mut id: GLuint = 0;
        unsafe { (self.gen_framebuffers)(1, &mut id) };
        id
    }

    pub(crate) fn delete_framebuffer(&self, fbo: u32) {
        if fbo != 0 {
            unsafe { (self.delete_framebuffers)(1, &fbo) };
        }
    }

    pub(crate) fn bind_framebuffer(&self, fbo: u32) {
        unsafe { (self.bind_framebuffer)(GL_FRAMEBUFFER, fbo) };
    }

    pub(crate) fn attach_color_texture(&self, texture: u32) {
        unsafe {
            (self.framebuffer_texture_2d)(
                GL_FRAMEBUFFER,
                GL_COLOR_ATTACHMENT0,
                GL_TEXTURE_2D,
                texture,
                0,
            )
        };
    }

    pub(crate) fn framebuffer_complete(&self) -> bool {
        unsafe { (self.check_framebuffer_status)(GL_FRAMEBUFFER) == GL_FRAMEBUFFER_COMPLETE }
    }

    pub(crate) fn gen_texture(&self) -> u32 {
        let mut id: GLuint = 0;
        unsafe { (self.gen_textures)(1, &mut id) };
        id
    }

    pub(crate) fn delete_texture(&self, texture: u32) {
        if texture != 0 {
            unsafe { (self.delete_textures)(1, &texture) };
        }
    }

    pub(crate) fn bind_texture(&self, texture: u32) {
        unsafe { (self.bind_texture)(GL_TEXTURE_2D, texture) };
    }

    /// ### English
    /// Allocates RGBA8 storage for the bound texture (no initial data).
    ///
    /// ### 中文
    /// 为当前绑定纹理分配 RGBA8 存储（无初始数据）。
    pub(crate) fn tex_storage_rgba(&self, width: u32, height: u32) {
        unsafe {
            (self.tex_image_2d)(
                GL_TEXTURE_2D,
                0,
                GL_RGBA as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                GL_RGBA,
                GL_UNSIGNED_BYTE,
                std::ptr::null(),
            )
        };
    }

    /// ### English
    /// Linear min/mag filtering and clamp-to-edge wrapping for the bound texture.
    ///
    /// ### 中文
    /// 为当前绑定纹理设置 linear min/mag 过滤与 clamp-to-edge 环绕。
    pub(crate) fn tex_parameters_linear_clamp(&self) {
        unsafe {
            (self.tex_parameter_i)(GL_TEXTURE_2D, GL_TEXTURE_MIN_FILTER, GL_LINEAR);
            (self.tex_parameter_i)(GL_TEXTURE_2D, GL_TEXTURE_MAG_FILTER, GL_LINEAR);
            (self.tex_parameter_i)(GL_TEXTURE_2D, GL_TEXTURE_WRAP_S, GL_CLAMP_TO_EDGE);
            (self.tex_parameter_i)(GL_TEXTURE_2D, GL_TEXTURE_WRAP_T, GL_CLAMP_TO_EDGE);
        }
    }

    pub(crate) fn flush(&self) {
        unsafe { (self.flush)() };
    }

    pub(crate) fn finish(&self) {
        unsafe { (self.finish)() };
    }

    /// ### English
    /// Binds a shareable image as the backing store of the bound texture name.
    ///
    /// ### 中文
    /// 将可共享 image 绑定为当前纹理名的存储。
    pub(crate) fn bind_image_to_texture(&self, image: u64) {
        unsafe { (self.egl_image_target_texture_2d_oes)(GL_TEXTURE_2D, image as usize as *mut c_void) };
    }
}
