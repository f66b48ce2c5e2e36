//! ### English
//! Decoder update hook: the `void*` handed to libmpv's update callback and to host idle
//! callbacks.
//!
//! Holds only a `Weak` back-reference, which breaks the cycle decoder callback → VideoOutput →
//! decoder context; the strong `Arc` lives in `VideoOutput` until dispose clears the callback.
//!
//! ### 中文
//! 解码器更新钩子：传给 libmpv 更新回调与宿主 idle 回调的 `void*`。
//!
//! 仅持有 `Weak` 反向引用，从而打破“解码器回调 → VideoOutput → 解码器上下文”的环；
//! 强引用 `Arc` 由 `VideoOutput` 持有，直到 dispose 清除回调。

use std::ffi::c_void;
#[cfg(feature = "sw-fallback")]
use std::sync::Arc;
use std::sync::Weak;

use super::VideoOutput;

pub(crate) struct UpdateHook {
    pub(super) output: Weak<VideoOutput>,
}

impl UpdateHook {
    /// ### English
    /// "Frame available" delivery from the decoder's thread; never touches GL.
    ///
    /// ### 中文
    /// 来自解码器线程的 “frame available” 投递；绝不触碰 GL。
    fn fire(&self) {
        if let Some(output) = self.output.upgrade() {
            output.on_frame_available();
        }
    }

    #[cfg(feature = "sw-fallback")]
    fn fire_idle(&self) {
        if let Some(output) = self.output.upgrade() {
            output.software_render();
        }
    }
}

/// ### English
/// `mpv_render_context_set_update_callback` target. `data` is a borrowed `UpdateHook` pointer,
/// valid until dispose clears the callback.
///
/// ### 中文
/// `mpv_render_context_set_update_callback` 的目标。`data` 为借用的 `UpdateHook` 指针，
/// 在 dispose 清除回调前保持有效。
pub(super) unsafe extern "C" fn update_trampoline(data: *mut c_void) {
    if data.is_null() {
        return;
    }
    let hook = unsafe { &*(data as *const UpdateHook) };
    hook.fire();
}

/// ### English
/// Host idle-callback target for the software path. `data` carries an owned `Arc` refcount
/// (taken with `Arc::into_raw` at scheduling time), so a queued idle can never dangle.
///
/// ### 中文
/// 软件路径的宿主 idle 回调目标。`data` 携带一份自有 `Arc` 引用计数（调度时经
/// `Arc::into_raw` 取得），因此排队中的 idle 绝不会悬垂。
#[cfg(feature = "sw-fallback")]
pub(super) unsafe extern "C" fn software_idle_trampoline(data: *mut c_void) {
    if data.is_null() {
        return;
    }
    let hook = unsafe { Arc::from_raw(data as *const UpdateHook) };
    hook.fire_idle();
}
