//! ### English
//! `video-out-params` extraction: display size plus rotation, as reported by the decoder.
//!
//! ### 中文
//! `video-out-params` 解析：解码器上报的显示尺寸与旋转角。

use std::ffi::CStr;

use dpi::PhysicalSize;

use super::MpvApi;
use super::types::{MPV_FORMAT_INT64, MPV_FORMAT_NODE_MAP, mpv_node};

/// ### English
/// The three integer fields of `video-out-params` this bridge consumes.
///
/// ### 中文
/// 本桥接使用的 `video-out-params` 三个整数字段。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct VideoOutParams {
    /// ### English
    /// Display width in pixels (`dw`).
    ///
    /// ### 中文
    /// 显示宽度（像素，`dw`）。
    pub dw: i64,
    /// ### English
    /// Display height in pixels (`dh`).
    ///
    /// ### 中文
    /// 显示高度（像素，`dh`）。
    pub dh: i64,
    /// ### English
    /// Rotation in degrees (`rotate`); 90/270 swap the reported axes.
    ///
    /// ### 中文
    /// 旋转角度（`rotate`）；90/270 时交换上报的两轴。
    pub rotate: i64,
}

impl VideoOutParams {
    /// ### English
    /// Collects `dw`/`dh`/`rotate` from `(key, value)` pairs; unknown keys are ignored.
    ///
    /// ### 中文
    /// 从 `(key, value)` 对收集 `dw`/`dh`/`rotate`；未知键忽略。
    pub(crate) fn collect<'a>(entries: impl Iterator<Item = (&'a str, i64)>) -> Self {
        let mut params = Self::default();
        for (key, value) in entries {
            match key {
                "dw" => params.dw = value,
                "dh" => params.dh = value,
                "rotate" => params.rotate = value,
                _ => {}
            }
        }
        params
    }

    /// ### English
    /// The frame size with rotation applied: 90° and 270° swap width and height.
    /// Non-positive axes collapse to (0, 0), meaning "no video yet".
    ///
    /// ### 中文
    /// 应用旋转后的帧尺寸：90° 与 270° 交换宽高。
    /// 任一轴非正时返回 (0, 0)，表示“尚无视频”。
    pub(crate) fn oriented_size(&self) -> PhysicalSize<u32> {
        if self.dw <= 0 || self.dh <= 0 {
            return PhysicalSize::new(0, 0);
        }
        let swapped = self.rotate == 90 || self.rotate == 270;
        if swapped {
            PhysicalSize::new(self.dh as u32, self.dw as u32)
        } else {
            PhysicalSize::new(self.dw as u32, self.dh as u32)
        }
    }

    /// ### English
    /// Walks a `MPV_FORMAT_NODE_MAP` node and collects the integer fields.
    ///
    /// Safety: `node` must be a node returned by `mpv_get_property`; the map's keys and values
    /// must be valid for the duration of the call (guaranteed until `mpv_free_node_contents`).
    ///
    /// ### 中文
    /// 遍历 `MPV_FORMAT_NODE_MAP` 节点并收集整数字段。
    ///
    /// 安全性：`node` 必须是 `mpv_get_property` 返回的节点；其键与值须在调用期间有效
    /// （在 `mpv_free_node_contents` 之前均成立）。
    pub(crate) unsafe fn from_node(node: &mpv_node) -> Self {
        if node.format != MPV_FORMAT_NODE_MAP {
            return Self::default();
        }
        let list = unsafe { node.u.list };
        if list.is_null() {
            return Self::default();
        }

        let count = unsafe { (*list).num }.max(0) as usize;
        if count == 0 || unsafe { (*list).keys.is_null() || (*list).values.is_null() } {
            return Self::default();
        }
        let keys = unsafe { std::slice::from_raw_parts((*list).keys, count) };
        let values = unsafe { std::slice::from_raw_parts((*list).values, count) };

        Self::collect(keys.iter().zip(values).filter_map(|(&key, value)| {
            if key.is_null() || value.format != MPV_FORMAT_INT64 {
                return None;
            }
            let key = unsafe { CStr::from_ptr(key) }.to_str().ok()?;
            Some((key, unsafe { value.u.int64 }))
        }))
    }
}

impl MpvApi {
    /// ### English
    /// Queries the decoder's `video-out-params`; `None` until the first frame is decoded.
    ///
    /// ### 中文
    /// 查询解码器的 `video-out-params`；首帧解码前为 `None`。
    pub(crate) fn video_out_params(&self, handle: usize) -> Option<VideoOutParams> {
        self.get_property_node(handle, c"video-out-params", |node| unsafe {
            VideoOutParams::from_node(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::VideoOutParams;

    fn params(dw: i64, dh: i64, rotate: i64) -> VideoOutParams {
        VideoOutParams { dw, dh, rotate }
    }

    #[test]
    fn unrotated_size_passes_through() {
        let size = params(640, 360, 0).oriented_size();
        assert_eq!((size.width, size.height), (640, 360));
    }

    #[test]
    fn quarter_turns_swap_the_axes() {
        let size = params(640, 360, 90).oriented_size();
        assert_eq!((size.width, size.height), (360, 640));

        let size = params(640, 360, 270).oriented_size();
        assert_eq!((size.width, size.height), (360, 640));
    }

    #[test]
    fn half_turn_keeps_the_axes() {
        let size = params(1920, 1080, 180).oriented_size();
        assert_eq!((size.width, size.height), (1920, 1080));
    }

    #[test]
    fn missing_video_reports_zero() {
        assert_eq!(params(0, 0, 0).oriented_size().width, 0);
        assert_eq!(params(-1, 360, 0).oriented_size().height, 0);
    }

    #[test]
    fn collect_ignores_unknown_keys() {
        let collected = VideoOutParams::collect(
            [("dw", 1280), ("dh", 720), ("rotate", 90), ("par", 1)].into_iter(),
        );
        assert_eq!(collected, params(1280, 720, 90));
    }
}
