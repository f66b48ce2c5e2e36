//! ### English
//! Dimension protocol: fixed size vs. decoder-reported size (with rotation), plus the
//! aspect-preserving clamp applied in software mode.
//!
//! ### 中文
//! 尺寸协议：固定尺寸与解码器上报尺寸（含旋转）的取舍，以及软件模式下保持宽高比的钳制。

use std::sync::atomic::Ordering;

use dpi::PhysicalSize;

use super::VideoOutput;

/// ### English
/// Software-rendering maxima; each axis is capped while preserving aspect ratio.
///
/// ### 中文
/// 软件渲染上限；钳制任一轴时保持宽高比。
pub(super) const SW_RENDERING_MAX_WIDTH: u32 = 1920;
pub(super) const SW_RENDERING_MAX_HEIGHT: u32 = 1080;

impl VideoOutput {
    /// ### English
    /// Sets the fixed output dimensions; 0 on either axis means "follow the decoder's reported
    /// video size". Software mode clamps each axis to its maximum.
    ///
    /// #### Parameters
    /// - `width`/`height`: Requested fixed dimensions in pixels.
    ///
    /// ### 中文
    /// 设置固定输出尺寸；任一轴为 0 表示“跟随解码器上报的视频尺寸”。
    /// 软件模式下各轴按其上限钳制。
    ///
    /// #### 参数
    /// - `width`/`height`：请求的固定尺寸（像素）。
    pub(crate) fn set_dimensions(&self, width: i64, height: i64) {
        let (width, height) = if self.is_software() {
            (
                width.clamp(0, SW_RENDERING_MAX_WIDTH as i64),
                height.clamp(0, SW_RENDERING_MAX_HEIGHT as i64),
            )
        } else {
            (width.max(0), height.max(0))
        };
        self.width.store(width, Ordering::Relaxed);
        self.height.store(height, Ordering::Relaxed);
    }

    /// ### English
    /// Fixed dimensions when both are set; 0 means "auto".
    ///
    /// ### 中文
    /// 两轴均已设置时的固定尺寸；0 表示 “auto”。
    pub(crate) fn fixed_dimensions(&self) -> (i64, i64) {
        (
            self.width.load(Ordering::Relaxed),
            self.height.load(Ordering::Relaxed),
        )
    }

    /// ### English
    /// The dimensions to render at right now: the fixed size when both axes are set, otherwise
    /// the decoder's `video-out-params` with rotation applied; software mode clamps the result.
    /// (0, 0) means "no video yet".
    ///
    /// ### 中文
    /// 当前应渲染的尺寸：两轴都固定时取固定值，否则取解码器 `video-out-params` 并应用旋转；
    /// 软件模式下对结果钳制。(0, 0) 表示“尚无视频”。
    pub(crate) fn current_dimensions(&self) -> PhysicalSize<u32> {
        let (fixed_width, fixed_height) = self.fixed_dimensions();
        let size = if fixed_width > 0 && fixed_height > 0 {
            PhysicalSize::new(fixed_width as u32, fixed_height as u32)
        } else {
            self.mpv
                .video_out_params(self.handle)
                .map(|params| params.oriented_size())
                .unwrap_or_else(|| PhysicalSize::new(0, 0))
        };

        if self.is_software() {
            clamp_preserving_aspect(
                size,
                PhysicalSize::new(SW_RENDERING_MAX_WIDTH, SW_RENDERING_MAX_HEIGHT),
            )
        } else {
            size
        }
    }

    fn is_software(&self) -> bool {
        #[cfg(feature = "sw-fallback")]
        {
            matches!(self.backend, super::Backend::Software(_))
        }
        #[cfg(not(feature = "sw-fallback"))]
        {
            false
        }
    }
}

/// ### English
/// Shrinks `size` to fit inside `max` while preserving aspect ratio; sizes already inside pass
/// through untouched. A non-degenerate input never collapses to a zero axis.
///
/// ### 中文
/// 在保持宽高比的前提下将 `size` 缩入 `max`；已在范围内的尺寸原样通过。
/// 非退化输入不会塌缩出零轴。
pub(super) fn clamp_preserving_aspect(
    size: PhysicalSize<u32>,
    max: PhysicalSize<u32>,
) -> PhysicalSize<u32> {
    if size.width == 0 || size.height == 0 {
        return size;
    }
    if size.width <= max.width && size.height <= max.height {
        return size;
    }

    let width = size.width as u64;
    let height = size.height as u64;
    let max_width = max.width as u64;
    let max_height = max.height as u64;

    if height * max_width <= width * max_height {
        // Width-bound: the width hits its maximum first.
        PhysicalSize::new(max.width, ((height * max_width / width) as u32).max(1))
    } else {
        PhysicalSize::new(((width * max_height / height) as u32).max(1), max.height)
    }
}

#[cfg(test)]
mod tests {
    use dpi::PhysicalSize;

    use super::{SW_RENDERING_MAX_HEIGHT, SW_RENDERING_MAX_WIDTH, clamp_preserving_aspect};

    fn clamp(width: u32, height: u32) -> (u32, u32) {
        let clamped = clamp_preserving_aspect(
            PhysicalSize::new(width, height),
            PhysicalSize::new(SW_RENDERING_MAX_WIDTH, SW_RENDERING_MAX_HEIGHT),
        );
        (clamped.width, clamped.height)
    }

    #[test]
    fn sizes_inside_the_maxima_pass_through() {
        assert_eq!(clamp(1280, 720), (1280, 720));
        assert_eq!(clamp(1920, 1080), (1920, 1080));
    }

    #[test]
    fn height_bound_video_is_scaled_to_the_height_maximum() {
        // 4:3 source taller than 16:9 maxima.
        assert_eq!(clamp(4000, 3000), (1440, 1080));
    }

    #[test]
    fn width_bound_video_is_scaled_to_the_width_maximum() {
        assert_eq!(clamp(4000, 1000), (1920, 480));
    }

    #[test]
    fn exact_aspect_hits_both_maxima() {
        assert_eq!(clamp(3840, 2160), (1920, 1080));
    }

    #[test]
    fn degenerate_sizes_are_left_alone() {
        assert_eq!(clamp(0, 0), (0, 0));
        assert_eq!(clamp(0, 4000), (0, 4000));
    }

    #[test]
    fn extreme_ratios_never_collapse_to_zero() {
        assert_eq!(clamp(100_000, 10), (1920, 1));
    }
}
