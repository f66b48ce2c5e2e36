/// ### English
/// Minimal libmpv render-API binding driven by an embedder-provided function table.
///
/// The decoder handle (`mpv_handle*`) is created and owned by the Dart/player side; this crate
/// only drives the render API against it. The glue installs the seven entry points the bridge
/// consumes; nothing links against libmpv directly.
///
/// ### 中文
/// 由宿主提供函数表驱动的最小 libmpv render API 绑定。
///
/// 解码器句柄（`mpv_handle*`）由 Dart/播放器侧创建并持有；本 crate 仅对其驱动 render API。
/// 胶水层安装桥接所需的七个入口；不直接链接 libmpv。
mod api;
pub(crate) mod params;
pub(crate) mod types;

pub(crate) use api::{MpvApi, install_embedder_mpv_api};

#[repr(C)]
#[derive(Clone, Copy, Default)]
/// ### English
/// Function pointer table for libmpv symbols provided by the embedder (Flutter plugin glue).
///
/// All fields are raw addresses (`usize`) and must be non-zero when installing.
///
/// ### 中文
/// 由宿主（Flutter 插件胶水层）提供的 libmpv 符号函数指针表。
///
/// 所有字段都是原始地址（`usize`），安装时必须全部为非 0。
pub struct EmbedderMpvApi {
    pub mpv_set_option_string: usize,
    pub mpv_get_property: usize,
    pub mpv_free_node_contents: usize,
    pub mpv_render_context_create: usize,
    pub mpv_render_context_set_update_callback: usize,
    pub mpv_render_context_render: usize,
    pub mpv_render_context_free: usize,
}
