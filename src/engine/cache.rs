/// ### English
/// Cache-line sized padding helpers shared by lock-free structures in this crate.
///
/// ### 中文
/// 本 crate 内无锁结构共用的 cache line padding 工具。

/// ### English
/// The cache line size we optimize for (bytes).
///
/// ### 中文
/// 作为优化目标的 cache line 大小（字节）。
pub(crate) const CACHE_LINE_BYTES: usize = 64;

/// ### English
/// Padding bytes needed after a field of type `T` so the next field starts on a fresh cache line
/// when the struct is `#[repr(C, align(64))]`.
///
/// ### 中文
/// 当结构体采用 `#[repr(C, align(64))]` 时，类型为 `T` 的字段之后所需的 padding 字节数，
/// 使下一个字段落在新的 cache line 上。
pub(crate) const fn pad_after<T>() -> usize {
    CACHE_LINE_BYTES - (std::mem::size_of::<T>() % CACHE_LINE_BYTES)
}

/// ### English
/// Padding bytes needed after two adjacent fields of types `A` and `B` (same rule as `pad_after`).
///
/// ### 中文
/// 两个相邻字段（类型 `A` 与 `B`）之后所需的 padding 字节数（规则同 `pad_after`）。
pub(crate) const fn pad_after2<A, B>() -> usize {
    CACHE_LINE_BYTES - ((std::mem::size_of::<A>() + std::mem::size_of::<B>()) % CACHE_LINE_BYTES)
}
