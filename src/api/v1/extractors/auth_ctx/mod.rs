/*!
 * Authenticated caller extractor
 *
 * Responsibility:
 * - access middleware が解決した `Caller` を handler に提供する
 * - HTTP / axum 依存は core に閉じ込める
 *
 * Public API:
 * - AuthCaller
 */

mod core;

pub use core::AuthCaller;
