/*!
 * Request payload extractors
 *
 * Responsibility:
 * - JSON body / path parameter の取り出し
 * - axum 標準の rejection (422 / text/plain) を AppError (400 / JSON) に寄せる
 *
 * Public API:
 * - JsonBody
 * - ChatIdPath
 */

mod core;

pub use core::{ChatIdPath, JsonBody};
