/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: Bearer → Caller 解決, http: request-id/trace/limit/timeout, cors
 */
pub mod auth;
pub mod cors;
pub mod http;
