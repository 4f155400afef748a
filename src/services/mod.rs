/*
 * Responsibility
 * - identity: Bearer credential → Caller (2 種類の resolver)
 * - chat_backend: chat backend への HTTP クライアント
 * - chat_gateway: ownership gate 付きの操作ディスパッチ
 */
pub mod chat_backend;
pub mod chat_gateway;
pub mod identity;
