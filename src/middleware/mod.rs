/*
 * Responsibility
 * - middleware の公開インターフェース
 * - gate: per-route validation chain, http/security_headers: router-wide layers
 */
pub mod gate;
pub mod http;
pub mod security_headers;
