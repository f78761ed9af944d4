//! Infrastructure 層
//!
//! - `messaging_client`: `MessagingClient` trait の具体的な実装
//! - `dto`: HTTP API のリクエスト・レスポンス
//! - `qr`: ペアリングコードの描画

pub mod dto;
pub mod messaging_client;
pub mod qr;
