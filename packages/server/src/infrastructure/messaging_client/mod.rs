//! メッセージングクライアントの実装
//!
//! ## 実装
//!
//! - `bridge`: WhatsApp Web のセッションを保持するサイドカーと HTTP で通信する実装
//! - `dry_run`: ネットワークに接続せず、送信内容をログに出力する実装

pub mod bridge;
pub mod dry_run;

pub use bridge::{BridgeClient, BridgeConfig};
pub use dry_run::{DryRunClient, SentMessage};
