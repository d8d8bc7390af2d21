//! Dazl クライアント（ネイティブCLI）
//!
//! フォーム検証・ペイロード組み立ては `dazl_common`、
//! 通信・セッション保存・コマンド実装はこのクレート。

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod project;
pub mod session;
