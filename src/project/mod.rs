//! 部屋・設備キャプチャ（アップロードと送信）

pub mod dispatch;
pub mod upload;

pub use dispatch::{Dispatched, ProjectApi, ProjectDispatcher, RoomState, RoomTransport};
pub use upload::{upload_all, upload_to_slot, LocalImage};
