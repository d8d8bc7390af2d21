//! 画面コンポーネント

pub mod agent_profile;
pub mod contact;
pub mod create_phd;
pub mod form;
pub mod header;
pub mod home;
pub mod login;
pub mod project_opportunity;
pub mod project_rooms;
pub mod signup;
pub mod toast;
pub mod view_phd;
