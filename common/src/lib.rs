//! Dazl Common Library
//!
//! CLIとWeb(WASM)で共有されるフォーム・ウィザード・送信ペイロードのロジック。
//! I/Oは持たない。

pub mod api;
pub mod dispatch;
pub mod error;
pub mod feature_list;
pub mod forms;
pub mod notice;
pub mod payload;
pub mod report;
pub mod routes;
pub mod storage;
pub mod upload;
pub mod validation;
pub mod wizard;

pub use api::{Endpoint, Method, DEFAULT_BASE_URL};
pub use dispatch::{Dispatched, RoomState, RoomTransport};
pub use error::{Error, Result};
pub use feature_list::{FeatureKey, FeatureList, FeatureOption, FeatureSelection, PhotoList, SlotId};
pub use notice::{Notice, NoticeLevel};
pub use payload::{ProjectBody, ProjectKind, RoomSubmission, SubmissionBuilder, SubmitAction};
pub use routes::Route;
pub use storage::{KeyValueStore, MemoryStore, SessionStore, UserType};
pub use upload::{UploadOutcome, UploadSlots, UploadTicket, UploadedImageRef};
pub use validation::{FileMeta, FormValues, Schema, ValidationErrors};
pub use wizard::{Wizard, WizardEvent, WizardStep};
