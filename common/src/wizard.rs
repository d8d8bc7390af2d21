//! PHD作成ウィザードの状態遷移
//!
//! Start → ClientDetailsEntered → PriceRangeSet → RoomSelectionOpen
//!       → FeaturesChecked → Submitted → (Reset) Start

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    Start,
    ClientDetailsEntered,
    PriceRangeSet,
    RoomSelectionOpen,
    FeaturesChecked,
    Submitted,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    ClientDetailsSaved,
    PriceRangeConfirmed,
    RoomSelected,
    FeatureToggled { any_checked: bool },
    /// 「Add another room」で部屋を保存
    RoomSaved,
    Submitted,
    Reset,
}

impl fmt::Display for WizardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardEvent::FeatureToggled { .. } => write!(f, "FeatureToggled"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("cannot apply {event} while in {from}")]
    InvalidTransition { from: String, event: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    step: WizardStep,
    saved_rooms: usize,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Start,
            saved_rooms: 0,
        }
    }

    /// 売主情報・価格レンジを持たない（ホームオーナー）案件用
    pub fn rooms_only() -> Self {
        Self {
            step: WizardStep::PriceRangeSet,
            saved_rooms: 0,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn saved_rooms(&self) -> usize {
        self.saved_rooms
    }

    pub fn has_saved_rooms(&self) -> bool {
        self.saved_rooms > 0
    }

    /// ステップ1の入力画面を表示するか
    pub fn shows_client_form(&self) -> bool {
        self.step == WizardStep::Start
    }

    pub fn apply(&mut self, event: WizardEvent) -> Result<WizardStep, WizardError> {
        use WizardEvent as E;
        use WizardStep as S;

        let next = match (self.step, event) {
            (_, E::Reset) => {
                self.saved_rooms = 0;
                S::Start
            }
            (S::Start, E::ClientDetailsSaved) => S::ClientDetailsEntered,
            (S::ClientDetailsEntered, E::PriceRangeConfirmed) => S::PriceRangeSet,
            (S::PriceRangeSet | S::RoomSelectionOpen | S::FeaturesChecked, E::RoomSelected) => {
                S::RoomSelectionOpen
            }
            (S::RoomSelectionOpen | S::FeaturesChecked, E::FeatureToggled { any_checked }) => {
                if any_checked {
                    S::FeaturesChecked
                } else {
                    S::RoomSelectionOpen
                }
            }
            (S::RoomSelectionOpen | S::FeaturesChecked, E::RoomSaved) => {
                self.saved_rooms += 1;
                S::PriceRangeSet
            }
            (S::RoomSelectionOpen | S::FeaturesChecked, E::Submitted) => S::Submitted,
            (from, event) => {
                return Err(WizardError::InvalidTransition {
                    from: from.to_string(),
                    event: event.to_string(),
                })
            }
        };
        self.step = next;
        Ok(next)
    }
}
