//! User intents raised from a laboratory card.
//!
//! The core only names these signals; navigation, edit dialogs and delete
//! confirmation belong to whoever consumes them.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// What the user asked to do with a laboratory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaboratoryIntent {
    Select,
    Edit,
    Delete,
}

impl LaboratoryIntent {
    /// Dot-separated event name, e.g. `"laboratory.select_requested"`.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Select => "laboratory.select_requested",
            Self::Edit => "laboratory.edit_requested",
            Self::Delete => "laboratory.delete_requested",
        }
    }
}

/// An intent bound to the laboratory it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSignal {
    pub laboratory_id: DbId,
    pub intent: LaboratoryIntent,
}

impl IntentSignal {
    pub fn new(laboratory_id: DbId, intent: LaboratoryIntent) -> Self {
        Self {
            laboratory_id,
            intent,
        }
    }
}
