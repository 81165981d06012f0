use alloc::{string::String, vec::Vec};

/// Aggregated render output for the active screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub content: ViewContent,
    pub hint_bar: HintBar,
    /// One-line notice such as a failed save or an unavailable keyboard host.
    pub status: Option<String>,
}

/// Footer with per-screen button hints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintBar {
    pub hints: Vec<HintItem>,
}

impl HintBar {
    pub fn new(hints: Vec<HintItem>) -> Self {
        Self { hints }
    }
}

/// Button-action pairing presented in the hint bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintItem {
    pub key: String,
    pub action: String,
}

impl HintItem {
    pub fn new<K: Into<String>, A: Into<String>>(key: K, action: A) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Content rendered for each screen variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewContent {
    Lock(LockView),
    Menu(MenuView),
    Records(RecordsView),
    ConfirmDelete(ConfirmDeleteView),
    AddRecord(AddRecordView),
    Generate(GenerateView),
    Clock(ClockView),
}

/// Lock screen. Only the number of captured symbols is shown, never the symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockView {
    pub prompt: String,
    pub entered: usize,
    pub required: usize,
    /// `HH:MM` from the clock, if it has been set.
    pub time: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuView {
    pub items: Vec<String>,
    pub selected: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSummary {
    pub site: String,
    pub username: String,
    /// Decrypted secret, present only while the user has asked to reveal it.
    pub secret: Option<String>,
}

/// Record browser. `current` is `None` for an empty vault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordsView {
    pub current: Option<RecordSummary>,
    pub position: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmDeleteView {
    pub site: String,
    pub entered: usize,
    pub required: usize,
    pub attempts_left: u8,
}

/// Add-record form. The secret field is masked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddRecordView {
    pub field: String,
    pub value: String,
    pub charset: String,
    pub cursor: char,
    pub max_len: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateView {
    pub password: Option<String>,
    pub complexity: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockView {
    pub time: String,
}
