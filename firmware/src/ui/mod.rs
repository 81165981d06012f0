//! Firmware user interface runtime.
//!
//! The UI module owns the access state machine, maps button presses to screen transitions and
//! produces renderable frames. Peripherals are reached only through collaborator traits such as
//! [`DisplaySurface`] and [`AutoType`] so the code runs in tests without hardware.

mod data;
mod input;
mod render;
mod state;

pub use data::{
    AutoType, AutoTypeError, Clock, Complexity, DisplaySurface, PasswordGenerator, WallTime,
};
pub use input::{BUTTON_COUNT, Button, ButtonLevels, ButtonPoller, PinPolarity};
pub use render::{
    AddRecordView, ClockView, ConfirmDeleteView, Frame, GenerateView, HintBar, HintItem,
    LockView, MenuView, RecordSummary, RecordsView, ViewContent,
};
pub use state::{AccessStateMachine, Collaborators, MenuItem, SaveOutcome, UiEffect, UiScreen};
