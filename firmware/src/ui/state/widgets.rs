use alloc::{string::String, vec};
use log::warn;

use super::{AccessStateMachine, UiEffect, UiScreen};
use crate::ui::{
    AutoType,
    render::{HintBar, HintItem},
};

pub(super) const fn wrap_next(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + 1) % len }
}

pub(super) const fn wrap_previous(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index + len - 1) % len
    }
}

/// Send `text` to the keyboard host. An unavailable host only produces a status notice.
pub(super) fn type_out(
    auto_type: &mut dyn AutoType,
    status: &mut Option<String>,
    text: &str,
) -> UiEffect {
    match auto_type.type_text(text) {
        Ok(()) => UiEffect::Typed,
        Err(err) => {
            warn!("auto-type failed: {err}");
            *status = Some(String::from("Auto-type unavailable"));
            UiEffect::TypeFailed(err)
        }
    }
}

impl AccessStateMachine {
    pub(super) fn hint_bar(&self) -> HintBar {
        let hints = match self.screen {
            UiScreen::Lock => vec![
                HintItem::new("Arrows/Click", "Gesture"),
                HintItem::new("Set", "Clear"),
            ],
            UiScreen::MainMenu => vec![
                HintItem::new("Up/Down", "Move"),
                HintItem::new("Click", "Select"),
                HintItem::new("Reset x3", "Lock"),
            ],
            UiScreen::ViewRecords if self.records().is_empty() => {
                vec![HintItem::new("Set", "Back")]
            }
            UiScreen::ViewRecords => vec![
                HintItem::new("Up/Down", "Browse"),
                HintItem::new("Right", "Type"),
                HintItem::new("Reset", "Show"),
                HintItem::new("Click", "Delete"),
                HintItem::new("Set", "Back"),
            ],
            UiScreen::ConfirmDelete => vec![
                HintItem::new("Gesture", "Confirm"),
                HintItem::new("Set", "Cancel"),
            ],
            UiScreen::AddRecord => vec![
                HintItem::new("Up/Down", "Char"),
                HintItem::new("Left/Right", "Charset"),
                HintItem::new("Click", "Add"),
                HintItem::new("Reset", "Next"),
            ],
            UiScreen::GeneratePassword => vec![
                HintItem::new("Click", "Medium"),
                HintItem::new("Up", "High"),
                HintItem::new("Right", "Type"),
                HintItem::new("Set", "Back"),
            ],
            UiScreen::Clock => vec![HintItem::new("Set", "Back")],
        };

        HintBar::new(hints)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Harness;
    use super::*;
    use crate::storage::MemoryBackend;
    use crate::ui::input::Button;

    #[test]
    fn wrapping_covers_both_ends() {
        assert_eq!(wrap_next(2, 3), 0);
        assert_eq!(wrap_previous(0, 3), 2);
        assert_eq!(wrap_next(0, 0), 0);
        assert_eq!(wrap_previous(0, 0), 0);
    }

    #[test]
    fn hint_bar_reflects_active_screen() {
        let mut harness = Harness::new(MemoryBackend::new());

        fn assert_hint(machine: &AccessStateMachine, expected: &str) {
            let frame = machine.render();
            assert!(
                frame
                    .hint_bar
                    .hints
                    .iter()
                    .any(|hint| hint.action.contains(expected)),
                "missing {expected} hint"
            );
        }

        assert_hint(&harness.machine, "Gesture");
        harness.unlock();
        assert_hint(&harness.machine, "Lock");
        harness.press(&[Button::Down, Button::Click]);
        assert_hint(&harness.machine, "Charset");
        harness.press(&[Button::Set, Button::Down, Button::Click]);
        assert_hint(&harness.machine, "High");
    }
}
