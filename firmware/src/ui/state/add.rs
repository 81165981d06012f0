use alloc::string::String;
use log::info;
use shared::vault::{Record, SecretString};
use zeroize::Zeroizing;

use super::{AccessStateMachine, UiEffect, UiScreen, widgets};
use crate::generator::CHARACTER_SETS;
use crate::ui::{input::Button, render::AddRecordView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum DraftField {
    Site,
    Username,
    Secret,
}

impl DraftField {
    const fn label(self) -> &'static str {
        match self {
            DraftField::Site => "Site",
            DraftField::Username => "Username",
            DraftField::Secret => "Secret",
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            DraftField::Site => Some(DraftField::Username),
            DraftField::Username => Some(DraftField::Secret),
            DraftField::Secret => None,
        }
    }
}

/// Record being composed one character at a time.
pub(super) struct AddState {
    field: DraftField,
    site: Zeroizing<String>,
    username: Zeroizing<String>,
    secret: Zeroizing<String>,
    charset: usize,
    position: usize,
}

impl AddState {
    pub(super) fn new() -> Self {
        Self {
            field: DraftField::Site,
            site: Zeroizing::new(String::new()),
            username: Zeroizing::new(String::new()),
            secret: Zeroizing::new(String::new()),
            charset: 0,
            position: 0,
        }
    }

    fn value(&self) -> &str {
        match self.field {
            DraftField::Site => self.site.as_str(),
            DraftField::Username => self.username.as_str(),
            DraftField::Secret => self.secret.as_str(),
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self.field {
            DraftField::Site => &mut *self.site,
            DraftField::Username => &mut *self.username,
            DraftField::Secret => &mut *self.secret,
        }
    }

    fn alphabet(&self) -> &'static [u8] {
        CHARACTER_SETS[self.charset].1.as_bytes()
    }

    fn cursor(&self) -> char {
        char::from(self.alphabet()[self.position])
    }

    fn rotate(&mut self, forward: bool) {
        let len = self.alphabet().len();
        self.position = if forward {
            widgets::wrap_next(self.position, len)
        } else {
            widgets::wrap_previous(self.position, len)
        };
    }

    /// Switch character set, keeping the cursor index where the new set allows it.
    fn switch_charset(&mut self, forward: bool) {
        let sets = CHARACTER_SETS.len();
        self.charset = if forward {
            widgets::wrap_next(self.charset, sets)
        } else {
            widgets::wrap_previous(self.charset, sets)
        };
        self.position = self.position.min(self.alphabet().len() - 1);
    }

    /// Move to the next field. Returns `false` once the secret field is finished.
    fn advance(&mut self) -> bool {
        match self.field.next() {
            Some(next) => {
                self.field = next;
                true
            }
            None => false,
        }
    }

    fn into_record(self) -> Record {
        Record {
            site: String::from(self.site.as_str()),
            username: String::from(self.username.as_str()),
            secret: SecretString::from(self.secret.as_str()),
        }
    }
}

impl AccessStateMachine {
    pub(super) fn handle_add(&mut self, button: Button) -> UiEffect {
        let max_len = self.config.max_field_len;
        let Some(draft) = self.add.as_mut() else {
            return self.go_home();
        };

        let field_done = match button {
            Button::Set => {
                self.add = None;
                return self.go_home();
            }
            Button::Up => {
                draft.rotate(true);
                false
            }
            Button::Down => {
                draft.rotate(false);
                false
            }
            Button::Right => {
                draft.switch_charset(true);
                false
            }
            Button::Left => {
                draft.switch_charset(false);
                false
            }
            Button::Click => {
                let cursor = draft.cursor();
                let value = draft.value_mut();
                value.push(cursor);
                value.chars().count() >= max_len
            }
            Button::Reset => !draft.value().is_empty(),
        };

        if field_done && !draft.advance() {
            return self.commit_draft();
        }
        UiEffect::None
    }

    fn commit_draft(&mut self) -> UiEffect {
        let Some(draft) = self.add.take() else {
            return UiEffect::None;
        };
        let Some(session) = self.session.as_mut() else {
            return self.go_home();
        };

        session.records.push(draft.into_record());
        session.dirty = true;
        info!("record added ({} total)", session.records.len());

        let outcome = self.persist();
        self.set_screen(UiScreen::MainMenu);
        UiEffect::RecordAdded(outcome)
    }

    pub(super) fn render_add(&self) -> AddRecordView {
        let Some(draft) = self.add.as_ref() else {
            return AddRecordView {
                field: String::new(),
                value: String::new(),
                charset: String::new(),
                cursor: ' ',
                max_len: self.config.max_field_len,
            };
        };

        let value = match draft.field {
            DraftField::Secret => "*".repeat(draft.secret.chars().count()),
            _ => String::from(draft.value()),
        };
        AddRecordView {
            field: String::from(draft.field.label()),
            value,
            charset: String::from(CHARACTER_SETS[draft.charset].0),
            cursor: draft.cursor(),
            max_len: self.config.max_field_len,
        }
    }
}
