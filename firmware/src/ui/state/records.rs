use alloc::string::String;
use log::{info, warn};

use super::{AccessStateMachine, UiEffect, UiScreen, widgets};
use crate::crypto::ReauthOutcome;
use crate::ui::{
    input::Button,
    render::{ConfirmDeleteView, RecordSummary, RecordsView},
};

impl AccessStateMachine {
    pub(super) fn handle_records(&mut self, button: Button) -> UiEffect {
        let total = self.records().len();
        let reveal = button == Button::Reset && !self.secret_revealed;
        self.secret_revealed = false;

        match button {
            Button::Left | Button::Set => self.go_home(),
            _ if total == 0 => UiEffect::None,
            Button::Up => {
                self.selected_record = widgets::wrap_previous(self.selected_record, total);
                UiEffect::None
            }
            Button::Down => {
                self.selected_record = widgets::wrap_next(self.selected_record, total);
                UiEffect::None
            }
            Button::Right => self.type_selected_secret(),
            Button::Reset => {
                self.secret_revealed = reveal;
                UiEffect::None
            }
            Button::Click => {
                self.confirm.clear();
                self.set_screen(UiScreen::ConfirmDelete);
                UiEffect::None
            }
        }
    }

    fn type_selected_secret(&mut self) -> UiEffect {
        let Some(record) = self
            .session
            .as_ref()
            .and_then(|session| session.records.get(self.selected_record))
        else {
            return UiEffect::None;
        };

        widgets::type_out(
            self.collaborators.auto_type.as_mut(),
            &mut self.status,
            &record.secret,
        )
    }

    pub(super) fn handle_confirm_delete(&mut self, button: Button) -> UiEffect {
        let Some(direction) = button.direction() else {
            if button == Button::Set {
                self.confirm.clear();
                self.set_screen(UiScreen::ViewRecords);
            }
            return UiEffect::None;
        };

        let Some(attempt) = self.confirm.push(direction, self.config.gesture_len()) else {
            return UiEffect::None;
        };
        if attempt.matches(&self.config.expected_gesture) {
            self.reauth.register_success();
            return self.delete_selected();
        }

        match self.reauth.register_failure() {
            ReauthOutcome::Retry { remaining } => UiEffect::ReauthFailed { remaining },
            ReauthOutcome::Lockout => {
                warn!("too many failed confirmations; locking");
                let effect = self.lock_device();
                if self.status.is_none() {
                    self.status = Some(String::from("Locked after failed confirmations"));
                }
                effect
            }
        }
    }

    fn delete_selected(&mut self) -> UiEffect {
        let index = self.selected_record;
        let Some(session) = self.session.as_mut() else {
            return UiEffect::None;
        };
        if index >= session.records.len() {
            self.set_screen(UiScreen::ViewRecords);
            return UiEffect::None;
        }

        session.records.remove(index);
        session.dirty = true;
        let remaining = session.records.len();
        if self.selected_record >= remaining {
            self.selected_record = remaining.saturating_sub(1);
        }
        info!("record {index} deleted");

        let outcome = self.persist();
        self.set_screen(UiScreen::ViewRecords);
        UiEffect::RecordDeleted(outcome)
    }

    pub(super) fn render_records(&self) -> RecordsView {
        let records = self.records();
        RecordsView {
            current: records.get(self.selected_record).map(|record| RecordSummary {
                site: record.site.clone(),
                username: record.username.clone(),
                secret: self
                    .secret_revealed
                    .then(|| String::from(record.secret.as_str())),
            }),
            position: self.selected_record,
            total: records.len(),
        }
    }

    pub(super) fn render_confirm_delete(&self) -> ConfirmDeleteView {
        ConfirmDeleteView {
            site: self
                .records()
                .get(self.selected_record)
                .map(|record| record.site.clone())
                .unwrap_or_default(),
            entered: self.confirm.entered(),
            required: self.config.gesture_len(),
            attempts_left: self.reauth.remaining(),
        }
    }
}
