use alloc::{string::String, vec::Vec};
use log::info;

use super::{AccessStateMachine, UiEffect, UiScreen, add::AddState, widgets};
use crate::ui::{input::Button, render::MenuView};

/// Entries of the main menu, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    ViewRecords,
    AddRecord,
    GeneratePassword,
    Clock,
    LockDevice,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::ViewRecords,
        MenuItem::AddRecord,
        MenuItem::GeneratePassword,
        MenuItem::Clock,
        MenuItem::LockDevice,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            MenuItem::ViewRecords => "View Records",
            MenuItem::AddRecord => "Add Record",
            MenuItem::GeneratePassword => "Generate Password",
            MenuItem::Clock => "Clock",
            MenuItem::LockDevice => "Lock Device",
        }
    }
}

pub(super) struct MenuState {
    pub selected: usize,
    pub reset_presses: u8,
}

impl MenuState {
    pub(super) const fn new() -> Self {
        Self {
            selected: 0,
            reset_presses: 0,
        }
    }
}

impl AccessStateMachine {
    pub(super) fn handle_menu(&mut self, button: Button) -> UiEffect {
        let count = MenuItem::ALL.len();
        match button {
            Button::Up => {
                self.menu.selected = widgets::wrap_previous(self.menu.selected, count);
                UiEffect::None
            }
            Button::Down => {
                self.menu.selected = widgets::wrap_next(self.menu.selected, count);
                UiEffect::None
            }
            Button::Click | Button::Right => {
                self.select_menu_item(MenuItem::ALL[self.menu.selected])
            }
            Button::Reset => {
                self.menu.reset_presses = self.menu.reset_presses.saturating_add(1);
                if self.menu.reset_presses >= self.config.lock_press_count {
                    info!("lock requested from main menu");
                    self.lock_device()
                } else {
                    UiEffect::None
                }
            }
            Button::Left | Button::Set => UiEffect::None,
        }
    }

    fn select_menu_item(&mut self, item: MenuItem) -> UiEffect {
        match item {
            MenuItem::ViewRecords => {
                let total = self.records().len();
                if self.selected_record >= total {
                    self.selected_record = 0;
                }
                self.set_screen(UiScreen::ViewRecords);
            }
            MenuItem::AddRecord => {
                self.add = Some(AddState::new());
                self.set_screen(UiScreen::AddRecord);
            }
            MenuItem::GeneratePassword => {
                self.generate.clear();
                self.set_screen(UiScreen::GeneratePassword);
            }
            MenuItem::Clock => self.set_screen(UiScreen::Clock),
            MenuItem::LockDevice => return self.lock_device(),
        }
        UiEffect::None
    }

    pub(super) fn render_menu(&self) -> MenuView {
        MenuView {
            items: MenuItem::ALL
                .iter()
                .map(|item| String::from(item.label()))
                .collect::<Vec<_>>(),
            selected: self.menu.selected,
        }
    }
}
