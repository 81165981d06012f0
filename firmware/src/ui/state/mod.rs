use alloc::{boxed::Box, format, string::String, vec::Vec};
use log::{info, warn};
use rand_core::CryptoRngCore;
use shared::gesture::Gesture;
use shared::vault::Record;

use super::{
    AutoType, AutoTypeError, Clock, PasswordGenerator,
    input::Button,
    render::{Frame, ViewContent},
};
use crate::config::DeviceConfig;
use crate::crypto::ReauthGuard;
use crate::storage::{VaultBackend, VaultError, VaultStore};

use add::AddState;
use generate::GenerateState;
use lock::GestureEntry;
use menu::MenuState;

pub use menu::MenuItem;

mod add;
mod clock;
mod generate;
mod lock;
mod menu;
mod records;
mod widgets;

/// Screens of the device workflow. Everything except [`UiScreen::Lock`] requires an unlocked
/// session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiScreen {
    Lock,
    MainMenu,
    ViewRecords,
    ConfirmDelete,
    AddRecord,
    GeneratePassword,
    Clock,
}

/// Result of flushing the session to storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing changed since the last save.
    Clean,
    Saved,
    Failed(VaultError),
}

/// Side effect performed while handling a button press.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum UiEffect {
    #[default]
    None,
    Unlocked {
        records: usize,
        skipped: usize,
    },
    GestureRejected,
    UnlockFailed(VaultError),
    Locked(SaveOutcome),
    RecordAdded(SaveOutcome),
    RecordDeleted(SaveOutcome),
    ReauthFailed {
        remaining: u8,
    },
    Typed,
    TypeFailed(AutoTypeError),
    Generated,
}

/// Peripherals and entropy the state machine drives.
pub struct Collaborators {
    pub auto_type: Box<dyn AutoType>,
    pub clock: Box<dyn Clock>,
    pub generator: Box<dyn PasswordGenerator>,
    pub rng: Box<dyn CryptoRngCore>,
}

/// Plaintext state that exists only while unlocked.
struct Session {
    records: Vec<Record>,
    gesture: Gesture,
    dirty: bool,
}

/// Gesture-gated access to the vault.
///
/// The machine owns every piece of session state. Locking persists pending changes first and
/// then drops plaintext records, the session gesture and every partially entered buffer.
pub struct AccessStateMachine {
    screen: UiScreen,
    config: DeviceConfig,
    store: VaultStore,
    session: Option<Session>,
    lock: GestureEntry,
    menu: MenuState,
    selected_record: usize,
    secret_revealed: bool,
    confirm: GestureEntry,
    reauth: ReauthGuard,
    add: Option<AddState>,
    generate: GenerateState,
    status: Option<String>,
    collaborators: Collaborators,
}

impl AccessStateMachine {
    pub fn new(config: DeviceConfig, store: VaultStore, collaborators: Collaborators) -> Self {
        Self {
            screen: UiScreen::Lock,
            reauth: ReauthGuard::new(config.max_reauth_failures),
            config,
            store,
            session: None,
            lock: GestureEntry::new(),
            menu: MenuState::new(),
            selected_record: 0,
            secret_revealed: false,
            confirm: GestureEntry::new(),
            add: None,
            generate: GenerateState::new(),
            status: None,
            collaborators,
        }
    }

    /// Open the vault store on `backend` and start locked.
    pub fn open(
        backend: Box<dyn VaultBackend>,
        config: DeviceConfig,
        mut collaborators: Collaborators,
    ) -> Result<Self, VaultError> {
        let store = VaultStore::open(backend, &config, collaborators.rng.as_mut())?;
        Ok(Self::new(config, store, collaborators))
    }

    pub fn screen(&self) -> UiScreen {
        self.screen
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    /// Decrypted records of the current session; empty while locked.
    pub fn records(&self) -> &[Record] {
        self.session
            .as_ref()
            .map(|session| session.records.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.dirty)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Feed one logical button press through the transition table.
    pub fn handle(&mut self, button: Button) -> UiEffect {
        if self.screen != UiScreen::Lock {
            self.status = None;
        }
        if !(self.screen == UiScreen::MainMenu && button == Button::Reset) {
            self.menu.reset_presses = 0;
        }

        match self.screen {
            UiScreen::Lock => self.handle_lock(button),
            UiScreen::MainMenu => self.handle_menu(button),
            UiScreen::ViewRecords => self.handle_records(button),
            UiScreen::ConfirmDelete => self.handle_confirm_delete(button),
            UiScreen::AddRecord => self.handle_add(button),
            UiScreen::GeneratePassword => self.handle_generate(button),
            UiScreen::Clock => self.handle_clock(button),
        }
    }

    /// Lock from any screen, saving pending changes first.
    pub fn lock(&mut self) -> UiEffect {
        if self.session.is_none() {
            self.lock.clear();
            return UiEffect::None;
        }
        self.lock_device()
    }

    /// Render the current frame.
    pub fn render(&self) -> Frame {
        let content = match self.screen {
            UiScreen::Lock => ViewContent::Lock(self.render_lock()),
            UiScreen::MainMenu => ViewContent::Menu(self.render_menu()),
            UiScreen::ViewRecords => ViewContent::Records(self.render_records()),
            UiScreen::ConfirmDelete => ViewContent::ConfirmDelete(self.render_confirm_delete()),
            UiScreen::AddRecord => ViewContent::AddRecord(self.render_add()),
            UiScreen::GeneratePassword => ViewContent::Generate(self.render_generate()),
            UiScreen::Clock => ViewContent::Clock(self.render_clock()),
        };

        Frame {
            content,
            hint_bar: self.hint_bar(),
            status: self.status.clone(),
        }
    }

    fn set_screen(&mut self, screen: UiScreen) {
        self.screen = screen;
    }

    fn go_home(&mut self) -> UiEffect {
        self.set_screen(UiScreen::MainMenu);
        UiEffect::None
    }

    fn start_session(&mut self, gesture: Gesture) -> UiEffect {
        let (records, skipped) = match self.store.unlock(&gesture) {
            Ok(unlocked) => (unlocked.records, unlocked.skipped.len()),
            Err(VaultError::NothingDecryptable { skipped }) => {
                warn!("no record decrypted; entering with an empty vault");
                (Vec::new(), skipped.len())
            }
            Err(err) => {
                warn!("unlock failed: {err}");
                self.status = Some(format!("Unlock failed: {err}"));
                return UiEffect::UnlockFailed(err);
            }
        };

        self.status = (skipped > 0).then(|| format!("{skipped} unreadable records kept"));
        let count = records.len();
        self.session = Some(Session {
            records,
            gesture,
            dirty: false,
        });
        self.menu = MenuState::new();
        self.selected_record = 0;
        self.set_screen(UiScreen::MainMenu);

        UiEffect::Unlocked {
            records: count,
            skipped,
        }
    }

    /// Save when dirty, then wipe all session state and return to the lock screen.
    fn lock_device(&mut self) -> UiEffect {
        let outcome = self.flush();

        self.session = None;
        self.lock.clear();
        self.confirm.clear();
        self.reauth.reset();
        self.add = None;
        self.generate.clear();
        self.menu = MenuState::new();
        self.selected_record = 0;
        self.secret_revealed = false;
        self.store.forget_session();
        self.set_screen(UiScreen::Lock);
        info!("device locked");

        UiEffect::Locked(outcome)
    }

    fn flush(&mut self) -> SaveOutcome {
        if self.has_unsaved_changes() {
            self.persist()
        } else {
            SaveOutcome::Clean
        }
    }

    fn persist(&mut self) -> SaveOutcome {
        let Some(session) = self.session.as_mut() else {
            return SaveOutcome::Clean;
        };

        match self.store.save(
            &session.records,
            &session.gesture,
            self.collaborators.rng.as_mut(),
        ) {
            Ok(()) => {
                session.dirty = false;
                SaveOutcome::Saved
            }
            Err(err) => {
                warn!("save failed: {err}");
                self.status = Some(format!("Save failed: {err}"));
                SaveOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::{self, Harness};
    use super::*;
    use crate::storage::MemoryBackend;

    #[test]
    fn starts_locked_with_empty_gesture_prompt() {
        let harness = Harness::new(MemoryBackend::new());

        assert_eq!(harness.machine.screen(), UiScreen::Lock);
        assert!(!harness.machine.is_unlocked());
        match harness.machine.render().content {
            ViewContent::Lock(view) => {
                assert_eq!(view.entered, 0);
                assert_eq!(view.required, 5);
            }
            other => panic!("expected lock view, got {other:?}"),
        }
    }

    #[test]
    fn lock_clears_plaintext_and_buffers() {
        let mut harness = Harness::new(MemoryBackend::new());
        harness.unlock();
        harness.machine.handle(Button::Down);
        harness.machine.handle(Button::Click);
        harness.press(&[Button::Click, Button::Click]);

        assert_eq!(harness.machine.screen(), UiScreen::AddRecord);
        assert_eq!(harness.machine.lock(), UiEffect::Locked(SaveOutcome::Clean));

        assert_eq!(harness.machine.screen(), UiScreen::Lock);
        assert!(harness.machine.records().is_empty());
        assert!(harness.machine.add.is_none());
        assert!(harness.machine.session.is_none());
    }

    #[test]
    fn lock_saves_dirty_session_before_clearing() {
        let backend = MemoryBackend::new();
        let mut harness = Harness::new(backend.clone());
        harness.unlock();
        if let Some(session) = harness.machine.session.as_mut() {
            session.records.push(Record::new("a.io", "ann", "pw"));
            session.dirty = true;
        }

        assert_eq!(harness.machine.lock(), UiEffect::Locked(SaveOutcome::Saved));
        assert_eq!(backend.vault_writes(), 1);

        harness.unlock();
        assert_eq!(harness.machine.records(), &[Record::new("a.io", "ann", "pw")]);
    }

    #[test]
    fn failed_save_on_lock_is_shown_on_lock_screen() {
        let backend = MemoryBackend::new();
        let mut harness = Harness::new(backend.clone());
        harness.unlock();
        if let Some(session) = harness.machine.session.as_mut() {
            session.records.push(Record::new("a.io", "ann", "pw"));
            session.dirty = true;
        }
        backend.fail_writes(true);

        let effect = harness.machine.lock();
        assert!(matches!(effect, UiEffect::Locked(SaveOutcome::Failed(_))));
        assert_eq!(harness.machine.screen(), UiScreen::Lock);
        assert!(harness.machine.records().is_empty());

        let frame = harness.machine.render();
        assert!(frame.status.unwrap().starts_with("Save failed"));

        harness.machine.handle(Button::Up);
        assert!(harness.machine.status().is_some());
    }

    #[test]
    fn unreadable_vault_still_unlocks_into_empty_session() {
        let backend = MemoryBackend::new().with_vault(b"x.io,xavier,00ff00ff\n");
        let mut harness = Harness::new(backend);

        let effect = fixtures::enter_gesture(&mut harness.machine, fixtures::GESTURE);
        assert_eq!(
            effect,
            UiEffect::Unlocked {
                records: 0,
                skipped: 1
            }
        );
        assert_eq!(harness.machine.screen(), UiScreen::MainMenu);
        assert!(harness.machine.status().is_some());
    }
}
