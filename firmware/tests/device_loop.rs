mod support;

use firmware::ui::{Button, ButtonLevels, PinPolarity, ViewContent};
use firmware::{Device, MemoryBackend, UiEffect, UiScreen};
use support::{GESTURE, RecordingDisplay};

fn device(polarity: PinPolarity) -> (Device, RecordingDisplay) {
    let display = RecordingDisplay::default();
    let machine = support::boot(&MemoryBackend::new(), 11);
    let mut device = Device::new(machine, polarity, Box::new(display.clone()));
    device.start();
    (device, display)
}

/// Press and release `button`, returning the effects of the press.
fn tap(device: &mut Device, button: Button) -> Vec<UiEffect> {
    let polarity = device.polarity();
    let effects = device.poll_once(&ButtonLevels::pressed(polarity, button));
    device.poll_once(&ButtonLevels::idle(polarity));
    effects
}

#[test]
fn start_shows_the_lock_screen_once() {
    let (_device, display) = device(PinPolarity::ActiveLow);

    let frames = display.frames.borrow();
    assert_eq!(frames.len(), 1);
    assert!(matches!(frames[0].content, ViewContent::Lock(_)));
}

#[test]
fn held_button_is_handled_once() {
    let (mut device, display) = device(PinPolarity::ActiveLow);
    let held = ButtonLevels::pressed(PinPolarity::ActiveLow, Button::Up);

    for _ in 0..5 {
        device.poll_once(&held);
    }
    device.poll_once(&ButtonLevels::idle(PinPolarity::ActiveLow));

    let frames = display.frames.borrow();
    assert_eq!(frames.len(), 2);
    match &frames[1].content {
        ViewContent::Lock(view) => assert_eq!(view.entered, 1),
        other => panic!("expected lock view, got {other:?}"),
    }
}

#[test]
fn unchanged_frames_are_not_redrawn() {
    let (mut device, display) = device(PinPolarity::ActiveLow);
    for _ in 0..10 {
        device.poll_once(&ButtonLevels::idle(PinPolarity::ActiveLow));
    }
    assert_eq!(display.frames.borrow().len(), 1);
}

#[test]
fn gesture_unlocks_through_the_pins() {
    let (mut device, display) = device(PinPolarity::ActiveHigh);

    let mut effects = Vec::new();
    for button in GESTURE.split(',').map(support::button_for) {
        effects.extend(tap(&mut device, button));
    }

    assert_eq!(
        effects.last(),
        Some(&UiEffect::Unlocked {
            records: 0,
            skipped: 0
        })
    );
    assert_eq!(device.machine().screen(), UiScreen::MainMenu);
    let frames = display.frames.borrow();
    assert!(matches!(
        frames.last().map(|frame| &frame.content),
        Some(ViewContent::Menu(_))
    ));
}

#[test]
fn simultaneous_presses_are_handled_in_button_order() {
    let (mut device, _display) = device(PinPolarity::ActiveLow);
    let mut levels = ButtonLevels::idle(PinPolarity::ActiveLow);
    levels.set(Button::Up, false);
    levels.set(Button::Down, false);

    let effects = device.poll_once(&levels);
    assert_eq!(effects.len(), 2);
}

#[test]
fn lock_from_the_loop_returns_to_the_lock_screen() {
    let (mut device, display) = device(PinPolarity::ActiveLow);
    for button in GESTURE.split(',').map(support::button_for) {
        tap(&mut device, button);
    }
    assert!(device.machine().is_unlocked());

    assert!(matches!(device.lock(), UiEffect::Locked(_)));
    assert!(!device.machine().is_unlocked());
    let frames = display.frames.borrow();
    assert!(matches!(
        frames.last().map(|frame| &frame.content),
        Some(ViewContent::Lock(_))
    ));
}
