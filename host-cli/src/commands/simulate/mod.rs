use std::fs;
use std::io::{self, Read};

use firmware::generator::CharsetGenerator;
use firmware::ui::{ButtonLevels, Collaborators, UiEffect};
use firmware::{AccessStateMachine, Device};
use log::debug;
use rand_core::OsRng;
use shared::error::SharedError;

use crate::SimulateArgs;
use crate::commands::{Context, vault_error};
use crate::simulator::{
    CountingAutoType, SharedBuffer, SystemClock, TerminalDisplay, parse_script,
};

pub fn run(context: &mut Context<'_>, args: &SimulateArgs) -> Result<(), SharedError> {
    let script = read_script(args)?;
    let buttons = parse_script(&script)?;
    debug!("simulating {} button presses", buttons.len());

    let collaborators = Collaborators {
        auto_type: Box::new(CountingAutoType::new()),
        clock: Box::new(SystemClock),
        generator: Box::new(CharsetGenerator::new(OsRng)),
        rng: Box::new(OsRng),
    };
    let machine = AccessStateMachine::open(
        Box::new(context.backend.clone()),
        context.config.clone(),
        collaborators,
    )
    .map_err(vault_error)?;

    let screen = SharedBuffer::default();
    let polarity = context.config.polarity;
    let mut device = Device::new(
        machine,
        polarity,
        Box::new(TerminalDisplay::new(screen.clone())),
    );
    device.start();
    context.out.write_all(&screen.take())?;

    let idle = ButtonLevels::idle(polarity);
    for button in buttons {
        let effects = device.poll_once(&ButtonLevels::pressed(polarity, button));
        device.poll_once(&idle);

        writeln!(context.out, "[{button}]")?;
        for effect in effects.iter().filter(|effect| **effect != UiEffect::None) {
            writeln!(context.out, "  -> {}", describe(effect))?;
        }
        context.out.write_all(&screen.take())?;
    }

    let effect = device.lock();
    if effect != UiEffect::None {
        writeln!(context.out, "[end of script] -> {}", describe(&effect))?;
    }
    context.out.write_all(&screen.take())?;
    Ok(())
}

fn read_script(args: &SimulateArgs) -> Result<String, SharedError> {
    if args.script.as_os_str() == "-" {
        let mut script = String::new();
        io::stdin().read_to_string(&mut script)?;
        return Ok(script);
    }
    fs::read_to_string(&args.script).map_err(|err| {
        SharedError::Input(format!(
            "failed to read script '{}': {err}",
            args.script.display()
        ))
    })
}

fn describe(effect: &UiEffect) -> String {
    match effect {
        UiEffect::None => String::from("nothing"),
        UiEffect::Unlocked { records, skipped } => {
            format!("unlocked ({records} records, {skipped} skipped)")
        }
        UiEffect::GestureRejected => String::from("gesture rejected"),
        UiEffect::UnlockFailed(err) => format!("unlock failed: {err}"),
        UiEffect::Locked(outcome) => format!("locked ({outcome:?})"),
        UiEffect::RecordAdded(outcome) => format!("record added ({outcome:?})"),
        UiEffect::RecordDeleted(outcome) => format!("record deleted ({outcome:?})"),
        UiEffect::ReauthFailed { remaining } => {
            format!("confirmation failed ({remaining} attempts left)")
        }
        UiEffect::Typed => String::from("secret typed"),
        UiEffect::TypeFailed(err) => format!("auto-type failed: {err}"),
        UiEffect::Generated => String::from("password generated"),
    }
}
