use firmware::generator::CharsetGenerator;
use firmware::ui::PasswordGenerator;
use log::info;
use rand_core::OsRng;
use shared::error::SharedError;
use shared::vault::{FIELD_DELIMITER, Record, SecretString};

use crate::AddArgs;
use crate::commands::{self, Context, vault_error};

pub fn run(context: &mut Context<'_>, args: &AddArgs) -> Result<(), SharedError> {
    let gesture = context.gesture(&args.gesture.gesture)?;
    let record = Record {
        site: checked_field(context, "site", &args.site)?,
        username: checked_field(context, "username", &args.username)?,
        secret: secret_for(args)?,
    };
    if record.secret.is_empty() {
        return Err(SharedError::Input(String::from("secret must not be empty")));
    }

    let mut store = context.open_store()?;
    let mut records = commands::unlock(&mut store, &gesture)?.records;
    records.push(record);
    store
        .save(&records, &gesture, &mut OsRng)
        .map_err(vault_error)?;
    info!("record appended; vault holds {} records", records.len());

    writeln!(
        context.out,
        "Added record for '{}' ({} records total).",
        args.site,
        records.len()
    )?;
    if args.generate.is_some() {
        writeln!(context.out, "Use `list --show-secrets` to read the generated secret.")?;
    }
    Ok(())
}

fn checked_field(context: &Context<'_>, name: &str, value: &str) -> Result<String, SharedError> {
    if value.is_empty() {
        return Err(SharedError::Input(format!("{name} must not be empty")));
    }
    if value.contains(FIELD_DELIMITER) {
        return Err(SharedError::Input(format!(
            "{name} must not contain '{FIELD_DELIMITER}'"
        )));
    }
    if value.trim() != value {
        return Err(SharedError::Input(format!(
            "{name} must not start or end with whitespace"
        )));
    }
    let limit = context.config.max_field_len;
    if value.chars().count() > limit {
        return Err(SharedError::Input(format!(
            "{name} is longer than {limit} characters"
        )));
    }
    Ok(value.to_owned())
}

fn secret_for(args: &AddArgs) -> Result<SecretString, SharedError> {
    match (&args.secret, args.generate) {
        (Some(secret), _) => Ok(SecretString::from(secret.as_str())),
        (None, Some(0)) => Err(SharedError::Input(String::from(
            "generated secret length must be at least 1",
        ))),
        (None, Some(length)) => {
            let mut generator = CharsetGenerator::new(OsRng);
            Ok(generator.generate(length, args.complexity.into()))
        }
        (None, None) => Err(SharedError::Input(String::from(
            "either --secret or --generate is required",
        ))),
    }
}
