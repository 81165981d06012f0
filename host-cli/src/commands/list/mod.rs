use shared::error::SharedError;

use crate::ListArgs;
use crate::commands::{self, Context};

pub fn run(context: &mut Context<'_>, args: &ListArgs) -> Result<(), SharedError> {
    let gesture = context.gesture(&args.gesture.gesture)?;
    let mut store = context.open_store()?;
    let unlocked = commands::unlock(&mut store, &gesture)?;

    if unlocked.records.is_empty() {
        writeln!(context.out, "Vault is empty.")?;
    }
    for (index, record) in unlocked.records.iter().enumerate() {
        if args.show_secrets {
            writeln!(
                context.out,
                "{:>3}  {}  {}  {}",
                index + 1,
                record.site,
                record.username,
                record.secret.as_str()
            )?;
        } else {
            writeln!(
                context.out,
                "{:>3}  {}  {}",
                index + 1,
                record.site,
                record.username
            )?;
        }
    }
    for skipped in &unlocked.skipped {
        writeln!(
            context.out,
            "line {} skipped: {}",
            skipped.number, skipped.reason
        )?;
    }
    Ok(())
}
