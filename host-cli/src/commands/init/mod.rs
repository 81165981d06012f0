use firmware::crypto::SaltSource;
use shared::error::SharedError;

use crate::commands::Context;

pub fn run(context: &mut Context<'_>) -> Result<(), SharedError> {
    let store = context.open_store()?;
    let salt_path = context.backend.salt_path();

    let action = match store.salt_source() {
        SaltSource::Loaded => "Using existing salt",
        SaltSource::Generated => "Created salt",
        SaltSource::Replaced => "Replaced malformed salt",
    };
    writeln!(context.out, "{action} at '{}'.", salt_path.display())?;

    let lines = store.load_encrypted().len();
    writeln!(
        context.out,
        "Vault '{}' holds {lines} encrypted lines.",
        context.backend.vault_path().display()
    )?;
    if store.salt_source() == SaltSource::Replaced && lines > 0 {
        writeln!(
            context.out,
            "Existing records were encrypted under the old salt and will not decrypt."
        )?;
    }
    Ok(())
}
