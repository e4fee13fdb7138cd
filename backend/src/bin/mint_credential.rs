//! Mint a user-registry entry with a freshly salted password hash.
//!
//! ```text
//! echo -n 'secret' | cargo run --bin mint-credential -- gm 'Game Master' admin
//! ```
//!
//! The password is read from stdin (or `--password`, which leaks into shell
//! history; prefer stdin). The printed JSON object can be appended to the
//! array in the registry file named by `USER_REGISTRY_FILE`.

use std::io::Read;

use clap::Parser;

use backend::domain::{CredentialHash, DisplayName, Role, Username};

#[derive(Parser)]
#[command(about = "Mint a user-registry entry with a salted password hash")]
struct Args {
    /// Registry lookup key, e.g. `gm`.
    username: String,
    /// Name presented to clients, e.g. `Game Master`.
    display_name: String,
    /// Authorization tag, e.g. `admin`.
    role: String,
    /// Password to hash; read from stdin when omitted.
    #[arg(long)]
    password: Option<String>,
}

fn read_password(args_password: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(password) = args_password {
        return Ok(password);
    }
    let mut password = String::new();
    std::io::stdin().read_to_string(&mut password)?;
    // Trailing newlines are almost always the shell's, not the password's.
    Ok(password.trim_end_matches(['\r', '\n']).to_owned())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let username = Username::new(args.username)?;
    let display_name = DisplayName::new(args.display_name)?;
    let role = Role::new(args.role)?;
    let password = read_password(args.password)?;
    let hash = CredentialHash::derive(&password)?;

    let entry = serde_json::json!({
        "username": username.as_ref(),
        "passwordHash": hash.as_str(),
        "displayName": display_name.as_ref(),
        "role": role.as_ref(),
    });
    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}
