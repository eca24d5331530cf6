use anyhow::{Context, Result};
use musicvault_core::{AccessGate, Config, Error, Session};
use std::io::{self, BufRead, Write};

pub fn login(config: &Config, code: Option<String>) -> Result<()> {
    let code = match code {
        Some(code) => code,
        None => {
            print!("Access code: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read access code")?;
            line
        }
    };

    let session = match AccessGate::new(config.access_code.as_str()).login(&code) {
        Ok(session) => session,
        Err(Error::AccessDenied) => anyhow::bail!("Incorrect access code"),
        Err(e) => return Err(e.into()),
    };
    session
        .save(&config.data_dir())
        .context("Failed to save session")?;

    println!("✓ Logged in");
    Ok(())
}

pub fn logout(config: &Config) -> Result<()> {
    if Session::clear(&config.data_dir())? {
        println!("✓ Logged out");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
