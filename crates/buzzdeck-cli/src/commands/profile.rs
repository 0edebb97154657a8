//! The `buzzdeck profile` command family.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use buzzdeck_providers::load_config_from;

use crate::commands::open_store;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the local profile
    Show,

    /// Update the local profile
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}

pub fn execute(
    action: ProfileAction,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config, data_dir);

    match action {
        ProfileAction::Show => {
            let profile = store.profile()?;
            println!(
                "Name:  {}",
                if profile.name.is_empty() { "(unset)" } else { &profile.name }
            );
            println!(
                "Email: {}",
                if profile.email.is_empty() { "(unset)" } else { &profile.email }
            );
        }
        ProfileAction::Set { name, email } => {
            let mut profile = store.profile()?;
            if let Some(name) = name {
                profile.name = name;
            }
            if let Some(email) = email {
                profile.email = email;
            }
            store.set_profile(&profile)?;
            println!("Profile updated.");
        }
    }

    Ok(())
}
