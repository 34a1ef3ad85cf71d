//! Network settings handlers.

use dialoguer::{Input, Password};
use secrecy::ExposeSecret;
use serde::Serialize;

use remotedaq_core::Settings;

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::config::{self, Config, SettingsStore};
use crate::error::CliError;
use crate::output;

use super::util::{mask_secret, prompt_err};

/// Settings as shown to the user; the token is masked unless revealed.
#[derive(Serialize)]
struct SettingsView {
    path: String,
    auth_token: String,
    network_id: String,
    complete: bool,
}

impl SettingsView {
    fn new(store: &SettingsStore, settings: &Settings, reveal: bool) -> Self {
        let token = settings.auth_token.expose_secret();
        Self {
            path: store.path().display().to_string(),
            auth_token: if reveal {
                token.to_owned()
            } else {
                mask_secret(token)
            },
            network_id: settings.network_id.clone(),
            complete: settings.is_complete(),
        }
    }
}

fn detail(v: &SettingsView) -> String {
    let or_unset = |s: &str| {
        if s.is_empty() {
            "(unset)".to_owned()
        } else {
            s.to_owned()
        }
    };
    [
        format!("Settings:   {}", v.path),
        format!("Token:      {}", or_unset(&v.auth_token)),
        format!("Network ID: {}", or_unset(&v.network_id)),
    ]
    .join("\n")
}

fn saved(store: &SettingsStore, global: &GlobalOpts) {
    if !global.quiet {
        eprintln!("Settings saved to {}", store.path().display());
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: SettingsArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let store = config::settings_store(global, cfg);

    match args.command {
        SettingsCommand::Show { reveal } => {
            let view = SettingsView::new(&store, &store.load(), reveal);
            let out = output::render_single(&global.output, &view, detail, |v| {
                v.network_id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Set { token, network } => {
            if token.is_none() && network.is_none() {
                return Err(CliError::Validation {
                    field: "settings".into(),
                    reason: "pass --token and/or --network".into(),
                });
            }
            let current = store.load();
            let updated = Settings::new(
                token.unwrap_or_else(|| current.auth_token.expose_secret().to_owned()),
                network.unwrap_or(current.network_id),
            );
            store.save(&updated)?;
            saved(&store, global);
            Ok(())
        }

        SettingsCommand::Init => {
            let current = store.load();
            eprintln!("RemoteDAQ network settings");
            eprintln!("   Settings path: {}\n", store.path().display());

            let token = Password::new()
                .with_prompt("ZeroTier API token")
                .allow_empty_password(!current.auth_token.expose_secret().is_empty())
                .interact()
                .map_err(prompt_err)?;
            let token = if token.is_empty() {
                current.auth_token.expose_secret().to_owned()
            } else {
                token
            };

            let network: String = Input::new()
                .with_prompt("ZeroTier network ID")
                .with_initial_text(current.network_id.clone())
                .interact_text()
                .map_err(prompt_err)?;

            store.save(&Settings::new(token, network.trim()))?;
            saved(&store, global);
            Ok(())
        }

        SettingsCommand::Path => {
            println!("{}", store.path().display());
            Ok(())
        }
    }
}
