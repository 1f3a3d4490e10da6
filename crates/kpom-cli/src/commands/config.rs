use crate::errors::CliError;
use clap::Subcommand;
use colored::Colorize;
use kpom_config::Settings;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the current settings and the plugin they resolve to
    Show,
    /// Set a setting (plugin-version, log-filter)
    Set { key: String, value: String },
    /// Print the settings file path
    Path,
}

pub fn handle_config(action: Option<ConfigAction>, settings: &Settings) -> Result<(), CliError> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold().green());
            if settings.is_empty() {
                println!("  {}", "(empty)".yellow());
            } else {
                for (key, value) in settings.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
            println!(
                "{} {}",
                "Plugin:".bold().green(),
                settings.plugin_spec().coordinates()
            );
        }
        ConfigAction::Set { key, value } => {
            let mut updated = settings.clone();
            updated.set(&key, value.clone())?;
            updated.save()?;
            println!("{} Set {} = {}", "✔".green(), key, value);
        }
        ConfigAction::Path => {
            println!("{}", Settings::path().display());
        }
    }
    Ok(())
}
