use crate::cli::parser::ConfigCommands;
use crate::config::ConfigFile;
use crate::errors::{AppError, AppResult};
use crate::ui::messages;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &ConfigCommands, file: &mut ConfigFile) -> AppResult<()> {
    match cmd {
        ConfigCommands::Set {
            parents,
            key,
            value,
        } => {
            file.set(parents, key, value)?;
            let path: Vec<&str> = parents
                .iter()
                .map(String::as_str)
                .chain([key.as_str()])
                .collect();
            messages::success(format!("{} = {value}", path.join(".")));
        }
        ConfigCommands::Print => {
            print!("{}", file.to_yaml()?);
        }
        ConfigCommands::Edit { editor } => edit(file, editor.as_deref())?,
    }
    Ok(())
}

fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn edit(file: &ConfigFile, requested: Option<&str>) -> AppResult<()> {
    if !file.path().exists() {
        file.save()?;
    }
    let path = file.path();
    let fallback = default_editor();
    let editor = requested.map(str::to_string).unwrap_or_else(|| fallback.clone());

    match Command::new(&editor).arg(path).status() {
        Ok(s) if s.success() => {
            messages::success(format!("Configuration file edited successfully using '{editor}'"));
            return Ok(());
        }
        _ => messages::warning(format!(
            "Editor '{editor}' not available, falling back to '{fallback}'"
        )),
    }

    match Command::new(&fallback).arg(path).status() {
        Ok(s) if s.success() => {
            messages::success(format!(
                "Configuration file edited successfully using fallback '{fallback}'"
            ));
            Ok(())
        }
        _ => Err(AppError::Config(format!(
            "Failed to edit configuration file using fallback '{fallback}'"
        ))),
    }
}
