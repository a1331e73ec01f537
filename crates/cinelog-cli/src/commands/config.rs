use crate::output::Output;
use crate::ConfigCommands;
use cinelog_config::{Config, PathManager};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, paths: &PathManager, config: Config, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(paths, &config, output),
        ConfigCommands::Goal { target } => set_goal(paths, config, target, output),
    }
}

fn show_config(paths: &PathManager, config: &Config, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let storage_dir = config.storage_dir(paths.storage_dir());

    if !output.wants_tables() {
        output.settings(json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "storage_dir": storage_dir.display().to_string(),
            "monthly_target": config.goals.monthly_target,
            "log_level": config.logging.level,
            "log_file": config.logging.file.as_ref().map(|p| p.display().to_string()),
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.info(format!(
            "No config file at {}, showing defaults",
            config_file.display()
        ));
    }

    println!("\n{}", "Configuration".bright_cyan().bold());
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display().to_string())]);
    table.add_row(vec![Cell::new("Storage Directory"), Cell::new(storage_dir.display().to_string())]);
    table.add_row(vec![Cell::new("Monthly Goal"), Cell::new(config.goals.monthly_target)]);
    table.add_row(vec![Cell::new("Log Level"), Cell::new(&config.logging.level)]);
    table.add_row(vec![
        Cell::new("Log File"),
        Cell::new(
            config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "stderr".to_string()),
        ),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);
    Ok(())
}

fn set_goal(paths: &PathManager, mut config: Config, target: u32, output: &Output) -> Result<()> {
    config.goals.monthly_target = target;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let config_file = paths.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Monthly goal set to {} movie(s)", target));
    Ok(())
}
