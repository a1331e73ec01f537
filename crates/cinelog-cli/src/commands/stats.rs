use crate::context::AppContext;
use crate::output::Output;
use chrono::Local;
use cinelog_core::{monthly_goal, summarize};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;

const BAR_WIDTH: usize = 20;

/// Text progress bar, full once the goal is reached
fn progress_bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn run_stats(ctx: &AppContext, output: &Output) -> Result<()> {
    let movies = ctx.store.all();
    let summary = summarize(&movies);
    let goal = monthly_goal(&movies, ctx.config.goals.monthly_target, &Local::now());

    if !output.wants_tables() {
        output.stats(&summary, &goal);
        return Ok(());
    }

    println!("\n{}", "Watchlist".bright_cyan().bold());
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Watched").add_attribute(Attribute::Bold),
        Cell::new("Pending").add_attribute(Attribute::Bold),
        Cell::new("Favorites").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(summary.watched).fg(Color::Green),
        Cell::new(summary.pending).fg(Color::Red),
        Cell::new(summary.favorites).fg(Color::Yellow),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);

    println!("\n{}", "Monthly Goal".bright_cyan().bold());
    println!(
        "{} {}/{} ({}%)",
        progress_bar(goal.percentage),
        goal.current,
        goal.target,
        goal.percentage
    );
    if goal.current >= goal.target as usize {
        println!("{}", "Goal reached this month".green());
    }
    Ok(())
}
