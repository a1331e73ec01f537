use crate::context::AppContext;
use crate::output::Output;
use cinelog_core::{KvError, Palette};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};

fn mode_name(dark: bool) -> &'static str {
    if dark {
        "dark"
    } else {
        "light"
    }
}

pub async fn run_theme(ctx: &AppContext, toggle: bool, dark: bool, light: bool, output: &Output) -> Result<()> {
    let save_error = |e: KvError| color_eyre::eyre::eyre!("Failed to save theme preference: {}", e);

    let is_dark = if toggle {
        ctx.preferences.toggle_dark_mode().await.map_err(save_error)?
    } else if dark || light {
        ctx.preferences.set_dark_mode(dark).await.map_err(save_error)?;
        dark
    } else {
        ctx.preferences
            .is_dark_mode()
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load theme preference: {}", e))?
    };

    if toggle || dark || light {
        output.success(format!("Switched to {} mode", mode_name(is_dark)));
    }

    let palette = Palette::for_mode(is_dark);
    if !output.wants_tables() {
        output.theme(mode_name(is_dark), &palette);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(format!("{} palette", mode_name(is_dark))).add_attribute(Attribute::Bold),
        Cell::new("Color").add_attribute(Attribute::Bold),
    ]);
    for (name, hex) in palette.entries() {
        table.add_row(vec![Cell::new(name), Cell::new(hex)]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);
    Ok(())
}
