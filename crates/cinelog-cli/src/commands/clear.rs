use super::prompts;
use crate::context::AppContext;
use crate::output::Output;
use color_eyre::Result;
use tracing::info;

pub async fn run_clear(ctx: &AppContext, yes: bool, output: &Output) -> Result<()> {
    let count = ctx.store.len();
    if count == 0 {
        output.info("The watchlist is already empty");
        return Ok(());
    }

    if !yes && !prompts::confirm(&format!("Delete all {} movie(s)? This cannot be undone", count))? {
        output.info("Nothing was deleted");
        return Ok(());
    }

    ctx.store
        .clear()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear movies in {}: {}", ctx.storage_dir.display(), e))?;
    info!("Cleared {} movies", count);
    output.success(format!("Removed {} movie(s)", count));
    Ok(())
}
