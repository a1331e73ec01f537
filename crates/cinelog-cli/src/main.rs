use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cinelog_core::{FavoriteSort, SortOption};
use commands::{clear, config, movies, stats, theme};

mod commands;
mod context;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinelog")]
#[command(about = "cinelog - Keep track of the movies you want to watch and the ones you loved")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Pending,
    Watched,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    DateAdded,
    Alphabetical,
    Year,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::DateAdded => SortOption::DateAdded,
            SortArg::Alphabetical => SortOption::Alphabetical,
            SortArg::Year => SortOption::Year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FavoriteSortArg {
    Rating,
    Title,
}

impl From<FavoriteSortArg> for FavoriteSort {
    fn from(arg: FavoriteSortArg) -> Self {
        match arg {
            FavoriteSortArg::Rating => FavoriteSort::Rating,
            FavoriteSortArg::Title => FavoriteSort::Title,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// View or change settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    #[command(flatten)]
    Library(LibraryCommands),
}

/// Commands that work on the movie collection
#[derive(Subcommand)]
enum LibraryCommands {
    /// List movies on the watchlist
    List {
        /// Which tab to show
        #[arg(long, value_enum, default_value = "pending")]
        status: StatusFilter,

        /// Sort order
        #[arg(long, value_enum, default_value = "date-added")]
        sort: SortArg,
    },
    /// Add a movie to the watchlist
    #[command(long_about = "Add a movie to the watchlist. Title, year and at least one genre are required. Known genres: Romance, Action, Comedy, Horror, Drama, Sci-Fi, Thriller, Fantasy, Mystery, Musical.")]
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        year: String,

        /// Genre (repeat for several)
        #[arg(long = "genre", required = true)]
        genres: Vec<String>,
    },
    /// Edit title, year or genres of a movie
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        year: Option<String>,

        /// Replace genres (repeat for several)
        #[arg(long = "genre")]
        genres: Vec<String>,
    },
    /// Toggle watched state
    Watched { id: String },
    /// Toggle favorite state
    Favorite { id: String },
    /// Rate and review a movie
    #[command(long_about = "Rate a movie from 0 to 10 and optionally attach a review. Omitting the rating keeps the current one, so a review can be edited on its own.")]
    Rate {
        id: String,

        /// Rating between 0 and 10
        rating: Option<String>,

        #[arg(long)]
        review: Option<String>,
    },
    /// Attach notes to a movie (empty text removes them)
    Note { id: String, text: String },
    /// Hide a movie from recent additions without deleting it
    Hide { id: String },
    /// Delete a movie permanently
    Delete { id: String },
    /// Show the most recent additions
    Recent,
    /// Search movies by title
    Search { query: String },
    /// Show favorite movies
    Favorites {
        #[arg(long, value_enum, default_value = "rating")]
        sort: FavoriteSortArg,
    },
    /// Show watchlist summary and monthly goal progress
    Stats,
    /// Show or change the display theme
    Theme {
        /// Switch between dark and light
        #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["dark", "light"])]
        toggle: bool,

        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "light")]
        dark: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        light: bool,
    },
    /// Remove every movie
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration and file locations
    Show,
    /// Set the monthly watched-movies goal
    Goal {
        /// Movies per month (greater than zero)
        target: u32,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = cinelog_config::PathManager::default();
    let app_config = context::load_config(&paths)?;

    logging::init_logging(cli.verbose, cli.quiet, &app_config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Config { cmd } => config::run_config(cmd, &paths, app_config, &output),
        Commands::Library(cmd) => {
            let ctx = context::AppContext::open(&paths, app_config).await?;
            run_library(cmd, &ctx, &output).await
        }
    }
}

async fn run_library(cmd: LibraryCommands, ctx: &context::AppContext, output: &output::Output) -> color_eyre::Result<()> {
    match cmd {
        LibraryCommands::List { status, sort } => movies::list(ctx, status, sort.into(), output),
        LibraryCommands::Add { title, year, genres } => movies::add(ctx, title, year, genres, output).await,
        LibraryCommands::Edit { id, title, year, genres } => movies::edit(ctx, &id, title, year, genres, output).await,
        LibraryCommands::Watched { id } => movies::toggle_watched(ctx, &id, output).await,
        LibraryCommands::Favorite { id } => movies::toggle_favorite(ctx, &id, output).await,
        LibraryCommands::Rate { id, rating, review } => movies::rate(ctx, &id, rating, review, output).await,
        LibraryCommands::Note { id, text } => movies::note(ctx, &id, text, output).await,
        LibraryCommands::Hide { id } => movies::hide(ctx, &id, output).await,
        LibraryCommands::Delete { id } => movies::delete(ctx, &id, output).await,
        LibraryCommands::Recent => movies::recent(ctx, output),
        LibraryCommands::Search { query } => movies::search(ctx, &query, output),
        LibraryCommands::Favorites { sort } => movies::favorites(ctx, sort.into(), output),
        LibraryCommands::Stats => stats::run_stats(ctx, output),
        LibraryCommands::Theme { toggle, dark, light } => theme::run_theme(ctx, toggle, dark, light, output).await,
        LibraryCommands::Clear { yes } => clear::run_clear(ctx, yes, output).await,
    }
}
