use cinelog_core::{MonthlyGoal, Palette, WatchlistSummary};
use cinelog_models::Movie;
use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

/// Where command results go: colored lines and tables for people, one JSON
/// document per event otherwise
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// True when the caller should print its own table or detail view
    pub fn wants_tables(&self) -> bool {
        self.format == OutputFormat::Human && !self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message(Level::Success, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message(Level::Info, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message(Level::Warning, msg.as_ref());
    }

    /// Shown even in quiet mode
    pub fn error(&self, msg: impl AsRef<str>) {
        self.message(Level::Error, msg.as_ref());
    }

    fn message(&self, level: Level, msg: &str) {
        if self.quiet && level != Level::Error {
            return;
        }

        match (self.format, level) {
            (OutputFormat::Human, Level::Success) => println!("{} {}", "✓".green(), msg),
            (OutputFormat::Human, Level::Info) => println!("{}", msg),
            (OutputFormat::Human, Level::Warning) => println!("{} {}", "⚠".yellow(), msg),
            (OutputFormat::Human, Level::Error) => eprintln!("{} {}", "✗".red(), msg),
            _ => self.emit(&json!({ "type": level.tag(), "message": msg })),
        }
    }

    pub fn movies(&self, heading: &str, movies: &[&Movie]) {
        self.document(json!({ "type": "movies", "heading": heading, "movies": movies }));
    }

    pub fn movie(&self, movie: &Movie) {
        self.document(json!({ "type": "movie", "movie": movie }));
    }

    pub fn stats(&self, summary: &WatchlistSummary, goal: &MonthlyGoal) {
        self.document(json!({ "type": "stats", "summary": summary, "monthly_goal": goal }));
    }

    pub fn theme(&self, mode: &str, palette: &Palette) {
        let colors: serde_json::Map<String, Value> = palette
            .entries()
            .iter()
            .map(|(name, hex)| (name.to_string(), json!(hex)))
            .collect();
        self.document(json!({ "type": "theme", "mode": mode, "palette": colors }));
    }

    /// A settings dump for `config show`
    pub fn settings(&self, settings: Value) {
        self.document(json!({ "type": "config", "settings": settings }));
    }

    /// Structured results only exist in the JSON formats
    fn document(&self, value: Value) {
        if self.quiet || self.format == OutputFormat::Human {
            return;
        }
        self.emit(&value);
    }

    fn emit(&self, value: &Value) {
        println!("{}", self.render(value));
    }

    fn render(&self, value: &Value) -> String {
        let rendered = match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(value),
            OutputFormat::Json | OutputFormat::Human => serde_json::to_string(value),
        };
        rendered.unwrap_or_default()
    }
}
