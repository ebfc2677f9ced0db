//! Run log viewer - Entry Point

use clap::Parser;
use runlog::config::{self, CliOverrides, VALID_THEMES};
use runlog::host::LogHost;
use runlog::model::{AppError, EntryId};
use runlog::state::{ActiveIndex, LogState, ViewSettings};
use runlog::treebuild::BuildOptions;
use runlog::view::{self, ColorConfig, LogStyles, ViewSnapshot};
use runlog::view_state::types::{LineOffset, ViewportDimensions};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

/// Run log viewer - renders a streamed run log as a filterable tree
#[derive(Parser, Debug)]
#[command(name = "runlog")]
#[command(version)]
#[command(about = "Render a run log as a filterable, collapsible tree")]
pub struct Args {
    /// Path to the run log (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Only show entries whose payload contains this text (plus their ancestors)
    #[arg(short = 's', long)]
    pub filter: Option<String>,

    /// Expand every entry that has children
    #[arg(long)]
    pub expand_all: bool,

    /// Toggle the expanded state of an entry (repeatable)
    #[arg(long = "toggle", value_name = "ID")]
    pub toggle: Vec<String>,

    /// Selection for the details pane: a row number, `info`, `terminal` or `none`
    #[arg(long)]
    pub active: Option<ActiveIndex>,

    /// Line offset of the first line shown
    #[arg(long, default_value_t = 0)]
    pub scroll: usize,

    /// Viewport width in columns
    #[arg(long, value_parser = clap::value_parser!(u16).range(10..))]
    pub width: Option<u16>,

    /// Viewport height in lines
    #[arg(long, value_parser = clap::value_parser!(u16).range(3..))]
    pub height: Option<u16>,

    /// Print the visible rows as JSON instead of drawing them
    #[arg(long)]
    pub json: bool,

    /// Color theme
    #[arg(long, value_parser = VALID_THEMES.to_vec())]
    pub theme: Option<String>,

    /// Lines decoded per batch
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub batch_lines: Option<usize>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write diagnostics to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            theme: self.theme.clone(),
            batch_lines: self.batch_lines,
            viewport_width: self.width,
            viewport_height: self.height,
            log_file_path: self.log_file.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "runlog failed");
            eprintln!("runlog: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = config::load_config_with_precedence(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(with_env, args.overrides())
    };

    runlog::logging::init(&config.log_file_path, args.verbose)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let mut source = runlog::source::detect_input_source(args.file.clone())?;
    let mut host = LogHost::with_options(BuildOptions {
        expand_tasks: config.expand_tasks,
        expand_failures: config.expand_failures,
    });
    let subscription = host.register();
    let mut state = LogState::new();
    state.set_view_settings(ViewSettings {
        theme: config.theme.clone(),
    });

    while !source.is_complete() {
        let batch = source.next_batch(config.batch_lines)?;
        if batch.is_empty() {
            continue;
        }
        let summary = host.feed_lines(&batch);
        let events = subscription.dispatch(&mut state);
        debug!(
            lines = batch.len(),
            decoded = summary.decoded,
            skipped = summary.skipped,
            events,
            "batch applied"
        );
    }
    info!(entries = state.entries().len(), "input complete");

    if args.expand_all {
        state.expand_all();
    }
    for raw in &args.toggle {
        match EntryId::new(raw.as_str()) {
            Ok(id) => state.toggle_entry(&id),
            Err(e) => tracing::warn!(id = %raw, error = %e, "ignoring invalid --toggle id"),
        }
    }
    if let Some(filter) = &args.filter {
        state.set_filter(filter.as_str());
    }
    if let Some(active) = args.active {
        state.set_active_index(active);
    }

    let mut stdout = std::io::stdout().lock();
    if args.json {
        let snapshot = ViewSnapshot::capture(&state);
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(stdout, "{json}")?;
    } else {
        let styles = LogStyles::for_theme(
            &state.view_settings().theme,
            ColorConfig::from_env_and_args(args.no_color),
        );
        let viewport = ViewportDimensions::new(config.viewport_width, config.viewport_height);
        let buf = view::render_log(&mut state, viewport, LineOffset::new(args.scroll), &styles);
        writeln!(stdout, "{}", view::buffer_to_string(&buf))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["runlog", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["runlog", "--version"]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["runlog"]);
        assert_eq!(args.file, None);
        assert_eq!(args.filter, None);
        assert!(!args.expand_all);
        assert!(args.toggle.is_empty());
        assert_eq!(args.active, None);
        assert_eq!(args.scroll, 0);
        assert!(!args.json);
        assert_eq!(args.theme, None);
        assert!(!args.verbose);
        assert!(!args.no_color);
    }

    #[test]
    fn test_file_path_populates_file_field() {
        let args = Args::parse_from(["runlog", "run.log"]);
        assert_eq!(args.file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_filter_short_and_long() {
        let args = Args::parse_from(["runlog", "-s", "timeout"]);
        assert_eq!(args.filter.as_deref(), Some("timeout"));
        let args = Args::parse_from(["runlog", "--filter", "login"]);
        assert_eq!(args.filter.as_deref(), Some("login"));
    }

    #[test]
    fn test_active_accepts_rows_and_panels() {
        let args = Args::parse_from(["runlog", "--active", "3"]);
        assert_eq!(args.active, Some(ActiveIndex::Entry(3)));
        let args = Args::parse_from(["runlog", "--active", "info"]);
        assert_eq!(args.active, Some(ActiveIndex::Information));
        assert!(Args::try_parse_from(["runlog", "--active", "nope"]).is_err());
    }

    #[test]
    fn test_toggle_is_repeatable() {
        let args = Args::parse_from(["runlog", "--toggle", "0", "--toggle", "0-1"]);
        assert_eq!(args.toggle, vec!["0".to_string(), "0-1".to_string()]);
    }

    #[test]
    fn test_theme_is_validated() {
        let args = Args::parse_from(["runlog", "--theme", "light"]);
        assert_eq!(args.theme.as_deref(), Some("light"));
        let err = Args::try_parse_from(["runlog", "--theme", "neon"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_viewport_rejects_tiny_sizes() {
        assert!(Args::try_parse_from(["runlog", "--height", "1"]).is_err());
        assert!(Args::try_parse_from(["runlog", "--width", "2"]).is_err());
        let args = Args::parse_from(["runlog", "--width", "120", "--height", "50"]);
        assert_eq!((args.width, args.height), (Some(120), Some(50)));
    }

    #[test]
    fn test_overrides_carry_cli_values() {
        let args = Args::parse_from(["runlog", "--batch-lines", "10", "--log-file", "/tmp/x.log"]);
        let overrides = args.overrides();
        assert_eq!(overrides.batch_lines, Some(10));
        assert_eq!(overrides.log_file_path, Some(PathBuf::from("/tmp/x.log")));
        assert_eq!(overrides.theme, None);
    }
}
