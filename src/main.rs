//! diffsync - Entry Point
//!
//! Runs one alignment pass over a scenario file and prints the report.

use clap::Parser;
use diffsync::engine::{DiffAlignmentEngine, DiffEditorHost};
use diffsync::model::{Side, Timestamp};
use diffsync::scenario::{Scenario, ScenarioHost, ScenarioReport};
use std::path::PathBuf;
use tracing::info;

/// Compute diff editor alignments and view zones for a scenario file
#[derive(Parser, Debug)]
#[command(name = "diffsync")]
#[command(version)]
#[command(about = "Align two diff editor views and report the resulting view zones")]
pub struct Args {
    /// Path to the scenario JSON file
    pub scenario: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Render one combined inline view instead of two side by side
    #[arg(long)]
    pub inline: bool,

    /// Draw single-line changes as decorations in inline mode
    #[arg(long)]
    pub true_inline: bool,

    /// Do not offer revert arrows next to deleted hunks
    #[arg(long)]
    pub no_revert_icon: bool,

    /// Scroll the original side to this offset after the pass
    #[arg(long, value_name = "PX", conflicts_with = "scroll_modified")]
    pub scroll_original: Option<f64>,

    /// Scroll the modified side to this offset after the pass
    #[arg(long, value_name = "PX")]
    pub scroll_modified: Option<f64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// The side to scroll and its target, if requested.
    fn scroll_request(&self) -> Option<(Side, f64)> {
        self.scroll_original
            .map(|px| (Side::Original, px))
            .or(self.scroll_modified.map(|px| (Side::Modified, px)))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = diffsync::config::load_config_with_precedence(args.config.clone())?;
        let merged = diffsync::config::merge_config(config_file);
        let with_env = diffsync::config::apply_env_overrides(merged);

        // Flags only override when set
        diffsync::config::apply_cli_overrides(
            with_env,
            args.inline.then_some(false),
            args.true_inline.then_some(true),
            args.no_revert_icon.then_some(false),
            args.log_file.clone(),
        )
    };

    diffsync::logging::init(diffsync::logging::LogTarget::from_optional_path(
        config.log_file_path.clone(),
    ))?;

    info!(
        config = ?config,
        scenario = %args.scenario.display(),
        "Configuration loaded and resolved"
    );

    let scenario = Scenario::load(&args.scenario)?;
    let mut host = ScenarioHost::from_scenario(&scenario);
    let mut engine = DiffAlignmentEngine::new(config.engine);
    engine.set_diff(scenario.diff);
    engine.flush(&mut host, Timestamp::default());

    if let Some((side, px)) = args.scroll_request() {
        host.view_mut(side).user_scroll_to(px);
        engine.on_scroll(&mut host, side);
    }

    let report = ScenarioReport::capture(&engine, &host);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["diffsync", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["diffsync", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_scenario_is_required() {
        let result = Args::try_parse_from(["diffsync"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["diffsync", "scenario.json"]);
        assert_eq!(args.scenario, PathBuf::from("scenario.json"));
        assert_eq!(args.config, None);
        assert!(!args.inline);
        assert!(!args.true_inline);
        assert!(!args.no_revert_icon);
        assert_eq!(args.scroll_request(), None);
        assert_eq!(args.log_file, None);
    }

    #[test]
    fn test_scroll_original() {
        let args = Args::parse_from(["diffsync", "s.json", "--scroll-original", "120"]);
        assert_eq!(args.scroll_request(), Some((Side::Original, 120.0)));
    }

    #[test]
    fn test_scroll_modified() {
        let args = Args::parse_from(["diffsync", "s.json", "--scroll-modified", "7.5"]);
        assert_eq!(args.scroll_request(), Some((Side::Modified, 7.5)));
    }

    #[test]
    fn test_scroll_sides_conflict() {
        let result = Args::try_parse_from([
            "diffsync",
            "s.json",
            "--scroll-original",
            "1",
            "--scroll-modified",
            "2",
        ]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from([
            "diffsync",
            "s.json",
            "--inline",
            "--true-inline",
            "--no-revert-icon",
            "--config",
            "/custom/config.toml",
            "--log-file",
            "/tmp/diffsync.log",
        ]);
        assert!(args.inline);
        assert!(args.true_inline);
        assert!(args.no_revert_icon);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/diffsync.log")));
    }

    #[test]
    fn test_inline_flag_flows_through_config_precedence_chain() {
        use diffsync::config::{apply_cli_overrides, merge_config, ConfigFile};

        let args = Args::parse_from(["diffsync", "s.json", "--inline"]);
        let merged = merge_config(Some(ConfigFile {
            render_side_by_side: Some(true),
            ..ConfigFile::default()
        }));

        let resolved = apply_cli_overrides(
            merged,
            args.inline.then_some(false),
            args.true_inline.then_some(true),
            args.no_revert_icon.then_some(false),
            None,
        );

        assert!(!resolved.engine.render_side_by_side);
        assert!(resolved.engine.render_margin_revert_icon);
    }
}
