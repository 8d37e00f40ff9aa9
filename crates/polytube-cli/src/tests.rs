use clap::Parser;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["polytube"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_discover_defaults() {
    let cli = Cli::try_parse_from(["polytube", "discover"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Discover { dry_run: false })
    ));
}

#[test]
fn parses_discover_dry_run() {
    let cli = Cli::try_parse_from(["polytube", "discover", "--dry-run"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Discover { dry_run: true })));
}

#[test]
fn parses_extract_with_videos_path() {
    let cli = Cli::try_parse_from(["polytube", "extract", "--videos", "Data/output_final_1.csv"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Extract { videos: Some(ref p) }) if p == &PathBuf::from("Data/output_final_1.csv")
    ));
}

#[test]
fn parses_extract_without_videos_path() {
    let cli = Cli::try_parse_from(["polytube", "extract"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Extract { videos: None })));
}

#[test]
fn parses_report_with_index() {
    let cli = Cli::try_parse_from(["polytube", "report", "--index", "runs/data_files.csv"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report { index: Some(ref p) }) if p == &PathBuf::from("runs/data_files.csv")
    ));
}

#[test]
fn parses_run() {
    let cli = Cli::try_parse_from(["polytube", "run"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Run)));
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["polytube", "collect"]).is_err());
}

#[test]
fn dry_run_flag_is_discover_only() {
    assert!(Cli::try_parse_from(["polytube", "report", "--dry-run"]).is_err());
}
