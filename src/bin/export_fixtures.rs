//! Write the built-in sample tables to disk so they can be edited and opened
//! with File → Open data folder.
//!
//! ```text
//! export-fixtures [DIR] [--format parquet|csv|json|all]
//! ```
//!
//! With `--format all`, each format goes to its own subdirectory of `DIR`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use rbi_dashboard::data::export::{Format, export_source};
use rbi_dashboard::data::source::FixtureSource;

#[derive(Parser, Debug)]
#[command(version, about = "Export the built-in sample tables", long_about = None)]
struct Cli {
    #[clap(default_value = "fixtures", help = "Output directory")]
    dir: PathBuf,
    #[clap(long, short, value_enum, default_value = "parquet", help = "File format to write")]
    format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Parquet,
    Csv,
    Json,
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<Format> {
        match self {
            FormatArg::Parquet => vec![Format::Parquet],
            FormatArg::Csv => vec![Format::Csv],
            FormatArg::Json => vec![Format::Json],
            FormatArg::All => Format::ALL.to_vec(),
        }
    }
}

/// One `(format, directory)` pair per export.
fn targets(cli: &Cli) -> Vec<(Format, PathBuf)> {
    let formats = cli.format.formats();
    let split = formats.len() > 1;
    formats
        .into_iter()
        .map(|f| {
            let dir = if split {
                cli.dir.join(f.extension())
            } else {
                cli.dir.clone()
            };
            (f, dir)
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    for (format, dir) in targets(&cli) {
        let written = export_source(&FixtureSource, &dir, format)?;
        log::info!("Wrote {} files to {}", written.len(), dir.display());
        for path in written {
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_parquet_in_fixtures() {
        let cli = Cli::try_parse_from(["export-fixtures"]).unwrap();
        assert_eq!(targets(&cli), vec![(Format::Parquet, PathBuf::from("fixtures"))]);
    }

    #[test]
    fn all_formats_get_their_own_directory() {
        let cli = Cli::try_parse_from(["export-fixtures", "out", "--format", "all"]).unwrap();
        let dirs: Vec<_> = targets(&cli).into_iter().map(|(_, d)| d).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("out/parquet"),
                PathBuf::from("out/csv"),
                PathBuf::from("out/json")
            ]
        );
    }

    #[test]
    fn help_is_not_taken_as_a_directory() {
        let err = Cli::try_parse_from(["export-fixtures", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_flags_and_formats_are_rejected() {
        assert!(Cli::try_parse_from(["export-fixtures", "--bogus"]).is_err());
        assert!(Cli::try_parse_from(["export-fixtures", "-f", "xlsx"]).is_err());
    }
}
