#![expect(clippy::print_stdout, clippy::print_stderr)]

use colored::Colorize as _;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use usamplex::config::{FileConfig, parse_encodings};
use usamplex::error::{ExtractError, Result};
use usamplex::pipeline::{self, ExtractionReport, ExtractionRequest};
use usamplex::progress::{DEFAULT_DELAY, ProgressGuard};
use usamplex::record::Record;

const BANNER: &str = r"
                                        _
  _   _ ___  __ _ _ __ ___  _ __  | | _____  __
 | | | / __|/ _` | '_ ` _ \| '_ \ | |/ _ \ \/ /
 | |_| \__ \ (_| | | | | | | |_) || |  __/>  <
  \__,_|___/\__,_|_| |_| |_| .__/ |_|\___/_/\_\
                           |_|
";

#[derive(Parser, Debug)]
#[command(
    name = "usamplex",
    version,
    about = "Select a number of unique lines randomly from a file (text or Excel) and save them to two new files."
)]
pub struct Cli {
    /// The input file to read from.
    #[arg(short = 'f', long, visible_alias = "input_file")]
    pub input_file: PathBuf,

    /// The number of unique lines to randomly select and extract.
    #[arg(short = 'n', long, visible_alias = "num_lines")]
    pub num_lines: NonZeroUsize,

    /// The file to save the extracted lines.
    #[arg(short = 'x', long, visible_alias = "output_file_selected")]
    pub output_file_selected: PathBuf,

    /// The file to save the remaining non extracted lines.
    #[arg(short = 'r', long, visible_alias = "output_file_remaining")]
    pub output_file_remaining: PathBuf,

    /// Exclude lines containing any of these keywords (case-insensitive).
    #[arg(
        short = 'e',
        long,
        visible_alias = "exclude_keywords",
        num_args = 0..,
        value_name = "KEYWORD"
    )]
    pub exclude_keywords: Vec<String>,

    /// Print selected and remaining lines to stdout.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable the ASCII banner display.
    #[arg(short = 'd', long)]
    pub disable_banner: bool,

    /// Seed the random generator for a reproducible selection.
    #[arg(long, env = "USAMPLEX_SEED")]
    pub seed: Option<u64>,

    /// Text encoding to try, in order (repeatable). Defaults to utf-8 then latin-1.
    #[arg(long = "encoding", value_name = "NAME")]
    pub encodings: Vec<String>,

    /// JSON file with default keywords, encodings and seed.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Build the pipeline request, folding in the config file if one was given.
    pub fn request(&self) -> Result<ExtractionRequest> {
        let request = ExtractionRequest::new(
            &self.input_file,
            self.num_lines,
            &self.output_file_selected,
            &self.output_file_remaining,
        )
        .with_keywords(self.exclude_keywords.clone())
        .with_encodings(parse_encodings(&self.encodings)?)
        .with_seed(self.seed);

        match &self.config {
            Some(path) => request.merge_file_config(&FileConfig::load(path)?),
            None => Ok(request),
        }
    }
}

pub fn print_banner(disable_banner: bool) {
    if !disable_banner {
        println!("{}", BANNER.cyan());
    }
}

fn print_records(records: &[Record]) {
    for record in records {
        println!("{}", format!("[~] {}", record.key().trim()).cyan());
    }
}

fn render_report(cli: &Cli, request: &ExtractionRequest, report: &ExtractionReport) {
    if cli.verbose {
        for path in [&report.selected_path, &report.remaining_path] {
            println!("{}", format!("[~] Successfully wrote to {}", path.display()).cyan());
        }
        if !request.exclude_keywords.is_empty() {
            println!(
                "{}\n",
                format!(
                    "[~] Excluded lines containing the keywords: {}",
                    request.exclude_keywords.join(", ")
                )
                .cyan()
            );
        }
        println!("\nSelected lines:");
        print_records(&report.selection.selected);
        println!("\nRemaining lines:");
        print_records(&report.selection.remaining);
        println!(
            "{}",
            format!(
                "[~] {} read, {} excluded, {} duplicates, {} selected, {} remaining",
                report.records_read,
                report.excluded,
                report.duplicates,
                report.selected_count(),
                report.remaining_count()
            )
            .cyan()
        );
    }

    println!(
        "{}",
        format!("[+] Selected lines saved to '{}'.", report.selected_path.display()).green()
    );
    println!(
        "{}",
        format!("[+] Remaining lines saved to '{}'.", report.remaining_path.display()).green()
    );
}

fn report_error(err: &ExtractError) {
    let message = match err {
        ExtractError::InsufficientRecords { unique, requested } => format!(
            "[-] The file does not contain enough unique lines after filtering ({unique} unique, {requested} requested)."
        ),
        other => format!("[-] Error: {other}"),
    };
    eprintln!("{}", message.red());
}

/// Run the command described by `cli` and map the outcome to an exit code.
pub fn run(cli: &Cli) -> ExitCode {
    print_banner(cli.disable_banner);

    let outcome = cli.request().and_then(|request| {
        let guard = ProgressGuard::start(DEFAULT_DELAY, "Processing...");
        let result = pipeline::run(&request);
        drop(guard);
        result.map(|report| (request, report))
    });

    match outcome {
        Ok((request, report)) => {
            render_report(cli, &request, &report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "usamplex", "-f", "in.txt", "-n", "3", "-x", "sel.txt", "-r", "rest.txt", "-e", "foo",
            "Bar", "-v", "-d",
        ])
        .unwrap();

        assert_eq!(cli.num_lines.get(), 3);
        assert_eq!(cli.exclude_keywords, vec!["foo".to_owned(), "Bar".to_owned()]);
        assert!(cli.verbose);
        assert!(cli.disable_banner);

        let request = cli.request().unwrap();
        assert_eq!(request.input, PathBuf::from("in.txt"));
        assert!(request.encodings.is_empty());
    }

    #[test]
    fn test_underscore_aliases() {
        let cli = Cli::try_parse_from([
            "usamplex",
            "--input_file",
            "in.txt",
            "--num_lines",
            "1",
            "--output_file_selected",
            "a",
            "--output_file_remaining",
            "b",
        ])
        .unwrap();
        assert_eq!(cli.output_file_remaining, PathBuf::from("b"));
    }

    #[test]
    fn test_zero_count_rejected() {
        let parsed = Cli::try_parse_from([
            "usamplex", "-f", "in.txt", "-n", "0", "-x", "a", "-r", "b",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_encoding_is_config_error() {
        let cli = Cli::try_parse_from([
            "usamplex", "-f", "in.txt", "-n", "1", "-x", "a", "-r", "b", "--encoding", "utf-16",
        ])
        .unwrap();
        assert!(matches!(cli.request(), Err(ExtractError::Config(_))));
    }
}
