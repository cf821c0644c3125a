use crate::auth::Credentials;
use crate::config::ResolvedConfig;
use crate::constants::POSTCODE_PROMPT;
use crate::errors::{AppError, AppResult};
use crate::models::Endpoint;
use crate::workflow;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Parsed command-line arguments.
///
/// Every setting is optional; unset values fall back to the config file and
/// then to the built-in defaults.
#[derive(Debug, Default)]
pub struct CliArgs {
    pub postcode: Option<String>,
    pub config: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub endpoints: Option<Vec<Endpoint>>,
    pub page_size: Option<u32>,
    pub max_pages: Option<u32>,
    pub base_url: Option<String>,
    pub verbose: bool,
}

pub fn build_command() -> Command<'static> {
    Command::new("epc-fetch")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .after_help(
            "Credentials are read from the config file's email/api_key, falling back to \
             EPC_EMAIL and EPC_API_KEY.\n\
             Example:\n  epc-fetch --postcode \"SW1A 1AA\" --endpoint all",
        )
        .arg(
            Arg::new("postcode")
                .short('p')
                .long("postcode")
                .help("Postcode to search; prompted for on stdin when omitted")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML config file (defaults to ./epc.toml if present)")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .help("Root directory for the per-postcode output folders")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("endpoint")
                .short('e')
                .long("endpoint")
                .help(
                    "Certificates to fetch: 'domestic' (dom), 'display' (dec, non-domestic) \
                     or 'all'",
                )
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("page_size")
                .long("page-size")
                .help("Rows requested per page")
                .value_parser(clap::value_parser!(u32))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("max_pages")
                .long("max-pages")
                .help("Stop after this many pages per endpoint")
                .value_parser(clap::value_parser!(u32))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("base_url")
                .long("base-url")
                .help("Base URL of the EPC API")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> AppResult<Self> {
        let endpoints = matches
            .get_one::<String>("endpoint")
            .map(|value| Endpoint::parse_selection(value))
            .transpose()?;

        Ok(Self {
            postcode: matches.get_one::<String>("postcode").cloned(),
            config: matches.get_one::<PathBuf>("config").cloned(),
            output_dir: matches.get_one::<PathBuf>("output_dir").cloned(),
            endpoints,
            page_size: matches.get_one::<u32>("page_size").copied(),
            max_pages: matches.get_one::<u32>("max_pages").copied(),
            base_url: matches.get_one::<String>("base_url").cloned(),
            verbose: matches.get_one::<bool>("verbose").copied().unwrap_or(false),
        })
    }

    /// Applies command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut ResolvedConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(endpoints) = &self.endpoints {
            config.endpoints = endpoints.clone();
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(max) = self.max_pages {
            config.max_pages = Some(max);
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
    }
}

/// Parses the process arguments.
pub fn parse_args() -> AppResult<CliArgs> {
    CliArgs::from_matches(&build_command().get_matches())
}

/// Resolves configuration and credentials, obtains the postcode and runs the
/// fetch-and-write workflow.
///
/// Credentials are checked before the postcode prompt so a missing key fails
/// without any interaction or network traffic.
pub async fn execute(args: CliArgs) -> AppResult<()> {
    let mut config = ResolvedConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    let credentials = Credentials::resolve(config.email.as_deref(), config.api_key.as_deref())?;

    let postcode = match &args.postcode {
        Some(postcode) => postcode.clone(),
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            read_postcode(&mut stdin.lock(), &mut stdout)?
        }
    };

    let summary = workflow::run(&postcode, &config, &credentials).await?;

    if summary.skipped > 0 {
        warn!(
            skipped = summary.skipped,
            "Dropped response rows that were not objects"
        );
    }

    if summary.fetched == 0 {
        println!("No EPC certificates found for postcode {}", summary.postcode);
        return Ok(());
    }

    for failure in &summary.failures {
        warn!(
            identifier = %failure.identifier,
            error = %failure.error,
            "Record was not written"
        );
    }
    info!(
        dir = %summary.postcode_dir.display(),
        written = summary.written,
        files = summary.files,
        failed = summary.failures.len(),
        "Done"
    );
    println!(
        "Wrote {} of {} certificate(s) as {} file(s) in {}",
        summary.written,
        summary.fetched,
        summary.files,
        summary.postcode_dir.display()
    );

    Ok(())
}

/// Prompts on `output` and reads one line from `input`.
pub fn read_postcode<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> AppResult<String> {
    write!(output, "{POSTCODE_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| AppError::InvalidInput(format!("Failed to read postcode: {e}")))?;
    if read == 0 {
        return Err(AppError::InvalidInput(
            "No postcode given (end of input)".into(),
        ));
    }

    Ok(line.trim().to_string())
}
