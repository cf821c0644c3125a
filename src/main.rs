use epc_fetch::{cli, errors};
use errors::AppResult;
use tracing_subscriber::EnvFilter;

fn main() -> AppResult<()> {
    let args = cli::parse_args()?;
    init_logging(args.verbose);

    let rt =
        tokio::runtime::Runtime::new().map_err(|e| errors::AppError::Io(e.to_string()))?;
    rt.block_on(cli::execute(args))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
