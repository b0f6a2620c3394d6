use crate::import::{run_import, ImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use estate_hub::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "estate-hub",
    about = "Import developer stock lists into the listings store, or serve the import API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Import a CSV export or pasted pipe table from disk
    Import(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Import(args) => run_import(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_hub::workflows::import::SourceFormat;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["estate-hub"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn import_subcommand_accepts_format_and_flags() {
        let cli = Cli::try_parse_from([
            "estate-hub",
            "import",
            "--file",
            "stock.md",
            "--format",
            "pipe",
            "--dry-run",
            "--list",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Import(args)) => {
                assert_eq!(args.format, Some(SourceFormat::PipeTable));
                assert!(args.dry_run);
                assert!(args.list);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result =
            Cli::try_parse_from(["estate-hub", "import", "--file", "a.csv", "--format", "xlsx"]);
        assert!(result.is_err());
    }
}
