//! CLI binary entry point for compliance-forms-cli

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use compliance_forms_sdk::cli::CliError;
#[cfg(feature = "cli")]
use compliance_forms_sdk::cli::commands::export::{ExportArgs, handle_export};
#[cfg(feature = "cli")]
use compliance_forms_sdk::cli::commands::header::{HeaderArgs, handle_header};
#[cfg(feature = "cli")]
use compliance_forms_sdk::cli::commands::import::{ImportArgs, handle_import};
#[cfg(feature = "cli")]
use compliance_forms_sdk::cli::commands::template::{
    ParamsArgs, TemplateArgs, handle_params, handle_template,
};
#[cfg(feature = "cli")]
use compliance_forms_sdk::cli::commands::validate::{ValidateArgs, handle_validate};
#[cfg(feature = "cli")]
use compliance_forms_sdk::config::{SdkConfig, sample_config};
#[cfg(feature = "cli")]
use compliance_forms_sdk::models::TemplateIdentifier;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tokio_util::sync::CancellationToken;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "compliance-forms-cli")]
#[command(about = "CLI wrapper for the Compliance Forms SDK")]
#[command(version)]
struct Cli {
    /// Directory holding .compliance-forms.toml (default: current directory)
    #[arg(short = 'C', long, global = true, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Print the spreadsheet header and merge ranges of a schema as JSON
    Header {
        /// Column schema file (.yaml or .json)
        schema: PathBuf,
    },
    /// Write an empty import template workbook
    Template {
        schema: PathBuf,
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Page title used in the default file name
        #[arg(short, long)]
        title: Option<String>,
        /// Sheet name (default: from config)
        #[arg(long)]
        sheet: Option<String>,
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
    /// Write the id/name parameter listing of a schema
    Params {
        schema: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        sheet: Option<String>,
        #[arg(short, long)]
        force: bool,
    },
    /// Decode an uploaded workbook and print the rows as JSON
    Import {
        schema: PathBuf,
        /// Workbook to import (.xlsx, .xls, .ods)
        input: PathBuf,
        /// JSON department list for department columns
        #[arg(short, long)]
        departments: Option<PathBuf>,
    },
    /// Convert records to their export form, optionally rendering a server template
    Export {
        schema: PathBuf,
        /// JSON array of records
        records: PathBuf,
        /// JSON object merged under every record
        #[arg(long)]
        context: Option<PathBuf>,
        #[arg(short, long)]
        departments: Option<PathBuf>,
        /// Template id to render with
        #[arg(short, long)]
        template: Option<String>,
        /// Document type whose templates are looked up (core.employee.document, core.vehicle)
        #[arg(short, long)]
        identifier: Option<TemplateIdentifier>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        force: bool,
    },
    /// Check a column schema for configuration errors
    Validate {
        schema: PathBuf,
        /// Fail on warnings too
        #[arg(long)]
        strict: bool,
    },
    /// Print a sample configuration file
    Config,
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
async fn run(cli: Cli) -> Result<(), CliError> {
    let config = SdkConfig::load(&cli.config_dir)?;

    match cli.command {
        Commands::Header { schema } => handle_header(&HeaderArgs { schema }),
        Commands::Template {
            schema,
            output,
            title,
            sheet,
            force,
        } => {
            let args = TemplateArgs {
                schema,
                output,
                title,
                sheet_name: sheet.unwrap_or_else(|| config.import.sheet_name.clone()),
                force,
            };
            handle_template(&args).map(|_| ())
        }
        Commands::Params {
            schema,
            output,
            sheet,
            force,
        } => {
            let args = ParamsArgs {
                schema,
                output,
                sheet_name: sheet.unwrap_or_else(|| config.export.kv_sheet_name.clone()),
                force,
            };
            handle_params(&args).map(|_| ())
        }
        Commands::Import {
            schema,
            input,
            departments,
        } => {
            let args = ImportArgs {
                schema,
                input,
                departments,
            };
            handle_import(&args).await.map(|_| ())
        }
        Commands::Export {
            schema,
            records,
            context,
            departments,
            template,
            identifier,
            output,
            force,
        } => {
            let cancel = CancellationToken::new();
            let token = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received ctrl-c signal");
                    token.cancel();
                }
            });

            let args = ExportArgs {
                schema,
                records,
                context,
                departments,
                template,
                identifier,
                output,
                force,
                cancel,
            };
            handle_export(&args, &config).await
        }
        Commands::Validate { schema, strict } => {
            handle_validate(&ValidateArgs { schema, strict })
        }
        Commands::Config => {
            print!("{}", sample_config());
            Ok(())
        }
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
