use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetpivot::{ReportConfig, ReportPipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sheetpivot",
    version,
    about = "Pivot a sales spreadsheet into a formatted xlsx report"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the report from INPUT and write it to OUTPUT.
    Run(RunArgs),
    /// Print the default configuration as YAML.
    PrintConfig,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input workbook (.xlsx).
    input: PathBuf,

    /// Report workbook to create or overwrite.
    output: PathBuf,

    /// YAML configuration file; flags below override it.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Input worksheet (defaults to the first sheet).
    #[arg(long)]
    sheet: Option<String>,

    /// Column that becomes the report rows.
    #[arg(long)]
    group: Option<String>,

    /// Column that becomes the report columns.
    #[arg(long)]
    category: Option<String>,

    /// Numeric column to sum.
    #[arg(long)]
    value: Option<String>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl RunArgs {
    fn resolve_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ReportConfig::default(),
        };
        if let Some(sheet) = &self.sheet {
            config.input_sheet = Some(sheet.clone());
        }
        if let Some(group) = &self.group {
            config.group_field = group.clone();
        }
        if let Some(category) = &self.category {
            config.category_field = category.clone();
        }
        if let Some(value) = &self.value {
            config.value_field = value.clone();
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: RunArgs) -> Result<()> {
    init_tracing(args.verbose);
    let config = args.resolve_config()?;
    let pipeline = ReportPipeline::new(&args.input, &args.output).with_config(config);
    let summary = pipeline
        .run()
        .map_err(|e| {
            let step = e.step();
            anyhow::Error::new(e).context(format!("{step} step failed"))
        })?;
    println!("{summary}");
    Ok(())
}

fn print_config() -> Result<()> {
    let yaml = ReportConfig::default().to_yaml()?;
    print!("{yaml}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::PrintConfig => print_config(),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
