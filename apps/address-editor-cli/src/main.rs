#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use address_editor::{
    AddressEditor, AddressEditorModule, AddressField, CustomerId, SkipReason, SubmitOutcome,
};
use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{AppConfig, CliOverrides};

/// Update a customer's shipping address on the storefront backend
#[derive(Parser)]
#[command(name = "address-editor-cli")]
#[command(about = "Update a customer's shipping address on the storefront backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Backend origin override (e.g. `https://loja.example.com`)
    #[arg(long)]
    base_url: Option<String>,

    /// Allow a plain http:// backend
    #[arg(long)]
    allow_insecure_http: bool,

    /// Customer identifier (CPF) whose address is updated
    #[arg(long, required_unless_present = "print_config")]
    cpf: Option<String>,

    #[command(flatten)]
    address: AddressArgs,
}

#[derive(clap::Args)]
struct AddressArgs {
    #[arg(long)]
    street: Option<String>,
    /// House number; anything that is not a positive integer is rejected
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    neighborhood: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    complement: Option<String>,
}

impl AddressArgs {
    fn apply(self, editor: &AddressEditor) {
        let fields = [
            (AddressField::Street, self.street),
            (AddressField::Number, self.number),
            (AddressField::Neighborhood, self.neighborhood),
            (AddressField::City, self.city),
            (AddressField::State, self.state),
            (AddressField::PostalCode, self.postal_code),
            (AddressField::Country, self.country),
            (AddressField::Complement, self.complement),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                editor.update_field(field, value);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (STOREFRONT__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        base_url: cli.base_url,
        allow_insecure_http: cli.allow_insecure_http,
        verbose: cli.verbose,
    });

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(ExitCode::SUCCESS);
    }

    logging::init(&config.logging)?;

    let Some(cpf) = cli.cpf else {
        anyhow::bail!("--cpf is required");
    };

    let module = AddressEditorModule::init(&config.address_editor)
        .context("failed to initialize address editor")?;
    let editor = module.editor(CustomerId::new(cpf), || {
        tracing::info!("shipping address changed");
    });

    editor.open();
    cli.address.apply(&editor);

    let outcome = tokio::select! {
        outcome = editor.submit() => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted; cancelling submission");
            editor.close();
            SubmitOutcome::Cancelled
        }
    };

    Ok(report(&editor, &outcome))
}

fn report(editor: &AddressEditor, outcome: &SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Saved => {
            println!("address updated");
            ExitCode::SUCCESS
        }
        SubmitOutcome::Cancelled => {
            eprintln!("submission cancelled");
            ExitCode::FAILURE
        }
        SubmitOutcome::Skipped(SkipReason::NotOpen | SkipReason::AlreadyPending) => {
            eprintln!("submission skipped");
            ExitCode::FAILURE
        }
        SubmitOutcome::Invalid(_) | SubmitOutcome::Rejected(_) => {
            eprintln!("{}", editor.view().error_message);
            ExitCode::FAILURE
        }
    }
}
