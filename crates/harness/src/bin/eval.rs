//! svmsim-eval: evaluate quantized SVM parameters on a labelled test set
//!
//! Runs the bit-accurate fixed-point engine and its floating-point reference
//! over every test vector, then prints accuracy, a confusion matrix and the
//! estimated hardware cost.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use svmsim_harness::{ModelKind, Simulator};
use svmsim_model::SimulatorConfig;

#[derive(Parser)]
#[command(name = "svmsim-eval")]
#[command(author = "svmsim Contributors")]
#[command(version)]
#[command(about = "Bit-accurate fixed-point SVM evaluation")]
#[command(long_about = r#"
svmsim-eval

Evaluates quantized linear or RBF-kernel SVM parameters with the same integer
arithmetic as the hardware accelerator.

Examples:
  # Linear model on the default Q8.8 configuration
  svmsim-eval --kind linear --params linear_params.json --vectors test_data.json

  # Kernel model with a custom lookup-table geometry
  svmsim-eval --kind kernel --params kernel_params.json --vectors test_data.json --config sim.json
"#)]
struct Cli {
    /// Model kind: linear or kernel
    #[arg(short, long)]
    kind: ModelKind,

    /// Parameter record (JSON)
    #[arg(short, long)]
    params: PathBuf,

    /// Test vectors {X_test, y_test} (JSON)
    #[arg(short, long)]
    vectors: PathBuf,

    /// Simulator configuration (JSON); SVMSIM_* environment variables otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, default_value = "false")]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "svmsim_harness=info,svmsim_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimulatorConfig::from_json_file(path)?,
        None => SimulatorConfig::from_env(),
    };
    tracing::info!(
        format = %config.format,
        lut_size = config.lut_size,
        accumulation = %config.accumulation,
        "Simulator configuration"
    );

    let simulator = Simulator::new(config)?;
    let model = simulator.load_model(cli.kind, &cli.params)?;
    let vectors = simulator.load_vectors(&cli.vectors)?;
    tracing::info!(samples = vectors.len(), "Loaded test vectors from {:?}", cli.vectors);

    let report = simulator.run(&model, &vectors)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
