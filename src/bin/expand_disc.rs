use anyhow::Context;
use clap::Parser;
use dischex::config::{load_json, BiasPolicy, ExpanderConfig};
use dischex::expand::expand_all;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "expand-disc", about = "Tile per-neuron discriminator hex files into full layer matrices")]
struct Args {
    /// Optional JSON config (layers, data_dir, bias_policy)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the Discriminator_Layer*.hex files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Reject layers whose bias file has fewer entries than neurons
    #[arg(long, default_value_t = false)]
    strict_bias: bool,
}

fn main() -> anyhow::Result<()> {
    dischex::init_logging();
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(p) => load_json::<ExpanderConfig, _>(p).with_context(|| format!("load config {}", p.display()))?,
        None => ExpanderConfig::default(),
    };
    if let Some(dir) = args.data_dir { cfg.data_dir = dir; }
    if args.strict_bias { cfg.bias_policy = BiasPolicy::Strict; }

    let summary = expand_all(&cfg);
    for o in &summary.outcomes {
        match &o.result {
            Ok(r) => println!("layer {}: OK weights={} biases={} warnings={}", o.layer, r.weights_written, r.biases_written, r.warnings.len()),
            Err(e) => println!("layer {}: FAILED {}", o.layer, e),
        }
    }
    Ok(())
}
