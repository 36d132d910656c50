use anyhow::Context;
use clap::Parser;
use dischex::config::{load_json, GeneratorConfig};
use dischex::golden::generate;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gen-disc-data", about = "Generate random Q8.8 discriminator test vectors and a golden reference")]
struct Args {
    /// Optional JSON config (input_size, frac_bits, ranges, seed, out_dir)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Random seed; omit for a fresh draw
    #[arg(long)]
    seed: Option<u64>,
    /// Directory to write the hex files into
    #[arg(long)]
    out_dir: Option<PathBuf>,
    #[arg(long)]
    input_size: Option<usize>,
    /// Optional: write the golden reference as JSON to this path
    #[arg(long)]
    json_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dischex::init_logging();
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(p) => load_json::<GeneratorConfig, _>(p).with_context(|| format!("load config {}", p.display()))?,
        None => GeneratorConfig::default(),
    };
    if args.seed.is_some() { cfg.seed = args.seed; }
    if let Some(dir) = args.out_dir { cfg.out_dir = dir; }
    if let Some(n) = args.input_size { cfg.input_size = n; }

    let (_, report) = generate(&cfg).context("generate golden reference")?;
    println!("{}", report);
    if !report.decisions_agree() {
        println!("note: fixed-point decision {} differs from float (score {:.4} near zero?)", report.fixed.decision(), report.float.score);
    }
    if let Some(path) = &args.json_out {
        report.write_json(path).with_context(|| format!("write {}", path.display()))?;
        println!("Golden reference written to {}", path.display());
    }
    println!(
        "\nFiles '{}', '{}' and '{}' written.",
        cfg.weights_path().display(),
        cfg.bias_path().display(),
        cfg.input_path().display()
    );
    Ok(())
}
