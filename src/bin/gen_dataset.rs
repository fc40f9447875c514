//! Synthetic dataset generator
//!
//! Writes files in the exact formats the harness reads, for smoke runs
//! and benchmarking without the original datasets:
//!
//! ```text
//! gen_dataset --kind vectors --count 500 --dim 8 --seed 42 --out vectors.txt
//! gen_dataset --kind tweets --count 500 --vocab 200 --max-words 12 --out tweets.txt
//! ```

use std::{env, fs};

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;

use submax::dataset::{format_tweets, format_vectors, synth_tweets, synth_vectors};

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn flag_or<T: std::str::FromStr>(args: &[String], key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match parse_flag(args, key) {
        Some(s) => s
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("bad value for {key}: {e}")),
        None => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let kind = parse_flag(&args, "--kind").context("--kind vectors|tweets is required")?;
    let out = parse_flag(&args, "--out").context("--out <path> is required")?;
    let count: usize = flag_or(&args, "--count", 500)?;
    let seed: u64 = flag_or(&args, "--seed", 42)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let text = match kind.as_str() {
        "vectors" => {
            let dim: usize = flag_or(&args, "--dim", 8)?;
            anyhow::ensure!(dim >= 1, "--dim must be at least 1");
            let data = synth_vectors(&mut rng, count, dim);
            format_vectors(dim, &data)
        }
        "tweets" => {
            let vocab: usize = flag_or(&args, "--vocab", 200)?;
            let max_words: usize = flag_or(&args, "--max-words", 12)?;
            let max_weight: f64 = flag_or(&args, "--max-weight", 100.0)?;
            let data = synth_tweets(&mut rng, count, vocab, max_words, max_weight);
            format_tweets(&data)
        }
        other => anyhow::bail!("unknown --kind {other:?}, expected vectors or tweets"),
    };

    fs::write(&out, text).with_context(|| format!("writing {out}"))?;
    eprintln!("wrote {count} {kind} to {out}");
    Ok(())
}
