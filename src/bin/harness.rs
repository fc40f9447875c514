//! Benchmark sweep driver
//!
//! Loads one dataset, pairs it with the matching oracle (Gaussian kernel
//! for vector files, text coverage for tweet files), and sweeps every
//! selection policy over the requested cardinality bounds and policy
//! parameters. One tab-separated result line per run goes to stdout;
//! `--json` additionally writes the full record set.
//!
//! ```text
//! harness --vectors data/forest.txt --ks 10,20,30 --json out.json
//! harness --tweets data/twitter.txt --c 1.0 --r 1,3,5
//! ```

use std::{env, fs, path::Path};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use submax::{
    evaluate, report::RunRecord, FreeDisposal, GaussianKernelOracle, Greedy,
    IndependentSetImprovement, OnlineAdaptive, OnlineNonAdaptive, Oracle, Preemption,
    StreamingGreedy, TextCoverageOracle,
};

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
    }
    None
}

fn parse_list<T: std::str::FromStr>(s: &str) -> anyhow::Result<Vec<T>>
where
    T::Err: std::fmt::Display,
{
    s.split(',')
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("bad list item {t:?}: {e}"))
        })
        .collect()
}

/// Sweep all policies for one oracle prototype.
fn run_suite<O: Oracle + 'static>(
    oracle: &O,
    dataset: &[submax::Element],
    ks: &[usize],
    cs: &[f64],
    rs: &[f64],
) -> anyhow::Result<Vec<RunRecord>> {
    let mut records = Vec::new();
    let mut emit = |rec: RunRecord| {
        println!("{rec}");
        records.push(rec);
    };

    for &k in ks {
        info!(k, "sweeping cardinality bound");

        let mut greedy = Greedy::new(k, oracle);
        emit(evaluate(&mut greedy, dataset, None)?);

        let mut isi = IndependentSetImprovement::new(k, oracle);
        emit(evaluate(&mut isi, dataset, None)?);

        let mut sg = StreamingGreedy::new(k, oracle);
        emit(evaluate(&mut sg, dataset, None)?);

        for &c in cs {
            let mut pre = Preemption::new(k, oracle, c);
            emit(evaluate(&mut pre, dataset, Some(c))?);
        }

        let mut fd = FreeDisposal::new(k, oracle)
            .with_context(|| format!("free-disposal construction for k = {k}"))?;
        emit(evaluate(&mut fd, dataset, None)?);

        for &r in rs.iter().chain(std::iter::once(&(k as f64))) {
            let mut oa = OnlineAdaptive::new(k, oracle, r)
                .with_context(|| format!("online-adaptive construction for k = {k}"))?;
            emit(evaluate(&mut oa, dataset, Some(r))?);
        }

        for &r in rs {
            let mut ona = OnlineNonAdaptive::new(k, oracle, r)
                .with_context(|| format!("online-non-adaptive construction for k = {k}"))?;
            emit(evaluate(&mut ona, dataset, Some(r))?);
        }

        println!();
    }
    Ok(records)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let vectors = parse_flag(&args, "--vectors");
    let tweets = parse_flag(&args, "--tweets");

    let ks: Vec<usize> = match parse_flag(&args, "--ks") {
        Some(s) => parse_list(&s)?,
        None => vec![10, 20, 30, 40, 50],
    };
    let cs: Vec<f64> = match parse_flag(&args, "--c") {
        Some(s) => parse_list(&s)?,
        None => vec![1.0],
    };
    let rs: Vec<f64> = match parse_flag(&args, "--r") {
        Some(s) => parse_list(&s)?,
        None => vec![1.0, 3.0, 5.0, 7.0, 9.0],
    };
    let json_out = parse_flag(&args, "--json");

    let records = match (vectors, tweets) {
        (Some(path), None) => {
            let path = Path::new(&path);
            let (dim, dataset) =
                submax::dataset::read_vectors(path).context("loading vector dataset")?;
            println!(
                "# {}: {} elements of dimension {dim}, started {}",
                path.display(),
                dataset.len(),
                chrono::Local::now().to_rfc3339()
            );
            let oracle = GaussianKernelOracle::new(dim);
            run_suite(&oracle, &dataset, &ks, &cs, &rs)?
        }
        (None, Some(path)) => {
            let path = Path::new(&path);
            let dataset = submax::dataset::read_tweets(path).context("loading tweet dataset")?;
            println!(
                "# {}: {} elements, started {}",
                path.display(),
                dataset.len(),
                chrono::Local::now().to_rfc3339()
            );
            let oracle = TextCoverageOracle::new();
            run_suite(&oracle, &dataset, &ks, &cs, &rs)?
        }
        _ => anyhow::bail!("pass exactly one of --vectors <path> or --tweets <path>"),
    };

    if let Some(out) = json_out {
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&out, json).with_context(|| format!("writing {out}"))?;
        info!(path = %out, runs = records.len(), "wrote JSON records");
    }
    Ok(())
}
