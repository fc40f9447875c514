//! Dataset loading & synthesis
//!
//! Two line-oriented input formats, ids assigned as zero-based data-line
//! indices:
//!
//! - **Vectors**: first line `count dim`, then `dim` whitespace-separated
//!   floats per line.
//! - **Tweets**: first line `count`, then `weight token token …` per line
//!   (duplicate tokens allowed).
//!
//! Malformed input is a [`DatasetError`] carrying the path and 1-based
//! line number. The header count is advisory (the original reader streams
//! to EOF); it is not enforced against the actual line count.
//!
//! The `synth_*` generators produce in-memory datasets with the same id
//! discipline for benches, property tests, and the `gen_dataset` binary.

use std::fs;
use std::path::Path;

use rand::Rng;

use crate::element::Element;

/// Errors from the dataset readers.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The file could not be read at all.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A header or data line did not parse.
    #[error("{path}:{line}: {msg}")]
    Parse {
        /// Offending path.
        path: String,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        msg: String,
    },
}

fn read_to_string(path: &Path) -> Result<String, DatasetError> {
    fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_err(path: &Path, line: usize, msg: impl Into<String>) -> DatasetError {
    DatasetError::Parse {
        path: path.display().to_string(),
        line,
        msg: msg.into(),
    }
}

/// Read a numeric-vector dataset. Returns `(dim, elements)`.
pub fn read_vectors(path: &Path) -> Result<(usize, Vec<Element>), DatasetError> {
    let text = read_to_string(path)?;
    let mut lines = text.lines().enumerate();

    let (_, header) = lines
        .next()
        .ok_or_else(|| parse_err(path, 1, "empty file, expected `count dim` header"))?;
    let mut fields = header.split_whitespace();
    let _count: usize = fields
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| parse_err(path, 1, "header must start with an element count"))?;
    let dim: usize = fields
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| parse_err(path, 1, "header must carry the dimension"))?;
    if dim == 0 {
        return Err(parse_err(path, 1, "dimension must be at least 1"));
    }

    let mut dataset = Vec::new();
    let mut id = 0usize;
    for (lineno, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let coords: Result<Vec<f64>, _> = line
            .split_whitespace()
            .map(|t| t.parse::<f64>())
            .collect();
        let coords =
            coords.map_err(|e| parse_err(path, lineno + 1, format!("bad coordinate: {e}")))?;
        if coords.len() != dim {
            return Err(parse_err(
                path,
                lineno + 1,
                format!("expected {dim} coordinates, found {}", coords.len()),
            ));
        }
        dataset.push(Element::numeric(id, coords));
        id += 1;
    }
    Ok((dim, dataset))
}

/// Read a tweet dataset (`weight token …` per line).
pub fn read_tweets(path: &Path) -> Result<Vec<Element>, DatasetError> {
    let text = read_to_string(path)?;
    let mut lines = text.lines().enumerate();

    let (_, header) = lines
        .next()
        .ok_or_else(|| parse_err(path, 1, "empty file, expected `count` header"))?;
    let _count: usize = header
        .split_whitespace()
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| parse_err(path, 1, "header must start with an element count"))?;

    let mut dataset = Vec::new();
    let mut id = 0usize;
    for (lineno, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let weight: f64 = fields
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| parse_err(path, lineno + 1, "line must start with a weight"))?;
        if weight < 0.0 {
            return Err(parse_err(path, lineno + 1, "weight must be non-negative"));
        }
        let words: Vec<String> = fields.map(|t| t.to_string()).collect();
        dataset.push(Element::tokens(id, weight, words));
        id += 1;
    }
    Ok(dataset)
}

/// Uniform random points in `[0, 1)^dim`.
pub fn synth_vectors<R: Rng>(rng: &mut R, count: usize, dim: usize) -> Vec<Element> {
    (0..count)
        .map(|id| {
            let coords = (0..dim).map(|_| rng.gen_range(0.0..1.0)).collect();
            Element::numeric(id, coords)
        })
        .collect()
}

/// Random token bags over a `vocab`-sized vocabulary with up to
/// `max_words` tokens and weights in `[0, max_weight)`.
pub fn synth_tweets<R: Rng>(
    rng: &mut R,
    count: usize,
    vocab: usize,
    max_words: usize,
    max_weight: f64,
) -> Vec<Element> {
    (0..count)
        .map(|id| {
            let n_words = rng.gen_range(1..=max_words.max(1));
            let words = (0..n_words)
                .map(|_| format!("w{}", rng.gen_range(0..vocab.max(1))))
                .collect();
            Element::tokens(id, rng.gen_range(0.0..max_weight), words)
        })
        .collect()
}

/// Render a numeric dataset in the on-disk format [`read_vectors`] reads.
pub fn format_vectors(dim: usize, dataset: &[Element]) -> String {
    let mut out = format!("{} {}\n", dataset.len(), dim);
    for e in dataset {
        let row: Vec<String> = e.coords().iter().map(|c| format!("{c}")).collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Render a tweet dataset in the on-disk format [`read_tweets`] reads.
pub fn format_tweets(dataset: &[Element]) -> String {
    let mut out = format!("{}\n", dataset.len());
    for e in dataset {
        out.push_str(&format!("{}", e.weight()));
        for w in e.words() {
            out.push(' ');
            out.push_str(w);
        }
        out.push('\n');
    }
    out
}
