// src/pipeline/mod.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use glob::glob;
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    intern::intern,
    matrix::{is_rectangular, max_row_len, Cell},
};

/// What [`process_file`] did with one input.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub rows: usize,
    /// Column count after normalization.
    pub width: usize,
    /// `true` if the input was jagged and had to be padded.
    pub padded: bool,
    /// Size of the code table, when interning was on.
    pub distinct_values: Option<usize>,
    pub outputs: Vec<PathBuf>,
}

/// Read `path` as a header-less CSV file into a (possibly jagged) matrix.
/// Every field goes through [`Cell::infer`].
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Cell>>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // rows of different lengths are normalized later
        .from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {:?} at record {}", path, idx))?;
        rows.push(record.iter().map(Cell::infer).collect::<Vec<_>>());
    }
    debug!(rows = rows.len(), "loaded matrix");
    Ok(rows)
}

/// Load → normalize → (intern) → encode one file into `config.output_dir`.
///
/// With interning on, writes `<stem>.codes.csv` and `<stem>.table.json`;
/// otherwise writes `<stem>.encoded.csv`.
#[tracing::instrument(level = "info", skip(path, config), fields(path = %path.as_ref().display()))]
pub fn process_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<ProcessedFile> {
    let path = path.as_ref();
    let mut rows = load_matrix(path)?;

    let padded = !is_rectangular(&rows);
    if padded {
        config.normalizer().normalize_in_place(&mut rows);
        info!(padding = ?config.padding, "input was jagged; padded rows");
    }
    let width = max_row_len(&rows);

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("no usable file name in {:?}", path))?;
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {:?}", config.output_dir))?;

    let encoder = config.encoder();
    let mut outputs = Vec::new();
    let mut distinct_values = None;

    if config.intern {
        let interned = intern(&rows)?;

        let codes_path = config.output_dir.join(format!("{}.codes.csv", stem));
        let out = File::create(&codes_path)
            .with_context(|| format!("creating {:?}", codes_path))?;
        encoder
            .encode_to(BufWriter::new(out), &interned.codes)
            .with_context(|| format!("writing {:?}", codes_path))?;
        outputs.push(codes_path);

        let table_path = config.output_dir.join(format!("{}.table.json", stem));
        let out = File::create(&table_path)
            .with_context(|| format!("creating {:?}", table_path))?;
        let mut writer = BufWriter::new(out);
        serde_json::to_writer_pretty(&mut writer, &interned.table)
            .with_context(|| format!("writing {:?}", table_path))?;
        writer.flush()?;
        outputs.push(table_path);

        distinct_values = Some(interned.table.len());
    } else {
        let encoded_path = config.output_dir.join(format!("{}.encoded.csv", stem));
        let out = File::create(&encoded_path)
            .with_context(|| format!("creating {:?}", encoded_path))?;
        encoder
            .encode_to(BufWriter::new(out), &rows)
            .with_context(|| format!("writing {:?}", encoded_path))?;
        outputs.push(encoded_path);
    }

    if rows.is_empty() || width == 0 {
        warn!("no data; outputs are empty");
    }
    info!(rows = rows.len(), width, ?distinct_values, "processed");

    Ok(ProcessedFile {
        input: path.to_path_buf(),
        rows: rows.len(),
        width,
        padded,
        distinct_values,
        outputs,
    })
}

/// Outcome of [`process_all`]. Every input lands in exactly one list.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ProcessedFile>,
    /// Input path and the rendered error chain.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// The CLI exits non-zero unless this holds.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run [`process_file`] over `inputs` in order. A failing file is logged and
/// recorded; the remaining files are still processed.
pub fn process_all(inputs: &[PathBuf], config: &Config) -> BatchReport {
    let mut report = BatchReport::default();
    for input in inputs {
        let start = Instant::now();
        match process_file(input, config) {
            Ok(done) => {
                info!(
                    input = %input.display(),
                    rows = done.rows,
                    outputs = ?done.outputs,
                    elapsed = ?start.elapsed(),
                    "done"
                );
                report.processed.push(done);
            }
            Err(e) => {
                error!("{} failed: {:#}", input.display(), e);
                report.failed.push((input.clone(), format!("{:#}", e)));
            }
        }
    }
    report
}

/// Expand a glob pattern into the list of matching files, sorted.
pub fn expand_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob(pattern).with_context(|| format!("invalid glob pattern {:?}", pattern))? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!("skipping unreadable path: {}", e),
        }
    }
    paths.sort();
    Ok(paths)
}
