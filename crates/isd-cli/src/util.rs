use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use isd_analysis::payload::{FullPredictionsData, SurvivalCurvesData};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        if let Output::File { path, .. } = self {
            eprintln!("Saved JSON to {}", path.display());
        }
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read per-subject predictions from a JSON file
///
/// With `strict`, payloads with ragged arrays or out-of-range values are
/// rejected instead of being truncated and clamped.
pub fn read_full_predictions_file<P>(path: P, strict: bool) -> anyhow::Result<FullPredictionsData>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let data: FullPredictionsData = read_json_file("full predictions", path)?;
    if strict {
        data.validate()
            .with_context(|| format!("Invalid full predictions file: {}", path.display()))?;
    }
    log::info!("loaded {} subjects from {}", data.len(), path.display());
    Ok(data)
}

/// Read individual survival curves from a JSON file
pub fn read_survival_curves_file<P>(path: P, strict: bool) -> anyhow::Result<SurvivalCurvesData>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let data: SurvivalCurvesData = read_json_file("survival curves", path)?;
    if strict {
        data.validate()
            .with_context(|| format!("Invalid survival curves file: {}", path.display()))?;
    }
    log::info!("loaded {} curves from {}", data.curves.len(), path.display());
    Ok(data)
}

pub fn save_csv(path: &Path, content: &str) -> anyhow::Result<()> {
    fs::write(path, content)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    eprintln!("Saved CSV to {}", path.display());
    Ok(())
}

/// Formats an optional value, or `N/A` when absent.
pub fn format_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or("N/A".to_string(), |v| format!("{v:.precision$}"))
}
