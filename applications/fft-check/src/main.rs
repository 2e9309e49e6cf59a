use std::path::{Path, PathBuf};

use golden::{CheckOptions, Checker, NumericArray, DEFAULT_PLOT_PATH};
use golden_types::StoredArray;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const EXIT_MISMATCH: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn print_usage() {
    eprintln!("Usage: fft-check <signal.bin> <candidate.bin> [OPTIONS]");
    eprintln!("       fft-check --golden <signal.bin> <output.bin>");
    eprintln!();
    eprintln!("  --debug            Print the summary even when the check passes");
    eprintln!("  --inverse          Treat the first file as a spectrum and check its inverse FFT");
    eprintln!("  --scale <f>        Tolerance multiplier (default: 1000)");
    eprintln!("  --equal-nan        Count NaN against NaN as a match");
    eprintln!(
        "  --plot <out.png>   Where the heatmap grid goes when the check fails (default: {})",
        DEFAULT_PLOT_PATH
    );
    eprintln!("  --no-plot          Skip the heatmap grid");
    eprintln!("  --options <file>   Load bincode-encoded CheckOptions before applying flags");
    eprintln!("  --golden           Write the golden FFT of <signal.bin> to <output.bin>");
    eprintln!("  --help             Show this help");
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", msg);
    std::process::exit(EXIT_ERROR);
}

fn read_array(path: &Path) -> Result<NumericArray, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    let stored: StoredArray = bincode::deserialize(&bytes)
        .map_err(|e| format!("Cannot decode {}: {}", path.display(), e))?;
    NumericArray::try_from(stored).map_err(|e| format!("{}: {}", path.display(), e))
}

fn write_array(path: &Path, array: &NumericArray) -> Result<(), String> {
    let bytes = bincode::serialize(&array.to_stored())
        .map_err(|e| format!("Cannot encode {}: {}", path.display(), e))?;
    std::fs::write(path, bytes).map_err(|e| format!("Cannot write {}: {}", path.display(), e))
}

fn read_options(path: &Path) -> Result<CheckOptions, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    bincode::deserialize(&bytes).map_err(|e| format!("Cannot decode {}: {}", path.display(), e))
}

fn main() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("off")),
                ),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut positional: Vec<PathBuf> = Vec::new();
    let mut debug = false;
    let mut inverse = false;
    let mut golden_only = false;
    let mut equal_nan = false;
    let mut scale: Option<f64> = None;
    let mut plot: Option<PathBuf> = None;
    let mut no_plot = false;
    let mut options_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--debug" => debug = true,
            "--inverse" => inverse = true,
            "--golden" => golden_only = true,
            "--equal-nan" => equal_nan = true,
            "--no-plot" => no_plot = true,
            "--scale" => {
                i += 1;
                let value = args.get(i).unwrap_or_else(|| fail("--scale needs a value"));
                match value.parse::<f64>() {
                    Ok(v) if v > 0.0 => scale = Some(v),
                    _ => fail(format!("Invalid scale: {}", value)),
                }
            }
            "--plot" => {
                i += 1;
                let value = args.get(i).unwrap_or_else(|| fail("--plot needs a path"));
                plot = Some(PathBuf::from(value));
            }
            "--options" => {
                i += 1;
                let value = args.get(i).unwrap_or_else(|| fail("--options needs a path"));
                options_path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown flag: {}", other);
                print_usage();
                std::process::exit(EXIT_ERROR);
            }
            other => positional.push(PathBuf::from(other)),
        }
        i += 1;
    }

    if positional.len() != 2 {
        print_usage();
        std::process::exit(EXIT_ERROR);
    }

    let mut options = match &options_path {
        Some(path) => read_options(path).unwrap_or_else(|e| fail(e)),
        None => CheckOptions::default(),
    };
    options.debug |= debug;
    options.compare.treat_nan_as_equal |= equal_nan;
    if let Some(scale) = scale {
        options.compare.scale_factor = scale;
    }
    if no_plot {
        options.plot_path = None;
    } else if plot.is_some() {
        options.plot_path = plot;
    }

    let checker = Checker::new(options);
    let first = read_array(&positional[0]).unwrap_or_else(|e| fail(e));

    if golden_only {
        let (variant, golden) = checker.golden(&first).unwrap_or_else(|e| fail(e));
        write_array(&positional[1], &golden).unwrap_or_else(|e| fail(e));
        info!(?variant, shape = ?golden.shape(), "golden_written");
        eprintln!(
            "Golden FFT of {:?} {} written to {}",
            first.shape(),
            first.kind().name(),
            positional[1].display()
        );
        return;
    }

    let candidate = read_array(&positional[1]).unwrap_or_else(|e| fail(e));
    let start = std::time::Instant::now();
    let result = if inverse {
        checker.check_inverse(&first, &candidate)
    } else {
        checker.check(&first, &candidate)
    };

    match result {
        Ok(outcome) => {
            eprintln!(
                "{} {:?} in {:.1}ms: {} of {} elements outside rtol={:e} atol={:e}",
                if outcome.matched { "MATCH" } else { "MISMATCH" },
                outcome.golden.shape(),
                start.elapsed().as_secs_f64() * 1000.0,
                outcome.comparison.mismatched,
                outcome.golden.len(),
                outcome.comparison.tolerance.relative,
                outcome.comparison.tolerance.absolute,
            );
            if !outcome.matched {
                std::process::exit(EXIT_MISMATCH);
            }
        }
        Err(e) => fail(format!("Check aborted: {}", e)),
    }
}
