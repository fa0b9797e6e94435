//! Path Kernel Command Line Interface
//!
//! Computes Path Kernel values, weight tables and kernel matrices over
//! sequence files, optionally backed by an on-disk weight cache.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use pathkernel::core::{KernelError, Result, StorageConfig};
use pathkernel::utils::{distance, sigma::select_sigma};
use pathkernel::{
    GaussianKernel, Kernel, KernelMatrix, LabelAlphabet, NormalizedKernel, PathKernel,
    PathKernelConfig, SequenceDataset, SymbolKernel,
};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "pathkernel")]
#[command(about = "Path Kernel similarities between sequences")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the kernels on built-in data
    Demo,
    /// Compute, print and cache a weight table
    Weights(WeightsArgs),
    /// Compute the kernel matrix of a sequence file
    Matrix(MatrixArgs),
}

#[derive(Args)]
struct CostArgs {
    /// JSON configuration file (costs and storage)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cost of horizontal and vertical steps
    #[arg(long)]
    chv: Option<f64>,

    /// Cost of diagonal steps
    #[arg(long)]
    cd: Option<f64>,

    /// Weight cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Allow writing to the weight cache
    #[arg(long)]
    writable: bool,
}

#[derive(Args)]
struct WeightsArgs {
    /// Dimension of the table
    #[arg(long)]
    dim: usize,

    #[command(flatten)]
    costs: CostArgs,
}

#[derive(Args)]
struct MatrixArgs {
    /// Sequence file (JSON or text)
    #[arg(long)]
    data: PathBuf,

    /// Data format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: DataFormat,

    /// Gaussian sigma for vector symbols, chosen from the data if absent
    #[arg(long)]
    sigma: Option<f64>,

    /// Normalize the matrix to unit self similarities
    #[arg(long, conflicts_with = "distance")]
    normalize: bool,

    /// Output kernel-induced distances instead of similarities
    #[arg(long)]
    distance: bool,

    #[command(flatten)]
    costs: CostArgs,

    /// Output file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum DataFormat {
    /// Pick from the file extension
    Auto,
    /// JSON array of sequences of vectors or labels
    Json,
    /// One whitespace-separated sequence per line
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum MatrixMode {
    Raw,
    Normalized,
    Distance,
}

#[derive(Serialize)]
struct MatrixReport {
    chv: f64,
    cd: f64,
    symbols: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sigma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alphabet: Option<Vec<String>>,
    mode: String,
    matrix: KernelMatrix,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Demo => demo_command(),
        Commands::Weights(args) => weights_command(args),
        Commands::Matrix(args) => matrix_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn demo_command() -> Result<()> {
    println!("=== Gaussian kernel on vectors ===");
    let v1 = vec![0.0, 1.0, 2.0];
    let v2 = vec![0.5, 1.5, 2.5];
    let v3 = vec![3.0, 0.0, 1.0];
    let vectors = vec![v1.clone(), v2.clone(), v3.clone()];
    let gaussian = GaussianKernel::new(1.0)?;
    let k: f64 = gaussian.pair_value(&v1, &v2)?;
    println!("k(v1, v2) = {k:.6}");
    let km: KernelMatrix = gaussian.self_matrix(&vectors)?;
    print_matrix("Self matrix", &km);

    println!("\n=== Delta kernel on labels ===");
    let symbols = SymbolKernel::identity(2)?;
    let labels: Vec<usize> = vec![0, 1, 1, 0];
    let km: KernelMatrix = symbols.self_matrix(&labels)?;
    print_matrix("Self matrix", &km);

    println!("\n=== Path kernel on label sequences ===");
    let path = PathKernel::with_costs(&symbols, 0.3, 0.4)?;
    let s: Vec<usize> = vec![0, 1, 0, 1];
    let t: Vec<usize> = vec![1, 0, 1, 0, 1];
    let k: f64 = path.pair_value(&s, &t)?;
    let ks: f64 = path.self_value(&s)?;
    println!("CHV = {}, CD = {}", path.chv(), path.cd());
    println!("k(abab, babab) = {k:.8}");
    println!("k(abab, abab) = {ks:.8}");

    let normalized = NormalizedKernel::new(&path);
    let kn: f64 = normalized.pair_value(&s, &t)?;
    let d: f64 = distance::distance_value(&path, &s, &t)?;
    println!("normalized k(abab, babab) = {kn:.8}");
    println!("d(abab, babab) = {d:.8}");
    print_matrix("Weight table", &path.weight_matrix());

    println!("\n=== Path kernel on vector sequences ===");
    let vector_path = PathKernel::new(&gaussian);
    let sequences = vec![
        vec![v1.clone(), v2.clone(), v1.clone(), v2.clone()],
        vec![v2.clone(), v1.clone(), v2.clone(), v1, v2],
        vec![v3],
    ];
    let km: KernelMatrix = vector_path.self_matrix(&sequences)?;
    print_matrix("Self matrix", &km);
    let normalized = NormalizedKernel::new(&vector_path);
    let km: KernelMatrix = normalized.self_matrix(&sequences)?;
    print_matrix("Normalized self matrix", &km);

    Ok(())
}

fn weights_command(args: WeightsArgs) -> Result<()> {
    if args.dim == 0 {
        return Err(KernelError::InvalidParameter(
            "dimension must be positive".to_string(),
        ));
    }
    let config = resolve_config(&args.costs)?;
    info!(
        "Weight table: dim={}, CHV={}, CD={}",
        args.dim, config.chv, config.cd
    );

    // The table does not depend on the symbol kernel
    let symbols = SymbolKernel::identity(1)?;
    let path = PathKernel::with_config(&symbols, &config)?;
    if path.dimension() > 1 {
        info!("Loaded cached table of dimension {}", path.dimension());
    }
    path.ensure_dimension(args.dim);

    for row in path.weight_matrix().iter().take(args.dim) {
        let line: Vec<String> = row
            .iter()
            .take(args.dim)
            .map(|w| format!("{w:.10}"))
            .collect();
        println!("{}", line.join(" "));
    }

    if path.save() {
        if let Some(cache) = path.storage() {
            info!("Saved table to {:?}", cache.record_path(config.chv, config.cd));
        }
    }
    Ok(())
}

fn matrix_command(args: MatrixArgs) -> Result<()> {
    let config = resolve_config(&args.costs)?;
    let mode = if args.normalize {
        MatrixMode::Normalized
    } else if args.distance {
        MatrixMode::Distance
    } else {
        MatrixMode::Raw
    };

    let format = match args.format {
        DataFormat::Auto => detect_format(&args.data),
        format => format,
    };
    info!("Loading {:?} sequences from {:?}", format, args.data);

    let report = match format {
        DataFormat::Text => {
            let (alphabet, dataset) = LabelAlphabet::read_file(&args.data)?;
            label_report(&config, mode, dataset, Some(alphabet))?
        }
        _ => {
            let json = fs::read_to_string(&args.data)?;
            match SequenceDataset::<Vec<f64>>::from_json_str(&json) {
                Ok(dataset) => vector_report(&config, mode, dataset, args.sigma)?,
                Err(KernelError::ParseError(_)) => {
                    let dataset = SequenceDataset::<usize>::from_json_str(&json)?;
                    label_report(&config, mode, dataset, None)?
                }
                Err(e) => return Err(e),
            }
        }
    };

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| KernelError::ParseError(e.to_string()))?;
    if let Some(output_path) = args.output {
        let file = File::create(&output_path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{json}")?;
        writer.flush()?;
        info!("Matrix saved to: {output_path:?}");
    } else {
        println!("{json}");
    }
    Ok(())
}

fn vector_report(
    config: &PathKernelConfig,
    mode: MatrixMode,
    dataset: SequenceDataset<Vec<f64>>,
    sigma: Option<f64>,
) -> Result<MatrixReport> {
    dataset.symbol_dimension()?;
    let sigma = match sigma {
        Some(sigma) => sigma,
        None => {
            let mut rng = rand::thread_rng();
            let chosen = select_sigma(dataset.sequences(), None, &mut rng)?;
            if chosen > 0.0 {
                info!("Selected sigma {chosen} from the data");
                chosen
            } else {
                warn!("Sampled symbols are all identical, using sigma 1");
                1.0
            }
        }
    };
    let gaussian = GaussianKernel::new(sigma)?;
    let matrix = path_matrix(&gaussian, config, mode, dataset.sequences())?;

    Ok(MatrixReport {
        chv: config.chv,
        cd: config.cd,
        symbols: "gaussian".to_string(),
        sigma: Some(sigma),
        alphabet: None,
        mode: mode_name(mode),
        matrix,
    })
}

fn label_report(
    config: &PathKernelConfig,
    mode: MatrixMode,
    dataset: SequenceDataset<usize>,
    alphabet: Option<LabelAlphabet>,
) -> Result<MatrixReport> {
    let n_labels = match &alphabet {
        Some(alphabet) => alphabet.len(),
        None => dataset.sequences().iter().flatten().max().map_or(1, |&l| l + 1),
    };
    let symbols = SymbolKernel::identity(n_labels)?;
    let matrix = path_matrix(&symbols, config, mode, dataset.sequences())?;

    Ok(MatrixReport {
        chv: config.chv,
        cd: config.cd,
        symbols: "delta".to_string(),
        sigma: None,
        alphabet: alphabet.map(|a| {
            (0..a.len())
                .filter_map(|l| a.token(l).map(str::to_string))
                .collect()
        }),
        mode: mode_name(mode),
        matrix,
    })
}

/// Path Kernel self matrix over `sequences`, loading and saving the cache around it
fn path_matrix<S, K>(
    symbols: &K,
    config: &PathKernelConfig,
    mode: MatrixMode,
    sequences: &[Vec<S>],
) -> Result<KernelMatrix>
where
    K: Kernel<S> + ?Sized,
{
    let path = PathKernel::with_config(symbols, config)?;
    info!(
        "Path kernel: CHV={}, CD={}, table dimension {}",
        path.chv(),
        path.cd(),
        path.dimension()
    );

    let matrix: KernelMatrix = match mode {
        MatrixMode::Raw => path.self_matrix(sequences)?,
        MatrixMode::Normalized => NormalizedKernel::new(&path).self_matrix(sequences)?,
        MatrixMode::Distance => distance::distance_self_matrix(&path, sequences)?,
    };

    if path.save() {
        info!("Saved weight table of dimension {}", path.dimension());
    }
    Ok(matrix)
}

/// Merge the configuration file with command line overrides
fn resolve_config(args: &CostArgs) -> Result<PathKernelConfig> {
    let mut config = match &args.config {
        Some(path) => PathKernelConfig::from_file(path)?,
        None => PathKernelConfig::default(),
    };
    if let Some(chv) = args.chv {
        config.chv = chv;
    }
    if let Some(cd) = args.cd {
        config.cd = cd;
    }
    if let Some(location) = &args.cache_dir {
        config.storage = Some(StorageConfig {
            location: location.clone(),
            writable: args.writable,
        });
    } else if args.writable {
        match config.storage.as_mut() {
            Some(storage) => storage.writable = true,
            None => warn!("--writable has no effect without a cache directory"),
        }
    }
    Ok(config)
}

fn mode_name(mode: MatrixMode) -> String {
    match mode {
        MatrixMode::Raw => "kernel",
        MatrixMode::Normalized => "normalized",
        MatrixMode::Distance => "distance",
    }
    .to_string()
}

fn print_matrix(title: &str, matrix: &[Vec<f64>]) {
    println!("{title}:");
    for row in matrix {
        let line: Vec<String> = row.iter().map(|v| format!("{v:10.6}")).collect();
        println!("  {}", line.join(" "));
    }
}

fn detect_format(path: &Path) -> DataFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => DataFormat::Json,
        Some("txt") | Some("seq") => DataFormat::Text,
        Some(_) => {
            warn!("Unknown file extension, assuming text format");
            DataFormat::Text
        }
        None => {
            warn!("No file extension, assuming text format");
            DataFormat::Text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(detect_format(&PathBuf::from("data.json")), DataFormat::Json);
        assert_eq!(detect_format(&PathBuf::from("data.txt")), DataFormat::Text);
        assert_eq!(detect_format(&PathBuf::from("data.seq")), DataFormat::Text);
        assert_eq!(detect_format(&PathBuf::from("data")), DataFormat::Text);
    }

    #[test]
    fn test_resolve_config_overrides() {
        let args = CostArgs {
            config: None,
            chv: Some(0.3),
            cd: None,
            cache_dir: Some(PathBuf::from("/tmp/wmat")),
            writable: true,
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.chv, 0.3);
        assert_eq!(config.cd, pathkernel::DEFAULT_CD);
        let storage = config.storage.unwrap();
        assert_eq!(storage.location, PathBuf::from("/tmp/wmat"));
        assert!(storage.writable);
    }
}
