use clap::{Parser, Subcommand};
use querypix::config::{self, DEFAULT_CONFIG_FILE};
use querypix::context::LogLogger;
use querypix::engine::{RustEngine, load_image, save_image};
use querypix::output;
use querypix::pipeline::Pipeline;
use querypix::query::SearchParams;
use querypix::transforms::ImageTransform;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "querypix")]
#[command(about = "Apply query-string image transforms")]
#[command(long_about = "\
Apply query-string image transforms

A query such as `width=400&median=3&hue=90` is turned into an ordered list
of transforms. Unknown keys and invalid values are ignored; they only ever
remove their own transform.

Built-in transforms, in application order:

  resize      width (w), height (h), kernel
  rotate      rotate           clockwise degrees
  flip/flop   flip, flop       vertical / horizontal mirror
  median      median           window size
  blur        blur             sigma, or empty for the default
  hsb         hue, saturation, brightness
  grayscale   grayscale
  invert      invert

Set RUST_LOG=querypix=debug to see which values were ignored.
Run 'querypix gen-config' to generate a documented querypix.toml.")]
#[command(version)]
struct Cli {
    /// Pipeline config file (missing file means stock defaults)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log every applied and ignored transform
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transform a single image
    Apply {
        input: PathBuf,
        output: PathBuf,
        /// Query string, e.g. "width=400&blur=2"
        #[arg(short, long, default_value = "")]
        query: String,
        /// Extra parameter appended to the query
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
        /// Print the metadata record as JSON instead of a summary
        #[arg(long)]
        metadata: bool,
    },
    /// Apply one query to many images in parallel
    Batch {
        query: String,
        output_dir: PathBuf,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Show which transforms a query would run
    Plan {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print a stock querypix.toml with all options documented
    GenConfig,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        None if !raw.is_empty() => Ok((raw.to_string(), String::new())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.config)?;
    let pipeline = Pipeline::from_config(&site_config)?;
    let engine = RustEngine::new();
    let logger = LogLogger;

    match cli.command {
        Command::Apply {
            input,
            output: target,
            query,
            params,
            metadata,
        } => {
            let mut search = SearchParams::parse(&query);
            for (key, value) in params {
                search.append(key, value);
            }
            let image = load_image(&input)?;
            let result = pipeline.run(&search, image, &engine, &logger)?;
            save_image(&result.image, &target)?;
            if metadata {
                println!("{}", serde_json::to_string_pretty(&result.metadata)?);
            } else {
                output::print_result(&input, &target, &result);
            }
        }
        Command::Batch {
            query,
            output_dir,
            inputs,
        } => {
            init_thread_pool(&site_config.processing);
            std::fs::create_dir_all(&output_dir)?;
            let search = SearchParams::parse(&query);

            let mut failed = 0;
            let mut loaded = Vec::new();
            for input in inputs {
                match load_image(&input) {
                    Ok(image) => loaded.push((input, image)),
                    Err(e) => {
                        failed += 1;
                        output::print_failure(&input, &e);
                    }
                }
            }

            let (paths, requests): (Vec<_>, Vec<_>) = loaded
                .into_iter()
                .map(|(path, image)| (path, (search.clone(), image)))
                .unzip();
            let results = pipeline.process_batch(requests, &engine, &logger);

            let mut succeeded = 0;
            for (input, result) in paths.iter().zip(results) {
                let target = output_path(&output_dir, input);
                let saved = result.and_then(|r| save_image(&r.image, &target).map(|()| r));
                match saved {
                    Ok(r) => {
                        succeeded += 1;
                        output::print_result(input, &target, &r);
                    }
                    Err(e) => {
                        failed += 1;
                        output::print_failure(input, &e);
                    }
                }
            }
            println!("{}", output::format_batch_summary(succeeded, failed));
            if failed > 0 {
                return Err(format!("{failed} image(s) failed").into());
            }
        }
        Command::Plan { query } => {
            let planned = pipeline.plan(&SearchParams::parse(&query), &logger);
            let names: Vec<_> = planned.iter().map(ImageTransform::name).collect();
            output::print_plan(&names);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Route `log` records to stderr. `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "querypix=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Output file for `input` inside `dir`, keeping the file name.
fn output_path(dir: &Path, input: &Path) -> PathBuf {
    match input.file_name() {
        Some(name) => dir.join(name),
        None => dir.join("output.png"),
    }
}
