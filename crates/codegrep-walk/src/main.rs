//! codegrep-walk: print the files codegrep would search.
//!
//! Usage:
//!   codegrep-walk [OPTIONS] [ROOT]     # Walk ROOT (default: .)
//!   codegrep-walk --languages          # List known languages
//!
//! Settings come from `~/.config/codegrep/walker.toml` unless `--config` is
//! given; command-line options are applied on top.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use codegrep_walker::{WalkSettings, Walker};
use futures::StreamExt;
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var); stdout is for paths.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    root: Option<PathBuf>,
    config: Option<PathBuf>,
    max_depth: Option<usize>,
    hidden: bool,
    no_ignore: bool,
    types: Vec<String>,
    exclude_types: Vec<String>,
    extensions: Vec<String>,
    ignores: Vec<String>,
    common: Vec<String>,
    stats: bool,
    languages: bool,
}

enum Parsed {
    Run(Args),
    Help,
    Version,
}

fn parse_args(args: &[String]) -> Result<Parsed> {
    let mut parsed = Args::default();

    for arg in args {
        let (flag, value) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (arg.as_str(), None),
        };
        let require = || value.with_context(|| format!("{flag} requires a value ({flag}=...)"));

        match flag {
            "-h" | "--help" => return Ok(Parsed::Help),
            "-V" | "--version" => return Ok(Parsed::Version),
            "--config" => parsed.config = Some(PathBuf::from(require()?)),
            "--max-depth" => {
                let depth = require()?;
                parsed.max_depth = Some(
                    depth
                        .parse()
                        .with_context(|| format!("Invalid --max-depth: {depth}"))?,
                );
            }
            "--hidden" => parsed.hidden = true,
            "--no-ignore" => parsed.no_ignore = true,
            "--type" => parsed.types.push(require()?.to_string()),
            "--exclude-type" => parsed.exclude_types.push(require()?.to_string()),
            "--ext" => parsed.extensions.push(require()?.to_string()),
            "--ignore" => parsed.ignores.push(require()?.to_string()),
            "--common" => parsed.common.push(require()?.to_string()),
            "--stats" => parsed.stats = true,
            "--languages" => parsed.languages = true,
            unknown if unknown.starts_with('-') => {
                bail!("Unknown option: {unknown}\nRun 'codegrep-walk --help' for usage.")
            }
            path => {
                if parsed.root.replace(PathBuf::from(path)).is_some() {
                    bail!("Only one root may be given");
                }
            }
        }
    }

    Ok(Parsed::Run(parsed))
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();

    let args = match parse_args(&args)? {
        Parsed::Help => {
            print_help();
            return Ok(ExitCode::SUCCESS);
        }
        Parsed::Version => {
            println!("codegrep-walk {}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }
        Parsed::Run(args) => args,
    };

    let mut settings = match &args.config {
        Some(path) => WalkSettings::load_from(path)?,
        None => WalkSettings::load()?,
    };
    apply_args(&mut settings, &args);

    let config = settings.walk_config()?;
    let walker = Walker::new(config);

    if args.languages {
        for name in walker.classifier().supported_languages() {
            let extensions = walker
                .classifier()
                .language_extensions(&name)
                .unwrap_or_default();
            println!("{name}: {}", extensions.join(" "));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    runtime.block_on(walk(&walker, root, args.stats))
}

fn apply_args(settings: &mut WalkSettings, args: &Args) {
    if let Some(depth) = args.max_depth {
        settings.walk.max_depth = depth;
    }
    if args.hidden {
        settings.walk.include_hidden = true;
    }
    if args.no_ignore {
        settings.ignore.enabled = false;
    }
    settings.filters.include_types.extend(args.types.iter().cloned());
    settings.filters.exclude_types.extend(args.exclude_types.iter().cloned());
    settings.filters.include_extensions.extend(args.extensions.iter().cloned());
    settings.ignore.patterns.extend(args.ignores.iter().cloned());
    settings.ignore.common.extend(args.common.iter().cloned());
}

async fn walk(walker: &Walker, root: PathBuf, show_stats: bool) -> Result<ExitCode> {
    let cancel = walker.config().cancel.clone();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupted, cancelling walk");
                cancel.cancel();
            }
        }
    });

    let mut stream = walker
        .walk(&root)
        .await
        .with_context(|| format!("Failed to walk {}", root.display()))?;

    let mut out = io::stdout().lock();
    let mut had_errors = false;
    while let Some(result) = stream.next().await {
        if let Some(err) = &result.error {
            had_errors = true;
            eprintln!("{}: {err}", result.path.display());
            continue;
        }
        if writeln!(out, "{}", result.rel_path.display()).is_err() {
            // Reader went away (e.g. `| head`).
            cancel.cancel();
            break;
        }
    }
    out.flush().ok();

    if show_stats {
        let stats = walker.stats();
        eprintln!(
            "{} files ({} bytes), {} filtered, {} dirs, {} dirs ignored, {} symlinks, {} errors in {:?}",
            stats.files_found,
            stats.bytes_traversed,
            stats.files_filtered,
            stats.dirs_traversed,
            stats.dirs_ignored,
            stats.symlinks_found,
            stats.errors,
            stats.duration,
        );
    }

    Ok(if had_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_help() {
    println!(
        r#"codegrep-walk v{}

Usage:
  codegrep-walk [OPTIONS] [ROOT]   Print files under ROOT (default: .)

Options:
  --config=<path>                  Settings file (default: ~/.config/codegrep/walker.toml)
  --max-depth=<n>                  Limit depth below ROOT (0 = unlimited)
  --hidden                         Include dot files and dot directories
  --no-ignore                      Do not honor .gitignore/.rgignore rules
  --type=<lang>                    Only files of this language (repeatable)
  --exclude-type=<lang>            Skip files of this language (repeatable)
  --ext=<ext>                      Only files with this extension (repeatable)
  --ignore=<glob>                  Extra gitignore-style rule (repeatable)
  --common=<tag>                   Built-in ignore set: go, node, python, java, rust, common
  --stats                          Print walk statistics to stderr
  --languages                      List known languages and exit
  -h, --help                       Show this help
  -V, --version                    Show version

Examples:
  codegrep-walk                    # Everything codegrep would search here
  codegrep-walk --type=rust src    # Rust files under src/
  codegrep-walk --common=node web  # Skip node_modules, dist, ...
"#,
        env!("CARGO_PKG_VERSION")
    );
}
