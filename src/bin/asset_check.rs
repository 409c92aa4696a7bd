//! Run the asset loader against a local copy of the served files.
//!
//! Examples:
//!   asset-check manifest.json
//!   asset-check --root public --concurrent manifest.json
//!   asset-check --config boot.json manifest.json
//!
//! Every manifest URL is resolved under `--root` (default: current directory)
//! exactly as the page would request it. Exits non-zero if any asset fails.

use std::process;

use asset_bootstrap::fetch::DirFetcher;
use asset_bootstrap::{AssetLoader, AssetManifest, AssetMap, BootConfig, FetchMode, Page};

/// Page stand-in: the error element is stderr, the status element is a log line.
struct TerminalPage {
    config: BootConfig,
}

impl Page for TerminalPage {
    fn set_element_text(&self, id: &str, text: &str) -> bool {
        if id == self.config.error_element_id {
            eprintln!("{text}");
        } else {
            log::info!("[{id}] {text}");
        }
        true
    }
}

struct Args {
    root: String,
    config: Option<String>,
    concurrent: bool,
    manifest: String,
}

fn usage() -> ! {
    eprintln!("asset-check (loads every asset in a manifest from a local directory)");
    eprintln!("Usage: asset-check [--root DIR] [--config FILE] [--concurrent] <manifest.json>\n");
    eprintln!("Options:");
    eprintln!("  --root DIR       Directory the page is served from (default: .)");
    eprintln!("  --config FILE    Bootstrap config json (fetch_mode, log_level, ...)");
    eprintln!("  --concurrent     Issue every fetch at once instead of one by one");
    process::exit(1);
}

fn parse_args() -> Args {
    let mut args = std::env::args().skip(1);
    let mut root = ".".to_string();
    let mut config = None;
    let mut concurrent = false;
    let mut manifest = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root" => root = args.next().unwrap_or_else(|| usage()),
            "--config" => config = Some(args.next().unwrap_or_else(|| usage())),
            "--concurrent" => concurrent = true,
            "-h" | "--help" => usage(),
            _ if manifest.is_none() && !arg.starts_with("--") => manifest = Some(arg),
            _ => usage(),
        }
    }

    Args {
        root,
        config,
        concurrent,
        manifest: manifest.unwrap_or_else(|| usage()),
    }
}

fn read_file(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {path}: {e}");
        process::exit(1);
    })
}

fn main() {
    let args = parse_args();

    let mut config = match &args.config {
        Some(path) => BootConfig::from_json(&read_file(path)).unwrap_or_else(|e| {
            eprintln!("Bad config {path}: {e}");
            process::exit(1);
        }),
        None => BootConfig::default(),
    };
    if args.concurrent {
        config.fetch_mode = FetchMode::Concurrent;
    }

    env_logger::Builder::new()
        .filter_level(config.level_filter())
        .parse_default_env()
        .init();

    let manifest = AssetManifest::from_json(&read_file(&args.manifest)).unwrap_or_else(|e| {
        eprintln!("Bad manifest {}: {e}", args.manifest);
        process::exit(1);
    });

    let page = TerminalPage {
        config: config.clone(),
    };
    let loader = AssetLoader::new(DirFetcher::new(&args.root), page, config);

    let print_sizes = |map: AssetMap| {
        for (name, value) in map.iter() {
            let len = value.as_bytes().map(<[u8]>::len).unwrap_or(0);
            println!("{name:<24} {len:>10} bytes");
        }
    };

    if futures::executor::block_on(loader.run(manifest.to_asset_map(), print_sizes)).is_err() {
        process::exit(1);
    }
}
