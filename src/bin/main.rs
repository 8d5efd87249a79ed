//! Blueprint Decoder CLI
//!
//! Batch-process blueprint style collections into style.json documents,
//! or inspect a single blueprint file.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use blueprint_decoder::{
    load_ignore_patterns, BlueprintFile, DecoderConfig, Level, Style, StyleInfo, StyleRun,
};

#[derive(Parser)]
#[command(name = "blueprint-decoder")]
#[command(author, version, about = "Extract building metadata from MineColonies blueprints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process all style collections and write style.json + cache documents
    Build {
        /// Root directory containing <type>/<style> blueprint packs
        #[arg(short, long)]
        blueprints: PathBuf,

        /// Root directory containing per-style image trees
        #[arg(short, long)]
        images: PathBuf,

        /// Directory for per-style cache documents
        #[arg(short, long)]
        cache_dir: PathBuf,

        /// File listing styles to publish, one "<type>/<name>" per line.
        /// When omitted, every pack found under the blueprints root is used.
        #[arg(short, long)]
        styles: Option<PathBuf>,

        /// Ignore-pattern file (one anchored regex per line, '#' comments)
        #[arg(long)]
        ignore: Option<PathBuf>,

        /// Aggregated style summary document to read and rewrite
        #[arg(long, default_value = "styles.json")]
        style_info: PathBuf,

        /// Where to list packs on disk that are not published
        #[arg(long)]
        missing_styles: Option<PathBuf>,
    },

    /// Decode one blueprint file and print its metadata
    Info {
        /// Path to a .blueprint file
        file: PathBuf,
    },
}

/// The aggregated `styles.json` document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StyleInfoDoc {
    styles: Vec<StyleInfo>,
    categories: Vec<String>,
}

/// Entry in the missing-styles listing.
#[derive(Debug, Serialize)]
struct MissingStyle {
    name: String,
    #[serde(rename = "displayName")]
    display_name: String,
    authors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PackMeta {
    name: String,
    authors: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            blueprints,
            images,
            cache_dir,
            styles,
            ignore,
            style_info,
            missing_styles,
        } => build(
            &blueprints,
            &images,
            &cache_dir,
            styles.as_deref(),
            ignore.as_deref(),
            &style_info,
            missing_styles.as_deref(),
        ),
        Commands::Info { file } => show_info(&file),
    }
}

#[allow(clippy::too_many_arguments)]
fn build(
    blueprints: &Path,
    images: &Path,
    cache_dir: &Path,
    styles_file: Option<&Path>,
    ignore_file: Option<&Path>,
    style_info_path: &Path,
    missing_styles_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let specs = match styles_file {
        Some(path) => read_style_list(path)?,
        None => discover_styles(blueprints)?,
    };

    let ignore = match ignore_file {
        Some(path) => load_ignore_patterns(path)?,
        None => None,
    };

    let mut styles = Vec::new();
    for (style_type, dir_name) in &specs {
        match Style::open(blueprints, images, cache_dir, style_type, dir_name) {
            Ok(style) => styles.push(style),
            Err(e) => error!("cannot open style {style_type}/{dir_name}: {e}"),
        }
    }

    info!("processing {} styles...", styles.len());
    let start = std::time::Instant::now();
    let config = DecoderConfig::default();
    // The collect is the join barrier: aggregation below sees every style.
    let runs: Vec<StyleRun> = styles
        .par_iter()
        .filter_map(|style| {
            info!("processing style: {}", style.dir_name());
            match style.run(&config, ignore.as_ref()) {
                Ok(run) => Some(run),
                Err(e) => {
                    error!("style {} failed: {e}", style.dir_name());
                    None
                }
            }
        })
        .collect();
    info!(
        "processed {} styles in {:.2}s",
        runs.len(),
        start.elapsed().as_secs_f32()
    );

    write_style_infos(style_info_path, runs)?;

    if let Some(path) = missing_styles_path {
        let published: BTreeSet<&str> = specs.iter().map(|(_, name)| name.as_str()).collect();
        write_missing_styles(path, blueprints, &published)?;
    }

    Ok(())
}

/// Rewrite the aggregated styles.json, preserving each style's original
/// `addedAt` and stamping today's date on styles seen for the first time.
fn write_style_infos(
    path: &Path,
    runs: Vec<StyleRun>,
) -> Result<(), Box<dyn std::error::Error>> {
    let previous: StyleInfoDoc = std::fs::read_to_string(path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default();

    let mut categories = BTreeSet::new();
    let mut infos = Vec::with_capacity(runs.len());
    for run in runs {
        categories.extend(run.root_categories);
        let mut info = run.info;
        let prev = previous.styles.iter().find(|s| s.name == info.name);
        info.added_at = match prev.and_then(|s| s.added_at.clone()) {
            Some(added) => Some(added),
            None if prev.is_none() => {
                Some(chrono::Local::now().format("%Y-%m-%d").to_string())
            }
            None => None,
        };
        infos.push(info);
    }
    infos.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    let doc = StyleInfoDoc {
        styles: infos,
        categories: categories.into_iter().collect(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}

/// List every pack directory on disk that is not in the published set.
fn write_missing_styles(
    path: &Path,
    blueprints: &Path,
    published: &BTreeSet<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut missing = Vec::new();
    for (style_type, dir_name) in discover_styles(blueprints)? {
        if published.contains(dir_name.as_str()) {
            continue;
        }
        let meta_path = blueprints.join(&style_type).join(&dir_name).join("pack.json");
        let meta: PackMeta = match std::fs::read_to_string(&meta_path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
        {
            Ok(meta) => meta,
            Err(e) => {
                warn!("no usable pack meta for 'missing' style {dir_name}: {e}");
                continue;
            }
        };
        missing.push(MissingStyle {
            name: dir_name,
            display_name: meta.name,
            authors: meta.authors,
        });
    }
    missing.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    std::fs::write(path, serde_json::to_string_pretty(&missing)?)?;
    Ok(())
}

/// Parse a style list file: one "<type>/<name>" per line, '#' comments.
fn read_style_list(path: &Path) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
    let mut specs = Vec::new();
    for line in std::fs::read_to_string(path)?.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('/') {
            Some((style_type, name)) => specs.push((style_type.to_string(), name.to_string())),
            None => warn!("ignoring malformed style spec: {line}"),
        }
    }
    Ok(specs)
}

/// Find every `<type>/<style>` directory carrying a pack.json.
fn discover_styles(blueprints: &Path) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
    let mut specs = Vec::new();
    for type_entry in std::fs::read_dir(blueprints)? {
        let type_entry = type_entry?;
        if !type_entry.path().is_dir() {
            continue;
        }
        let style_type = type_entry.file_name().to_string_lossy().into_owned();
        for style_entry in std::fs::read_dir(type_entry.path())? {
            let style_entry = style_entry?;
            if style_entry.path().join("pack.json").is_file() {
                let name = style_entry.file_name().to_string_lossy().into_owned();
                specs.push((style_type.clone(), name));
            }
        }
    }
    specs.sort();
    Ok(specs)
}

fn show_info(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = DecoderConfig::default();
    let file = BlueprintFile::open(path)?;

    println!("file:   {}", path.display());
    println!("sha256: {}", file.content_hash());

    let (name, level) = file.name_and_level(&config)?;
    println!("name:   {name}");
    match level {
        Level::At(n) => println!("level:  {n}"),
        Level::None => println!("level:  none"),
    }

    let size = file.size(&config)?;
    println!("size:   {}x{}x{} (w x h x d)", size.x, size.y, size.z);

    let huts = file.hut_blocks(&config)?;
    if huts.is_empty() {
        println!("huts:   none");
    } else {
        println!("huts:   {}", huts.join(", "));
    }

    Ok(())
}
