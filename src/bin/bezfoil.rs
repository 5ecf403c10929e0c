//! Command line front end for importing Bezier airfoil profiles and managing the profile store.
//! Imports run against an in-memory design and print the outcome as JSON.

use anyhow::{Context, Result, anyhow, bail};
use bezfoil::airfoil::{ReferenceSelection, parse_with_policy};
use bezfoil::import::{ImportRequest, MemoryDesign, ProfileSource, import};
use bezfoil::store::{AirfoilStore, list_sorted_names_or_empty};
use bezfoil::{DegreePolicy, ImportConfig, Point3, Segment3};
use std::path::{Path, PathBuf};

const USAGE: &str = "\
usage: bezfoil [--config <path>] <command> [options]

commands:
  import <file> --suffix <s> [--drive <name>=<value>] [--tail-gap <len>] [selection] [--save]
  import-stored <name> --suffix <s> [--drive <name>=<value>] [--tail-gap <len>] [selection]
  store-add <file> [--name <n>]
  delete <name>
  list

selection:
  --nose x,y[,z] [--tail x,y[,z]]
  --chord x,y[,z]:x,y[,z] --perp x,y[,z]:x,y[,z]";

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    if let Err(e) = run(std::env::args().skip(1).collect()) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

/// Parsed command line options shared by the commands
#[derive(Default)]
struct Options {
    positional: Vec<String>,
    config: Option<PathBuf>,
    suffix: Option<String>,
    drive: Option<String>,
    tail_gap: Option<String>,
    nose: Option<String>,
    tail: Option<String>,
    chord: Option<String>,
    perp: Option<String>,
    name: Option<String>,
    save: bool,
}

impl Options {
    fn parse(args: Vec<String>) -> Result<Self> {
        let mut options = Options::default();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .ok_or_else(|| anyhow!("missing value for {}", flag))
            };
            match arg.as_str() {
                "--config" => options.config = Some(PathBuf::from(value(&arg)?)),
                "--suffix" => options.suffix = Some(value(&arg)?),
                "--drive" => options.drive = Some(value(&arg)?),
                "--tail-gap" => options.tail_gap = Some(value(&arg)?),
                "--nose" => options.nose = Some(value(&arg)?),
                "--tail" => options.tail = Some(value(&arg)?),
                "--chord" => options.chord = Some(value(&arg)?),
                "--perp" => options.perp = Some(value(&arg)?),
                "--name" => options.name = Some(value(&arg)?),
                "--save" => options.save = true,
                "-h" | "--help" => bail!("{}", USAGE),
                flag if flag.starts_with("--") => bail!("unknown option {}\n\n{}", flag, USAGE),
                _ => options.positional.push(arg.clone()),
            }
        }
        Ok(options)
    }

    fn selection(&self) -> Result<ReferenceSelection> {
        match (&self.nose, &self.tail, &self.chord, &self.perp) {
            (None, None, None, None) => Ok(ReferenceSelection::Origin),
            (Some(nose), None, None, None) => Ok(ReferenceSelection::Nose(parse_point(nose)?)),
            (Some(nose), Some(tail), None, None) => Ok(ReferenceSelection::NoseTail(
                parse_point(nose)?,
                parse_point(tail)?,
            )),
            (None, None, Some(chord), Some(perp)) => Ok(ReferenceSelection::Lines {
                chord: parse_segment(chord)?,
                perp: parse_segment(perp)?,
            }),
            _ => bail!("select nothing, --nose, --nose with --tail, or --chord with --perp"),
        }
    }

    fn request(&self, source: ProfileSource, design: &mut MemoryDesign) -> Result<ImportRequest> {
        let suffix = self
            .suffix
            .as_deref()
            .context("an import needs a --suffix")?;
        let mut request = ImportRequest::new(source, suffix);
        request.selection = self.selection()?;

        if let Some(gap) = &self.tail_gap {
            request.tail_gap = gap
                .parse()
                .with_context(|| format!("tail gap '{}' is not a number", gap))?;
        }

        if let Some(drive) = &self.drive {
            let (name, value) = drive
                .split_once('=')
                .with_context(|| format!("driving parameter '{}' is not <name>=<value>", drive))?;
            let value: f64 = value
                .parse()
                .with_context(|| format!("driving value '{}' is not a number", value))?;
            design.set_parameter(name, value);
            request.driving = Some(name.to_string());
        }

        Ok(request)
    }
}

fn parse_point(text: &str) -> Result<Point3> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("point '{}' is not a list of numbers", text))?;
    match values.as_slice() {
        [x, y] => Ok(Point3::new(*x, *y, 0.0)),
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        _ => bail!("point '{}' needs 2 or 3 coordinates", text),
    }
}

fn parse_segment(text: &str) -> Result<Segment3> {
    let (a, b) = text
        .split_once(':')
        .with_context(|| format!("line '{}' is not <point>:<point>", text))?;
    Ok(Segment3::new(parse_point(a)?, parse_point(b)?))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

fn open_store(config: &ImportConfig) -> Result<AirfoilStore> {
    let path = config.resolved_store_path();
    AirfoilStore::open(&path)
        .with_context(|| format!("cannot open profile store {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: Vec<String>) -> Result<()> {
    let options = Options::parse(args)?;
    let config = match &options.config {
        Some(path) => ImportConfig::load_from_file(path),
        None => ImportConfig::default(),
    };

    let Some((command, rest)) = options.positional.split_first() else {
        bail!("{}", USAGE);
    };

    match (command.as_str(), rest) {
        ("import", [file]) => {
            let path = PathBuf::from(file);
            let text = read_text(&path)?;
            let mut design = MemoryDesign::default();
            let source = ProfileSource::Text {
                text: text.clone(),
                name: None,
            };
            let request = options.request(source, &mut design)?;
            let outcome = import(request, &mut design, None, &config)
                .with_context(|| format!("import of {} failed", path.display()))?;

            if options.save {
                let name = options
                    .name
                    .clone()
                    .or_else(|| file_stem(&path))
                    .unwrap_or_else(|| outcome.profile_name.clone());
                let mut store = open_store(&config)?;
                let parsed = parse_with_policy(&text, DegreePolicy::Strict, 9)
                    .context("only degree 9 profiles can be stored")?;
                store.upsert(&name, &parsed.profile.to_raw_pairs())?;
            }
            print_json(&outcome)
        }
        ("import-stored", [name]) => {
            let store = open_store(&config)?;
            let mut design = MemoryDesign::default();
            let request = options.request(ProfileSource::Stored(name.clone()), &mut design)?;
            let outcome = import(request, &mut design, Some(&store), &config)
                .with_context(|| format!("import of stored profile '{}' failed", name))?;
            print_json(&outcome)
        }
        ("store-add", [file]) => {
            let path = PathBuf::from(file);
            let text = read_text(&path)?;
            let mut store = open_store(&config)?;
            let name = match &options.name {
                Some(name) => {
                    let parsed = parse_with_policy(&text, DegreePolicy::Strict, 9)?;
                    store.upsert(name, &parsed.profile.to_raw_pairs())?;
                    name.clone()
                }
                None => store.import_bez(&text)?,
            };
            println!("stored '{}'", name);
            Ok(())
        }
        ("delete", [name]) => {
            let mut store = open_store(&config)?;
            store
                .delete(name)
                .with_context(|| format!("cannot delete '{}'", name))?;
            println!("deleted '{}'", name);
            Ok(())
        }
        ("list", []) => {
            for name in list_sorted_names_or_empty(&config.resolved_store_path()) {
                println!("{}", name);
            }
            Ok(())
        }
        _ => bail!("{}", USAGE),
    }
}
