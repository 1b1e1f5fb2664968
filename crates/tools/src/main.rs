use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use formats::ProjectFile;
use formats::model_scan::UpAxis;
use scene::ProjectState;
use scene::phase::default_phases;
use tools::{
    SettingsOverride, build_scene, load_project, orient_project, scan_into_project,
    span_summaries,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "linework", about = "Transmission-line geometry from tower surveys")]
struct Cli {
    /// Scene scale; phase offsets are multiplied by scale / 50.
    #[arg(long, global = true, env = "LINEWORK_SCALE")]
    scale: Option<f64>,

    /// Metres added to every tower base altitude.
    #[arg(long, global = true, env = "LINEWORK_TOWER_ELEVATION")]
    tower_elevation: Option<f64>,

    /// Pick catenary segment counts from span length.
    #[arg(long, global = true)]
    adaptive_lod: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Writes the assembled scene for a project as JSON.
    Build {
        project: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Auto-rotates towers along their lines and saves the project.
    Orient {
        project: PathBuf,
        /// Write here instead of overwriting the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Prints length, bearing and sag for every span.
    Spans { project: PathBuf },
    /// Sets phase offsets from a glTF tower model and saves the project.
    Scan {
        project: PathBuf,
        model: PathBuf,
        #[arg(long, value_enum)]
        up: Option<Axis>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Prints the default phase set.
    Defaults,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Axis {
    Y,
    Z,
}

impl From<Axis> for UpAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Y => UpAxis::Y,
            Axis::Z => UpAxis::Z,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    let overrides = SettingsOverride {
        scale: cli.scale,
        tower_elevation: cli.tower_elevation,
        adaptive_lod: cli.adaptive_lod,
    };

    match cli.command {
        Command::Build { project, output } => {
            let state = open(&project, &overrides)?;
            let scene = build_scene(&state);
            let json = serde_json::to_string(&scene).map_err(|e| e.to_string())?;
            emit(output, &json)
        }
        Command::Orient { project, output } => {
            let mut state = open(&project, &overrides)?;
            let turned = orient_project(&mut state);
            info!("{turned} tower(s) re-oriented");
            save(&state, output.unwrap_or(project))
        }
        Command::Spans { project } => {
            let state = open(&project, &overrides)?;
            let spans = span_summaries(&state);
            let json = serde_json::to_string_pretty(&spans).map_err(|e| e.to_string())?;
            emit(None, &json)
        }
        Command::Scan {
            project,
            model,
            up,
            output,
        } => {
            let mut state = open(&project, &overrides)?;
            let gltf = fs::read_to_string(&model).map_err(|e| format!("read {model:?}: {e}"))?;
            let applied = scan_into_project(&mut state, &gltf, up.map(UpAxis::from))
                .map_err(|e| format!("{model:?}: {e}"))?;
            info!("{applied} phase(s) updated from {model:?}");
            save(&state, output.unwrap_or(project))
        }
        Command::Defaults => {
            let json =
                serde_json::to_string_pretty(&default_phases()).map_err(|e| e.to_string())?;
            emit(None, &json)
        }
    }
}

fn open(path: &Path, overrides: &SettingsOverride) -> Result<ProjectState, String> {
    let (state, report) = load_project(path, overrides).map_err(|e| format!("{path:?}: {e}"))?;
    if !report.unknown_hidden.is_empty() {
        info!("{} hidden tower name(s) not found", report.unknown_hidden.len());
    }
    Ok(state)
}

fn save(state: &ProjectState, path: PathBuf) -> Result<(), String> {
    ProjectFile::from_project(state)
        .and_then(|file| file.save(&path))
        .map_err(|e| format!("write {path:?}: {e}"))
}

fn emit(output: Option<PathBuf>, json: &str) -> Result<(), String> {
    match output {
        Some(path) => fs::write(&path, json).map_err(|e| format!("write {path:?}: {e}")),
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{json}").map_err(|e| e.to_string())
        }
    }
}
