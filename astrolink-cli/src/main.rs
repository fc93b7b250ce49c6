mod viewer;

use astrolink_core::diagnostics::{format_diagnostic, format_parse_error};
use astrolink_core::{
    analyze_scenario, build_simulation_context, build_simulation_context_from_source,
    default_scenario, parse_scenario, run_context, SimulationContext,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use viewer::ViewerApp;

#[derive(Parser)]
#[command(name = "astrolink")]
#[command(about = "astrolink - gravity toy with a wormhole pair", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario headless and print the final body states
    Run {
        /// Path to a scenario file; the built-in scene is used when omitted
        file: Option<PathBuf>,
        /// Number of ticks to simulate
        #[arg(long, default_value_t = 600)]
        ticks: u64,
        /// Fixed tick length in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
    },
    /// Parse and analyze a scenario file, printing diagnostics
    Check {
        /// Path to the scenario file
        file: PathBuf,
    },
    /// Open the interactive viewer
    View {
        /// Path to a scenario file, reloaded on change
        file: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { file, ticks, dt } => run_file(file.as_deref(), ticks, dt),
        Commands::Check { file } => check_file(&file),
        Commands::View { file } => view_file(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("astrolink=info".parse()?)
                .add_directive("astrolink_core=info".parse()?),
        )
        .try_init()?;
    Ok(())
}

fn load_context(file: Option<&Path>) -> Result<SimulationContext, Box<dyn std::error::Error>> {
    match file {
        Some(path) => {
            let source = fs::read_to_string(path)?;
            let (ctx, diagnostics) = build_simulation_context_from_source(&source)?;
            for warning in diagnostics.warnings() {
                eprintln!("{}", format_diagnostic(warning, &source));
            }
            Ok(ctx)
        }
        None => Ok(build_simulation_context(&default_scenario())?),
    }
}

fn run_file(file: Option<&Path>, ticks: u64, dt: f32) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = load_context(file)?;
    let result = run_context(&mut ctx, ticks, dt)?;

    println!("ticks = {}", result.ticks);
    for body in result.bodies {
        println!(
            "{} = ({:.4}, {:.4}, {:.4}) transit_energy = {:.2}",
            body.id, body.position.x, body.position.y, body.position.z, body.transit_energy
        );
    }
    println!(
        "camera eye = ({:.4}, {:.4}, {:.4}) aim = ({:.4}, {:.4}, {:.4})",
        result.camera.eye.x,
        result.camera.eye.y,
        result.camera.eye.z,
        result.camera.aim.x,
        result.camera.aim.y,
        result.camera.aim.z
    );

    Ok(())
}

fn check_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let scenario = match parse_scenario(&source) {
        Ok(scenario) => scenario,
        Err(e) => return Err(format_parse_error(&e, &source).into()),
    };

    let diagnostics = analyze_scenario(&scenario);
    for diagnostic in diagnostics.iter() {
        println!("{}", format_diagnostic(diagnostic, &source));
    }

    if diagnostics.has_errors() {
        return Err(format!("{} error(s) found", diagnostics.errors().count()).into());
    }
    println!(
        "ok: {} bodies, {} wormhole",
        scenario.bodies.len(),
        scenario.wormholes.len()
    );
    Ok(())
}

fn view_file(file: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "astrolink",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(file, cc)))),
    )?;
    Ok(())
}
