use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use log::info;

use lox_bytecode::config::{self, Config};
use lox_bytecode::debug::{self, Disassembled};
use lox_bytecode::demo;
use lox_bytecode::{Chunk, ChunkImage};

#[derive(Parser)]
#[command(name = "lox")]
#[command(about = "Lox bytecode chunk builder & disassembler", version, long_about = None)]
struct Cli {
    /// Fichier de configuration (défaut : ./lox.toml s'il existe)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosité des logs (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Construit le chunk de démonstration et affiche son désassemblage
    Demo {
        /// Affiche les instructions décodées en JSON
        #[arg(long)]
        json: bool,
    },

    /// Désassemble une image de chunk (JSON : code, lines, constants)
    Disasm {
        /// Le chemin de l'image
        file: PathBuf,

        /// Titre du listing (défaut : nom du fichier)
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG garde la priorité sur -v
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = config::load_config(cli.config.as_deref()).map_err(|e| e.to_string())?;
    info!("growth policy: {:?}", config.chunk.growth_policy());

    match &cli.command {
        Some(Commands::Demo { json }) => run_demo(&config, *json),
        None => run_demo(&config, false),
        Some(Commands::Disasm { file, name, json }) => {
            run_disasm(&config, file, name.as_deref(), *json)
        }
    }
}

fn run_demo(config: &Config, json: bool) -> Result<(), String> {
    info!("running demo");
    let mut chunk = demo::demo_chunk(config.chunk.growth_policy()).map_err(|e| e.to_string())?;
    emit(&chunk, demo::DEMO_NAME, config, json)?;
    chunk.free();
    Ok(())
}

fn run_disasm(config: &Config, file: &Path, name: Option<&str>, json: bool) -> Result<(), String> {
    info!("disassembling {}", file.display());

    let content = fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
    let image: ChunkImage = serde_json::from_str(&content)
        .map_err(|e| format!("invalid chunk image {}: {}", file.display(), e))?;
    let chunk = Chunk::from_image(&image, config.chunk.growth_policy()).map_err(|e| e.to_string())?;

    let default_name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    emit(&chunk, name.unwrap_or(&default_name), config, json)
}

fn emit(chunk: &Chunk, name: &str, config: &Config, json: bool) -> Result<(), String> {
    if json {
        let entries: Vec<Disassembled> = chunk.instructions().collect();
        let out = serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }

    debug::print_chunk(chunk, name, &config.disassembler).map_err(|e| e.to_string())
}
