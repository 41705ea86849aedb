use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use autosweep_core::*;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use flexi_logger::{LogSpecification, Logger};
use serde::Serialize;

use render::{Renderer, describe};

mod render;

const CONFIG_ERROR: u8 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::beginner(),
            Self::Intermediate => GameConfig::intermediate(),
            Self::Expert => GameConfig::expert(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Plays minesweeper from the first click to the end", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Board to start from, field by field overridden by the size options
    #[arg(short, long, value_enum, default_value_t = Preset::Beginner)]
    preset: Preset,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    height: Option<Coord>,

    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Force a seed instead of one drawn from the clock
    #[arg(short, long)]
    seed: Option<u64>,

    /// Lose the game on a flag placed over a safe cell
    #[arg(long)]
    validate_flags: bool,

    /// Print the seed, report and final board as JSON
    #[arg(long)]
    json: bool,

    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn game_config(&self) -> autosweep_core::Result<GameConfig> {
        let preset = self.preset.config();
        let size = (
            self.width.unwrap_or(preset.size.0),
            self.height.unwrap_or(preset.size.1),
        );
        let config = GameConfig::new(size, self.mines.unwrap_or(preset.mines))?;
        Ok(if self.validate_flags {
            config.with_flag_policy(FlagPolicy::Validating)
        } else {
            config
        })
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    seed: u64,
    config: &'a GameConfig,
    report: &'a SolveReport,
    snapshot: &'a Snapshot,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let _logger = Logger::with(
        LogSpecification::builder()
            .default(args.verbose.log_level_filter())
            .build(),
    )
    .format(flexi_logger::colored_default_format)
    .start()
    .context("Could not start logger")?;

    let config = match args.game_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(ExitCode::from(CONFIG_ERROR));
        }
    };
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {seed}, config: {config:?}");

    let mut game = Game::new(&config, RandomMinefieldGenerator::new(seed))?;
    let report = Solver::default().solve(&mut game)?;
    let snapshot = Snapshot::from_game(&game);

    if args.json {
        let output = JsonOutput {
            seed,
            config: &config,
            report: &report,
            snapshot: &snapshot,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let renderer = Renderer::new(!args.no_color);
        println!("Seed: {seed}");
        println!("{}", renderer.summary(&snapshot));
        println!("{}", renderer.board(&snapshot));
        println!("{}", describe(report.outcome, report.passes));
    }

    Ok(if report.outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
