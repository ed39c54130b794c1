use std::ops::Range;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use settle_core::Piece;
use settle_engine::{Game, GameConfig, PieceRule, TickOutcome};
use settle_search::{Solver, SolverConfig, SolverStats, Step};
use tracing::{debug, info, Level};
use tracing_subscriber::prelude::*;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum Rule {
    Uniform,
    SevenBag,
}

impl From<Rule> for PieceRule {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Uniform => PieceRule::Uniform,
            Rule::SevenBag => PieceRule::SevenBag,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "autoplay", about = "Let the placement search play line-clearing games")]
struct Cli {
    #[arg(long, default_value_t = 500, help = "Stop each game after this many locked pieces")]
    pieces: u64,

    #[arg(long, default_value_t = 1, help = "Independent games, seeded seed..seed+games")]
    games: u64,

    #[arg(long, default_value_t = 0, help = "Seed of the first game")]
    seed: u64,

    #[arg(
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(1..=4),
        help = "Pieces considered per search, live piece included"
    )]
    lookahead: u8,

    #[arg(long, value_enum, default_value_t = Rule::Uniform, help = "How upcoming pieces are drawn")]
    rule: Rule,

    #[arg(long, value_name = "MS", help = "Draw every frame, pausing MS milliseconds (single game only)")]
    render: Option<u64>,

    #[arg(long, help = "Print the summary as JSON")]
    json: bool,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct GameSummary {
    seed: u64,
    pieces: u64,
    lines: u32,
    topped_out: bool,
    solver: SolverStats,
}

#[derive(Debug, Serialize)]
struct Report {
    lookahead: usize,
    rule: PieceRule,
    games: Vec<GameSummary>,
    mean_lines: f64,
}

fn play(
    config: GameConfig,
    solver_config: SolverConfig,
    pieces: u64,
    frame: Option<Duration>,
) -> Result<GameSummary> {
    let seed = config.seed;
    let mut game = Game::new(config).with_context(|| format!("game {seed}"))?;
    let mut solver = Solver::new(solver_config);

    while !game.is_over() && game.stats().pieces_locked < pieces {
        let step = solver.advance(&mut game);
        if let Some(frame) = frame {
            draw(&game, solver.target(), step);
            thread::sleep(frame);
        }
        if let Step::Ticked(TickOutcome::Locked { rows }) = step {
            if rows > 0 {
                debug!(seed, rows, total = game.stats().lines_cleared, "rows cleared");
            }
        }
    }

    let stats = game.stats();
    info!(
        seed,
        pieces = stats.pieces_locked,
        lines = stats.lines_cleared,
        over = game.is_over(),
        "game finished"
    );
    Ok(GameSummary {
        seed,
        pieces: stats.pieces_locked,
        lines: stats.lines_cleared,
        topped_out: game.is_over(),
        solver: solver.stats(),
    })
}

/// Seeds `seed..seed + games`, one per game.
fn seed_range(seed: u64, games: u64) -> Result<Range<u64>> {
    if games == 0 {
        bail!("--games must be at least 1");
    }
    let Some(end) = seed.checked_add(games) else {
        bail!("--seed {seed} with --games {games} runs past u64::MAX");
    };
    Ok(seed..end)
}

fn draw(game: &Game, target: Option<Piece>, step: Step) {
    // clear screen, cursor home
    print!("\x1B[2J\x1B[H");
    println!("{game}");
    let stats = game.stats();
    println!("pieces {}  lines {}", stats.pieces_locked, stats.lines_cleared);
    if let Some(target) = target {
        println!(
            "target {} at ({}, {}) r{}",
            target.shape(),
            target.x(),
            target.y(),
            target.rotation()
        );
    }
    println!("{step:?}");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();

    if cli.render.is_some() && cli.games > 1 {
        bail!("--render only works with a single game");
    }

    let lookahead = usize::from(cli.lookahead);
    let solver_config = SolverConfig::new(lookahead)?;
    let base = GameConfig {
        piece_rule: cli.rule.into(),
        ..GameConfig::classic()
    }
    .with_preview(lookahead.saturating_sub(1).max(1));
    let frame = cli.render.map(Duration::from_millis);

    let seeds = seed_range(cli.seed, cli.games)?;
    info!(games = cli.games, lookahead, rule = ?cli.rule, "starting");
    let games = seeds
        .into_par_iter()
        .map(|seed| play(base.clone().with_seed(seed), solver_config, cli.pieces, frame))
        .collect::<Result<Vec<_>>>()?;

    let mean_lines =
        games.iter().map(|g| f64::from(g.lines)).sum::<f64>() / games.len() as f64;
    let report = Report {
        lookahead,
        rule: base.piece_rule,
        games,
        mean_lines,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for game in &report.games {
            println!(
                "seed {:>6}  pieces {:>6}  lines {:>6}  searches {:>6}  {}",
                game.seed,
                game.pieces,
                game.lines,
                game.solver.searches,
                if game.topped_out { "topped out" } else { "alive" }
            );
        }
        println!("mean lines {:.1}", report.mean_lines);
    }
    Ok(())
}
