//! Boxes-Rust: a Dots and Boxes engine.
//!
//! ## Usage
//!
//! - `boxes-rust` - Show a demo
//! - `boxes-rust shell` - Start the text protocol on stdin/stdout
//! - `boxes-rust demo` - Play one annotated engine-vs-engine game
//! - `boxes-rust selfplay --first expert --second medium --games 20` - Run a match
//!
//! Set `RUST_LOG=debug` to see the engine's reasoning.

use anyhow::Result;
use clap::{Parser, Subcommand};

use boxes_rust::board::{Board, Player};
use boxes_rust::config::Difficulty;
use boxes_rust::constants::{DEFAULT_COLS, DEFAULT_ROWS};
use boxes_rust::selfplay::play_match;
use boxes_rust::shell::Shell;
use boxes_rust::strategy::Engine;

/// Boxes-Rust: a Dots and Boxes engine
#[derive(Parser)]
#[command(name = "boxes-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the line-oriented text protocol for use by a front end
    Shell {
        /// Engine tier (easy, medium, hard, expert)
        #[arg(long, default_value = "medium")]
        difficulty: String,
        /// Seed for reproducible play
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play one engine-vs-engine game and print the board after every move
    Demo,
    /// Play a series of games between two tiers
    Selfplay {
        #[arg(long, default_value = "expert")]
        first: String,
        #[arg(long, default_value = "medium")]
        second: String,
        #[arg(long, default_value_t = DEFAULT_ROWS)]
        rows: usize,
        #[arg(long, default_value_t = DEFAULT_COLS)]
        cols: usize,
        #[arg(long, default_value_t = 10)]
        games: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Shell { difficulty, seed }) => {
            let mut engine = seed.map_or_else(Engine::new, Engine::with_seed);
            engine.set_difficulty(&difficulty);
            Shell::with_engine(engine).run()
        }
        Some(Commands::Selfplay {
            first,
            second,
            rows,
            cols,
            games,
            seed,
        }) => {
            let tiers = [Difficulty::from_name(&first), Difficulty::from_name(&second)];
            let summary = play_match(rows, cols, tiers, games, seed)?;
            println!("{rows}x{cols}, {games} games, seats alternating");
            for (i, tier) in tiers.iter().enumerate() {
                println!(
                    "{tier:>8}: {} wins, {} boxes",
                    summary.wins[i], summary.boxes[i]
                );
            }
            println!("{:>8}: {}", "ties", summary.ties);
            Ok(())
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_demo() -> Result<()> {
    println!("Boxes-Rust: Dots and Boxes Engine\n");

    let mut board = Board::new(DEFAULT_ROWS, DEFAULT_COLS)?;
    let mut engines = [Engine::with_seed(1), Engine::with_seed(2)];
    engines[0].set_difficulty("expert");
    engines[1].set_difficulty("hard");
    println!("A = expert, B = hard\n");

    while !board.is_over() {
        let player = board.current_player();
        let Some(edge) = engines[player.index()].choose_move(&mut board) else {
            break;
        };
        let result = board.play(edge)?;
        let note = if result.extra_turn { " (captures, plays again)" } else { "" };
        println!("{player} draws {}{note}", board.edge_name(edge));
        println!("{board}");
    }

    println!(
        "Final score: A {} - B {}",
        board.score(Player::First),
        board.score(Player::Second)
    );
    Ok(())
}
