//! Line-oriented text protocol.
//!
//! A GTP-style command loop: each line is an optional numeric id, a command and
//! its arguments. Successful commands answer `=id response`, failures `?id message`,
//! each followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <rows> <cols>` - New empty board
//! - `clear_board` - Empty the current board
//! - `difficulty [name]` - Show or set the engine tier
//! - `play <edge>` - Draw an edge (`h<row>-<col>`, `v<row>-<col>` or an id)
//! - `genmove` - Let the engine draw an edge
//! - `showboard` - ASCII picture of the board
//! - `score` - Scores of both players
//!
//! ## Example
//!
//! ```ignore
//! use boxes_rust::shell::Shell;
//! let mut shell = Shell::new();
//! shell.run();
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

use crate::board::{Board, Player};
use crate::strategy::Engine;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "difficulty",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "score",
    "showboard",
    "version",
];

/// Protocol state: the game in progress and the engine playing it.
pub struct Shell {
    board: Board,
    engine: Engine,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Shell on the default board size with a default engine.
    pub fn new() -> Self {
        Self::with_engine(Engine::new())
    }

    pub fn with_engine(engine: Engine) -> Self {
        Self {
            board: Board::default(),
            engine,
        }
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line.context("reading command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (prefix, message) = match self.execute(&command, args) {
                Ok(message) => ('=', message),
                Err(err) => ('?', format!("{err:#}")),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(stdout, "{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute one command and return its response text.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("2".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    bail!("missing argument");
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "boardsize" => {
                let [rows, cols] = args else {
                    bail!("expected: boardsize <rows> <cols>");
                };
                let rows: usize = rows.parse().context("invalid row count")?;
                let cols: usize = cols.parse().context("invalid column count")?;
                self.board = Board::new(rows, cols)?;
                Ok(String::new())
            }

            "clear_board" => {
                self.board = Board::new(self.board.rows(), self.board.cols())?;
                Ok(String::new())
            }

            "difficulty" => match args.first() {
                Some(name) => Ok(self.engine.set_difficulty(name).to_string()),
                None => Ok(self.engine.difficulty().to_string()),
            },

            "play" => {
                let Some(notation) = args.first() else {
                    bail!("missing edge");
                };
                let edge = self.board.parse_edge(notation)?;
                let result = self.board.play(edge)?;
                Ok(if result.extra_turn {
                    format!("{} box(es), play again", result.completed)
                } else {
                    String::new()
                })
            }

            "genmove" => {
                let Some(edge) = self.engine.choose_move(&mut self.board) else {
                    bail!("no free edges");
                };
                self.board.play(edge)?;
                Ok(self.board.edge_name(edge))
            }

            "showboard" => Ok(format!("\n{}", self.board)),

            "score" => Ok(format!(
                "{} {} {} {}",
                Player::First,
                self.board.score(Player::First),
                Player::Second,
                self.board.score(Player::Second)
            )),

            _ => bail!("unknown command: {command}"),
        }
    }
}
