//! twentyq CLI - play 20 Questions at the terminal
//!
//! Loads a persisted decision tree if a path is given, falls back to an
//! interactive 3-node bootstrap otherwise (or when the load fails), then
//! hands the tree to the engine's round loop. Learned growth lives only for
//! the life of the process; nothing is written back.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use twentyq_engine::game::{is_affirmative, Console, Game};
use twentyq_tree::{bootstrap_tree, load_tree};

#[derive(Parser)]
#[command(name = "twentyq", about = "20 Questions over a self-extending decision tree", version)]
struct Cli {
    /// Path to a tree file (one `id:kind:value:parent:left:right` row per line)
    tree_file: Option<PathBuf>,
}

/// Console over stdin/stdout. Prompts are written without a trailing
/// newline and flushed so they appear before the read blocks.
struct StdioConsole;

impl Console for StdioConsole {
    fn ask_yes_no(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(is_affirmative(&self.ask_line(prompt)?))
    }

    fn ask_line(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut console = StdioConsole;

    let tree = match &cli.tree_file {
        Some(path) => match load_tree(path) {
            Ok(tree) => Some(tree),
            Err(_) => {
                // Any load failure falls back to the bootstrap below.
                console.say("Error loading the tree file, please try again!")?;
                console.say("")?;
                None
            }
        },
        None => None,
    };

    let tree = match tree {
        Some(tree) => tree,
        None => {
            let question = console.ask_line("No tree file found. Provide the first question: ")?;
            let example =
                console.ask_line("What's an example answer for 'yes' to your question? ")?;
            bootstrap_tree(question, example)
        }
    };

    let mut game = Game::new(tree);
    game.run(&mut console)?;
    Ok(())
}
