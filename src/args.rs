use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use quill_backend::regalloc::{Constraints, DEFAULT_PATIENCE, DEFAULT_REGISTERS};

/// a graph-coloring register allocator for a small tree IR.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
#[command(propagate_version = true)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

impl Arguments {
    pub fn options(&self) -> &Options {
        self.command.options()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Allocate registers and print the renamed program.
    #[command(visible_alias = "a")]
    Alloc(Options),
    /// Only read and check the program.
    #[command(visible_alias = "c")]
    Check(Options),
    /// Write the interference graph of every unit as a GraphViz file.
    #[command(visible_alias = "g")]
    Graph(GraphOptions),
}

impl Command {
    pub fn options(&self) -> &Options {
        match self {
            Self::Alloc(opts) => opts,
            Self::Check(opts) => opts,
            Self::Graph(opts) => &opts.options,
        }
    }
}

#[derive(Debug, Args)]
pub struct Options {
    /// The number of available registers.
    #[arg(short = 'k', long, default_value_t = DEFAULT_REGISTERS)]
    pub registers: usize,

    /// Seed for the move optimizer. Picked at random if absent.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop optimizing moves after this many trials without improvement.
    #[arg(long, default_value_t = DEFAULT_PATIENCE)]
    pub patience: usize,

    /// Skip the move optimizer.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_moves: bool,

    /// Log more. May be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(required = true)]
    pub path: PathBuf,
}

impl Options {
    pub fn constraints(&self) -> Constraints {
        Constraints {
            registers: self.registers,
            patience: self.patience,
            shuffle: !self.no_moves,
        }
    }

    pub fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Args)]
pub struct GraphOptions {
    #[command(flatten)]
    pub options: Options,

    /// Where to write the graph.
    #[arg(short, long, default_value = "interference.dot")]
    pub output: PathBuf,
}
