mod diagnostic;
mod dot;


use std::fs;
use std::io::{BufWriter, Write};

use anyhow::{anyhow, Context};
use codespan_reporting::files::SimpleFiles;
use log::info;
use quill_backend::regalloc::{interference_graphs, regalloc, Report};
use quill_common::ir::{check, Prettier, Program};
use quill_common::names::Names;
use quill_reader::read;
use rand::rngs::StdRng;
use rand::SeedableRng;

use self::diagnostic::ConsoleReporter;
use self::dot::GraphViz;
use crate::args::{Arguments, Command, Options};

pub fn run(args: &Arguments) -> anyhow::Result<()> {
    let opts = args.options();
    init_logging(opts);

    let mut names = Names::new();
    let program = read_program(&mut names, opts)?;

    match &args.command {
        Command::Check(_) => {
            check(&names, &program).context("internal compiler error")?;
            println!("{}: ok", opts.path.display());
        }

        Command::Alloc(_) => {
            let (program, report) = alloc(&mut names, opts, program)?;
            let prettier = Prettier::new(&names);

            println!("{}", prettier.pretty_program(&program));
            println!();
            print!("{}", format_report(&names, &report));
        }

        Command::Graph(graph_opts) => {
            let graphs = interference_graphs(&names, &opts.constraints(), &program)
                .context("internal compiler error")?;

            let file = fs::File::create(&graph_opts.output)?;
            let mut writer = BufWriter::new(file);
            GraphViz::new(&names, &graphs).render(&mut writer)?;
            writer.flush()?;

            info!("wrote {}", graph_opts.output.display());
        }
    }

    Ok(())
}

fn init_logging(opts: &Options) {
    env_logger::Builder::new()
        .filter_level(opts.level())
        .parse_default_env()
        .init();
}

/// Read the program at the input path, reporting any diagnostics.
fn read_program(names: &mut Names, opts: &Options) -> anyhow::Result<Program> {
    let path = &opts.path;
    let src = fs::read_to_string(path)
        .with_context(|| format!("unable to read `{}`", path.display()))?;

    let mut files = SimpleFiles::new();
    let file = files.add(path.display().to_string(), src.clone());

    match read(names, file, &src) {
        Ok(program) => Ok(program),
        Err(msgs) => {
            let count = msgs.len();
            ConsoleReporter::new(files).report(msgs)?;
            Err(anyhow!("aborting due to {count} previous errors"))
        }
    }
}

fn alloc(
    names: &mut Names,
    opts: &Options,
    mut program: Program,
) -> anyhow::Result<(Program, Report)> {
    let rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = regalloc(names, &opts.constraints(), rng, &mut program)
        .context("internal compiler error")?;

    Ok((program, report))
}

/// Summarize the spill counts and the move optimizer statistics.
fn format_report(names: &Names, report: &Report) -> String {
    let mut res = String::from("spills:\n");

    for (unit, count) in report.spills.iter() {
        res.push_str(&format!("  {}: {count}\n", names.text(unit)));
    }

    res.push_str(&format!("  total: {}\n", report.spills.total()));

    if let Some(moves) = &report.moves {
        res.push_str(&format!(
            "moves: {} -> {} ({} of {} swaps kept)\n",
            moves.initial_cost, moves.final_cost, moves.accepted, moves.trials
        ));
    }

    res
}
