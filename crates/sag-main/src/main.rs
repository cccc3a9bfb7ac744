// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use clap::{Parser, ValueEnum};
use rustc_hash::FxHashMap;
use sag_core::Time;
use sag_model::err::{ParseError, ProblemError};
use sag_model::io::{parse_abort_file, parse_job_file, parse_precedence_file};
use sag_model::job::{Job, JobId};
use sag_model::problem::{AnalysisOptions, Problem};
use sag_solver::graph::ScheduleGraph;
use sag_solver::uni::iip::{CriticalWindow, NullIip, PrecautiousRm};
use sag_solver::{global, uni, AnalysisReport};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Exact schedulability tester for sets of non-preemptive jobs.
#[derive(Parser, Debug)]
#[command(name = "sagtest")]
#[command(about = "Exact schedulability tester for sets of non-preemptive jobs")]
#[command(version)]
struct Cli {
    /// Job-set files to analyze ("-" or no file reads standard input)
    files: Vec<PathBuf>,

    /// Time model of the analysis
    #[arg(short = 't', long = "time", value_enum, default_value = "discrete")]
    time_model: TimeModel,

    /// Maximum analysis time in seconds (0 = unlimited)
    #[arg(short = 'l', long = "time-limit", default_value_t = 0.0)]
    time_limit: f64,

    /// Maximum number of scheduling decisions to explore (0 = unlimited)
    #[arg(short = 'd', long = "depth-limit", default_value_t = 0)]
    depth_limit: usize,

    /// Explore the state space naively, without merging (baseline)
    #[arg(short = 'n', long = "naive")]
    naive: bool,

    /// Idle-time insertion policy (uniprocessor only)
    #[arg(short = 'i', long = "iip", value_enum, default_value = "none")]
    iip: IipChoice,

    /// Precedence-constraints file
    #[arg(short = 'p', long = "precedence")]
    precedence_file: Option<PathBuf>,

    /// Abort-actions file
    #[arg(short = 'a', long = "abort-actions")]
    abort_file: Option<PathBuf>,

    /// Number of (identical) processors
    #[arg(short = 'm', long = "multiprocessor", default_value_t = 1)]
    num_processors: usize,

    /// Save the explored schedule graph in Graphviz dot format
    #[arg(short = 'g', long = "save-graph")]
    save_graph: bool,

    /// Save the best- and worst-case response times per job
    #[arg(short = 'r', long = "save-response-times")]
    save_response_times: bool,

    /// Keep exploring after the first observed deadline miss
    #[arg(short = 'c', long = "continue-after-deadline-miss")]
    continue_after_deadline_miss: bool,

    /// Worker threads for layer expansion (multiprocessor analysis)
    #[arg(long = "threads", default_value_t = 1)]
    threads: usize,

    /// Print a column header before the first result line
    #[arg(long = "header")]
    header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TimeModel {
    Discrete,
    Dense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum IipChoice {
    #[value(name = "none")]
    None,
    #[value(name = "P-RM", alias = "p-rm")]
    PrecautiousRm,
    #[value(name = "CW", alias = "cw")]
    CriticalWindow,
}

#[derive(Debug)]
enum AppError {
    Parse { file: String, err: ParseError },
    Problem { file: String, err: ProblemError },
    Io { file: String, err: std::io::Error },
}

impl AppError {
    /// The process exit code this failure maps to.
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Parse { .. } | AppError::Io { .. } => 1,
            AppError::Problem { err, .. } => match err {
                ProblemError::InvalidPrecedenceReference(_) => 3,
                ProblemError::InvalidAbortParameter(_) => 4,
            },
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Parse { file, err } => write!(f, "{}: {}", file, err),
            AppError::Problem { file, err } => write!(f, "{}: {}", file, err),
            AppError::Io { file, err } => write!(f, "{}: {}", file, err),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.iip != IipChoice::None && cli.num_processors > 1 {
        eprintln!("sagtest: idle-time insertion is uniprocessor-only; ignoring --iip");
    }

    if cli.header {
        println!(
            "# file name, schedulable?, #jobs, #states, #edges, max width, CPU time, timeout, #CPUs"
        );
    }

    let files: Vec<PathBuf> = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files.clone()
    };

    let mut exit_code = 0;
    for file in &files {
        if let Err(err) = process_file(&cli, file) {
            eprintln!("sagtest: {}", err);
            match err.exit_code() {
                // a malformed file does not abort the rest of the batch
                1 => exit_code = 1,
                code => std::process::exit(code),
            }
        }
    }
    std::process::exit(exit_code);
}

fn process_file(cli: &Cli, file: &Path) -> Result<(), AppError> {
    match cli.time_model {
        TimeModel::Discrete => run::<i64>(cli, file),
        TimeModel::Dense => run::<f64>(cli, file),
    }
}

fn open_input(file: &Path) -> Result<Box<dyn BufRead>, std::io::Error> {
    if file.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(std::io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(file)?)))
    }
}

fn run<T: Time>(cli: &Cli, file: &Path) -> Result<(), AppError> {
    let name = if file.as_os_str() == "-" {
        "stdin".to_string()
    } else {
        file.display().to_string()
    };
    fn io_err(name: &str, err: std::io::Error) -> AppError {
        AppError::Io {
            file: name.to_string(),
            err,
        }
    }

    let jobs: Vec<Job<T>> = parse_job_file(open_input(file).map_err(|e| io_err(&name, e))?)
        .map_err(|err| AppError::Parse {
            file: name.clone(),
            err,
        })?;

    let mut problem = Problem::new(jobs, cli.num_processors);
    if let Some(dag_file) = &cli.precedence_file {
        let dag = parse_precedence_file(open_input(dag_file).map_err(|e| io_err(&name, e))?)
            .map_err(|err| AppError::Parse {
                file: dag_file.display().to_string(),
                err,
            })?;
        problem = problem.with_precedence(dag).map_err(|err| AppError::Problem {
            file: name.clone(),
            err,
        })?;
    }
    if let Some(abort_file) = &cli.abort_file {
        let aborts = parse_abort_file(open_input(abort_file).map_err(|e| io_err(&name, e))?)
            .map_err(|err| AppError::Parse {
                file: abort_file.display().to_string(),
                err,
            })?;
        problem = problem.with_aborts(aborts).map_err(|err| AppError::Problem {
            file: name.clone(),
            err,
        })?;
    }

    let opts = AnalysisOptions {
        timeout: cli.time_limit,
        max_depth: cli.depth_limit,
        early_exit: !cli.continue_after_deadline_miss,
        be_naive: cli.naive,
        num_buckets: 1000,
        num_threads: cli.threads,
        collect_schedule_graph: cli.save_graph,
    };

    let report = analyze(cli, &problem, &opts);

    println!(
        "{},  {},  {},  {},  {},  {},  {:.6},  {},  {}",
        name,
        report.schedulable as i32,
        problem.jobs.len(),
        report.num_states,
        report.num_edges,
        report.max_width,
        report.cpu_time_seconds,
        report.timed_out as i32,
        problem.num_processors,
    );

    if cli.save_response_times {
        write_response_times(&name, &problem.jobs, &report).map_err(|e| io_err(&name, e))?;
    }
    if cli.save_graph {
        if let Some(graph) = &report.graph {
            write_dot(&name, &problem.jobs, graph).map_err(|e| io_err(&name, e))?;
        }
    }
    Ok(())
}

fn analyze<T: Time>(cli: &Cli, problem: &Problem<T>, opts: &AnalysisOptions) -> AnalysisReport<T> {
    if problem.num_processors > 1 {
        return global::StateSpace::explore(problem, opts).into_report();
    }
    match cli.iip {
        IipChoice::None => uni::StateSpace::<T, NullIip>::explore(problem, opts).into_report(),
        IipChoice::PrecautiousRm => {
            uni::StateSpace::<T, PrecautiousRm<T>>::explore(problem, opts).into_report()
        }
        IipChoice::CriticalWindow => {
            uni::StateSpace::<T, CriticalWindow<T>>::explore(problem, opts).into_report()
        }
    }
}

/// One row per job: completion-time bounds and the derived response times.
fn write_response_times<T: Time>(
    name: &str,
    jobs: &[Job<T>],
    report: &AnalysisReport<T>,
) -> Result<(), std::io::Error> {
    let path = format!("{}.rta.csv", name);
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "Task ID, Job ID, BCCT, WCCT, BCRT, WCRT")?;
    for job in jobs {
        let finish = report
            .response_times
            .get(&job.id())
            .copied()
            .unwrap_or_else(|| sag_core::Interval::new(T::zero(), T::infinity()));
        let bcrt = Time::max(T::zero(), finish.min() - job.earliest_arrival());
        let wcrt = finish.max() - job.earliest_arrival();
        writeln!(
            out,
            "{}, {}, {}, {}, {}, {}",
            job.task_id(),
            job.job_id(),
            finish.min(),
            finish.max(),
            bcrt,
            wcrt,
        )?;
    }
    Ok(())
}

/// Renders the collected search graph as Graphviz dot, highlighting edges on
/// which a deadline miss is possible.
fn write_dot<T: Time>(
    name: &str,
    jobs: &[Job<T>],
    graph: &ScheduleGraph<T>,
) -> Result<(), std::io::Error> {
    let by_id: FxHashMap<JobId, &Job<T>> = jobs.iter().map(|j| (j.id(), j)).collect();

    let path = format!("{}.dot", name);
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "digraph {{")?;
    for node in &graph.nodes {
        write!(out, "\tS{}[label=\"S{}: ", node.id, node.id)?;
        for (i, core) in node.availability.iter().enumerate() {
            if i > 0 {
                write!(out, " ")?;
            }
            write!(out, "[{}, {}]", core.min(), core.max())?;
        }
        if let Some(epr) = node.earliest_pending_release {
            write!(out, "\\nER={}", epr)?;
        }
        writeln!(out, "\"];")?;
    }
    for edge in &graph.edges {
        let job = by_id[&edge.job];
        let miss = job.exceeds_deadline(edge.finish_range.max());
        write!(
            out,
            "\tS{} -> S{}[label=\"T{} J{}\\nDL={}\\nES={}\\nLS={}\\nEF={}\\nLF={}\"",
            edge.source,
            edge.target,
            job.task_id(),
            job.job_id(),
            job.deadline(),
            edge.finish_range.min() - job.least_cost(),
            edge.finish_range.max() - job.maximal_cost(),
            edge.finish_range.min(),
            edge.finish_range.max(),
        )?;
        if miss {
            write!(out, ",color=Red,fontcolor=Red")?;
        }
        writeln!(out, ",fontsize=8];")?;
        if miss {
            writeln!(out, "\tS{}[color=Red];", edge.target)?;
        }
    }
    writeln!(out, "}}")?;
    Ok(())
}
