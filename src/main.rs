use anyhow::{Context, Result};
use clap::{Args, Parser};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

// 导入库模块
use hopgraph::config::Config;
use hopgraph::engine::{load_graph, GraphFormat};
use hopgraph::sssp::{self, OutputFormat, ShortestPathRun};
use hopgraph::utils::logging;

#[derive(Parser)]
#[clap(version = "0.1.0", author = "hopgraph Contributors")]
enum Cli {
    /// Compute hop distances from a source vertex
    Run(RunArgs),
    /// Write a configuration file with default values
    InitConfig {
        #[clap(short, long, default_value = "hopgraph.toml")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Configuration file; flags below override its values
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Graph file
    #[clap(short, long)]
    file: Option<PathBuf>,
    /// Graph file format (edgelist, adjlist)
    #[clap(long)]
    format: Option<GraphFormat>,
    /// Minimum number of vertices
    #[clap(long)]
    vertices: Option<usize>,
    /// Source vertex id
    #[clap(short, long)]
    source: Option<u32>,
    /// Maximum number of passes, including the initialization pass
    #[clap(long)]
    niters: Option<u32>,
    /// Selective scheduling (true, false)
    #[clap(long)]
    scheduler: Option<bool>,
    /// Worker threads, 0 lets the thread pool decide
    #[clap(long)]
    threads: Option<usize>,
    /// Result file; stdout when omitted
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Result format (tsv, json)
    #[clap(long)]
    output_format: Option<OutputFormat>,
    /// Report the K farthest reached vertices
    #[clap(long)]
    top: Option<usize>,
    /// Keep every improvement record
    #[clap(long)]
    trace: bool,
    /// Cross-check the result with a sequential BFS
    #[clap(long)]
    verify: bool,
    /// Log level, e.g. info or hopgraph::trace=trace
    #[clap(long)]
    log_level: Option<String>,
}

impl RunArgs {
    fn apply(self, config: &mut Config) {
        if let Some(file) = self.file {
            config.graph.file = Some(file);
        }
        if let Some(format) = self.format {
            config.graph.format = format;
        }
        if let Some(vertices) = self.vertices {
            config.graph.vertices = vertices;
        }
        if let Some(source) = self.source {
            config.run.source = source;
        }
        if let Some(niters) = self.niters {
            config.run.max_passes = niters;
        }
        if let Some(scheduler) = self.scheduler {
            config.run.selective_scheduling = scheduler;
        }
        if let Some(threads) = self.threads {
            config.run.threads = threads;
        }
        if let Some(output) = self.output {
            config.output.path = Some(output);
        }
        if let Some(format) = self.output_format {
            config.output.format = format;
        }
        if let Some(top) = self.top {
            config.output.top = top;
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }
        config.run.trace |= self.trace;
        config.run.verify |= self.verify;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli {
        Cli::Run(args) => {
            let mut config = match &args.config {
                Some(path) => Config::load(path)
                    .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
                None => Config::default(),
            };
            args.apply(&mut config);
            config.validate()?;

            logging::init(&config.log).context("日志初始化失败")?;
            let result = execute(&config);
            logging::shutdown();
            result
        }
        Cli::InitConfig { path } => {
            Config::default()
                .save(&path)
                .with_context(|| format!("无法写入配置文件 {}", path.display()))?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn execute(config: &Config) -> Result<()> {
    let file = config
        .graph
        .file
        .as_ref()
        .context("未指定图文件 (--file 或 [graph] file)")?;
    let graph = load_graph(file, config.graph.format, config.graph.vertices)?;

    let mut run = ShortestPathRun::new(graph, config.run_options())?;
    let outcome = run.execute();
    if config.run.verify {
        sssp::verify(run.graph(), &outcome)?;
    }

    match &config.output.path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("无法创建结果文件 {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            outcome.distances.write_to(&mut writer, config.output.format)?;
            writer.flush()?;
            log::info!("结果已写入 {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            outcome.distances.write_to(&mut writer, config.output.format)?;
            writer.flush()?;
        }
    }

    if config.output.top > 0 {
        for (rank, (vertex, hops)) in outcome
            .distances
            .farthest(config.output.top)
            .into_iter()
            .enumerate()
        {
            log::info!("top {}: vertex {} distance {}", rank + 1, vertex, hops);
        }
    }

    eprintln!(
        "{} ({} passes, {} improvements, {:?})",
        outcome.status, outcome.stats.passes, outcome.stats.improvements, outcome.stats.elapsed
    );
    outcome.into_converged()?;
    Ok(())
}
