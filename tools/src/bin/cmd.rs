// Command line utility for running louvain community detection

use anyhow::{Context, Error};
use clap::{value_parser, Arg, ArgAction, Command};
use log::info;
use louvain::{LevelPolicy, Louvain, LouvainConfig, VisitOrder, DEFAULT_THRESHOLD};
use std::path::PathBuf;
use tools::{create, open, read_edge_list, read_partition, write_levels};

pub fn main() -> Result<(), Error> {
    let matches = Command::new("louvain-cmd")
        .arg(
            Arg::new("INPUT")
                .help("Edge list, one 'src dst [weight]' per line (optionally gzipped)")
                .required(true)
                .index(1)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("OUT")
                .help("Output csv with the partition at every level")
                .short('o')
                .long("out")
                .default_value("communities.csv")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("PARTITION")
                .help("Seed partition, one 'vertex community' per line")
                .short('p')
                .long("partition")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("THRESHOLD")
                .help("Minimum modularity gain for a vertex move [default: 1e-5]")
                .short('t')
                .long("threshold")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("MULTILEVEL")
                .help("Keep aggregating until no level improves")
                .short('m')
                .long("multilevel")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("MAX_LEVELS")
                .help("Maximum number of levels with --multilevel")
                .long("max_levels")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("MAX_SWEEPS")
                .help("Fail if a level has not converged after this many sweeps")
                .long("max_sweeps")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("SHUFFLE")
                .help("Visit vertices in a random order drawn from this seed instead of by id")
                .short('s')
                .long("shuffle")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("VERBOSE")
                .help("Report every level")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("VERBOSE");
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let input: &PathBuf = matches.get_one("INPUT").unwrap();
    let out: &PathBuf = matches.get_one("OUT").unwrap();
    let threshold = matches.get_one::<f64>("THRESHOLD").copied().unwrap_or(DEFAULT_THRESHOLD);

    let mut config = LouvainConfig::default()
        .with_threshold(threshold)
        .with_verbose(verbose);
    if matches.get_flag("MULTILEVEL") {
        let max_levels = matches.get_one::<usize>("MAX_LEVELS").copied();
        config = config.with_levels(LevelPolicy::Multilevel { max_levels });
    }
    if let Some(&max_sweeps) = matches.get_one::<usize>("MAX_SWEEPS") {
        config = config.with_max_sweeps(max_sweeps);
    }
    if let Some(&seed) = matches.get_one::<u64>("SHUFFLE") {
        config = config.with_order(VisitOrder::Shuffled { seed });
    }

    let edges = read_edge_list(open(input)?).with_context(|| input.display().to_string())?;
    let network = edges.to_network();
    info!("read {} vertices and {} edges", network.nodes(), network.edge_count());

    let partition = match matches.get_one::<PathBuf>("PARTITION") {
        Some(path) => Some(read_partition(open(path)?, &edges).with_context(|| path.display().to_string())?),
        None => None,
    };

    let dendrogram = Louvain::new(config).run_network(&network, partition.as_deref())?;

    for (i, level) in dendrogram.levels().iter().enumerate() {
        println!(
            "level {i}: {} communities, modularity {:.6} ({} moves, {} sweeps)",
            level.labels.iter().max().map_or(0, |&l| l + 1),
            level.modularity,
            level.moves,
            level.sweeps
        );
    }

    write_levels(create(out)?, &edges, &dendrogram).with_context(|| out.display().to_string())?;

    Ok(())
}
