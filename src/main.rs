use clap::Parser;
use codecanvas::cli::{Cli, Command};
use codecanvas::{cmd_graph, cmd_index, cmd_init, cmd_serve};
use tracing_subscriber::filter::LevelFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Command::Index(args) => cmd_index(args),
        Command::Graph(args) => cmd_graph(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}

/// Logs go to stderr so `graph` output on stdout stays machine readable.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
