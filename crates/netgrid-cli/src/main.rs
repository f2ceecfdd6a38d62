use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "netgrid",
    about = "netgrid — network-topology aware node scoring",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a switch record file
    Validate {
        /// Path to the switch record (TOML)
        path: String,
    },
    /// Select a compact node subset from a switch record
    Select {
        /// Path to the switch record (TOML)
        #[arg(short, long)]
        topology: String,
        /// Available nodes as a hostlist, e.g. "node[01-16]"
        #[arg(short, long)]
        nodes: String,
        /// Nodes that must be part of the selection (hostlist)
        #[arg(short, long, default_value = "")]
        required: String,
        /// Minimum number of nodes to select
        #[arg(short, long)]
        min_member: u32,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Score a session file with the network-topology plugin.
    ///
    /// The session file lists the plugin arguments, the candidate nodes,
    /// and the jobs to score. The first task of every job is scored.
    Score {
        /// Path to the session file (TOML)
        #[arg(short, long)]
        session: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("netgrid=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => commands::validate::validate(&path),
        Commands::Select {
            topology,
            nodes,
            required,
            min_member,
            format,
        } => commands::select::select(&topology, &nodes, &required, min_member, &format),
        Commands::Score { session, format } => commands::score::score(&session, &format),
    }
}
