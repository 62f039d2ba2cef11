use anyhow::{Context, Result};
use clap::Parser;
use platmatch::platform::{MatchComparer, Matcher, Platform, VersionAwareMatcher, default_spec};
use std::io::Read;
use std::path::PathBuf;

/// platmatch - container image platform matcher
///
/// Decide which image platforms can run on this host and which one to prefer.
/// Windows hosts only accept images built for their own build number, unless
/// the host is Windows Server 2019 (build 17763) or later.
///
/// Examples:
///   platmatch default                      # Show the host platform
///   platmatch rank index-platforms.json    # Rank candidates, best first
#[derive(Parser, Debug)]
#[command(author, version = env!("PLATMATCH_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Match against this platform instead of the host (os[/arch[/variant]])
    #[arg(long = "host", env = "PLATMATCH_HOST", value_name = "PLATFORM", global = true)]
    pub host: Option<Platform>,

    /// OS version of the reference platform (e.g. 10.0.17763)
    #[arg(
        long = "host-os-version",
        env = "PLATMATCH_HOST_OS_VERSION",
        value_name = "VERSION",
        global = true
    )]
    pub host_os_version: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the reference platform as JSON
    Default,

    /// Check whether a single platform matches
    Match(MatchArgs),

    /// Sort a JSON array of platforms by preference
    Rank(RankArgs),
}

#[derive(clap::Args, Debug)]
pub struct MatchArgs {
    /// OCI platform object, e.g. '{"os":"windows","architecture":"amd64"}'
    #[arg(value_name = "JSON")]
    pub candidate: String,
}

#[derive(clap::Args, Debug)]
pub struct RankArgs {
    /// File holding a JSON array of platforms ("-" or omitted for stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Also list platforms that do not match, after the ones that do
    #[arg(long)]
    pub all: bool,
}

impl Cli {
    fn reference(&self) -> Platform {
        let mut reference = default_spec();
        if let Some(host) = &self.host {
            reference.os = host.os.clone();
            reference.architecture = host.architecture.clone();
            reference.variant = host.variant.clone();
        }
        if let Some(os_version) = &self.host_os_version {
            reference.os_version = os_version.clone();
        }
        reference
    }
}

fn read_candidates(file: Option<&PathBuf>) -> Result<Vec<Platform>> {
    let input = match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read platforms from stdin")?;
            input
        }
    };
    serde_json::from_str(&input).context("Failed to parse platform list")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let reference = cli.reference();

    match &cli.command {
        Commands::Default => {
            println!("{}", serde_json::to_string_pretty(&reference)?);
        }
        Commands::Match(args) => {
            let candidate: Platform =
                serde_json::from_str(&args.candidate).context("Failed to parse platform")?;
            let matcher = VersionAwareMatcher::new(&reference);
            println!("{}", matcher.matches(&candidate));
        }
        Commands::Rank(args) => {
            let mut candidates = read_candidates(args.file.as_ref())?;
            let matcher = VersionAwareMatcher::new(&reference);
            matcher.sort(&mut candidates);
            if !args.all {
                candidates.retain(|p| matcher.matches(p));
            }
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
    }
    Ok(())
}
