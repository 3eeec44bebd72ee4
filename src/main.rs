//! Superhero Battle - Entry Point
//!
//! Assembles two teams, fights the battle, writes the battle log and
//! optionally mails an HTML report built from that log.

use superhero_battle::battle_log::{read_record, BattleLog};
use superhero_battle::core::config::BattleConfig;
use superhero_battle::core::error::Result;
use superhero_battle::report::{build_report, console, MailgunNotifier, ReportChannel};
use superhero_battle::simulation::BattleRun;
use superhero_battle::source::{CharacterSource, InMemorySource, SuperheroApiClient};

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Superhero Battle - two teams of five fight until one is left standing
#[derive(Parser, Debug)]
#[command(name = "superhero-battle")]
#[command(about = "Simulate a battle between two random superhero teams")]
struct Args {
    /// Send the battle report to this address when the battle is over
    #[arg(long)]
    email: Option<String>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Battle log location (overrides configuration)
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// Play offline with characters from a JSON roster file
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Only print round results, not every move
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("superhero_battle=info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = BattleConfig::load(args.config.as_deref())?;
    if let Some(path) = &args.log_path {
        config.log_path = path.clone();
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "Superhero Battle starting");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let rt = Runtime::new()?;

    match &args.roster {
        Some(path) => {
            let source = InMemorySource::from_json_file(path)?;
            if let Some(max) = source.max_id() {
                config.roster.max_character_id = max.0;
            }
            config.validate()?;
            info!(path = %path.display(), characters = source.len(), "Playing offline");
            play(&rt, &source, &config, &args, &mut rng)
        }
        None => {
            let source = SuperheroApiClient::new(&config.api)?;
            play(&rt, &source, &config, &args, &mut rng)
        }
    }
}

fn play<S: CharacterSource>(
    rt: &Runtime,
    source: &S,
    config: &BattleConfig,
    args: &Args,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    let run = BattleRun::new(source, config);

    let teams = match rt.block_on(run.assemble_teams(rng)) {
        Ok(teams) => teams,
        Err(err) => {
            error!(run = %run.id(), %err, "Team assembly failed, no battle was fought");
            return Err(err);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    console::write_intro(&mut out, &teams[0], &teams[1])?;
    for team in &teams {
        console::write_team(&mut out, team)?;
    }

    let mut log = BattleLog::create(&config.log_path)?;
    let outcome = run.fight(teams, &mut *rng, &mut log)?;
    drop(log);

    console::write_battle(&mut out, &outcome, !args.quiet)?;
    info!(path = %config.log_path.display(), "Battle log written");

    if let Some(recipient) = &args.email {
        send_report(rt, config, recipient);
    }
    Ok(())
}

/// Build the report from the log file and deliver it once; failures are
/// logged and do not affect the exit status
fn send_report(rt: &Runtime, config: &BattleConfig, recipient: &str) {
    let result = read_record(&config.log_path).and_then(|record| {
        let report = build_report(&record);
        let notifier = MailgunNotifier::new(&config.mail)?;
        rt.block_on(notifier.deliver(recipient, &report))?;
        Ok(())
    });

    match result {
        Ok(()) => println!("Battle report sent to {}", recipient),
        Err(err) => {
            error!(%err, recipient, "Battle report was not delivered");
            eprintln!("Could not send the battle report: {}", err);
        }
    }
}
