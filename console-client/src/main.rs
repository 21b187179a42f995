mod input;
mod render;

use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tictactoe_engine::config::{ConfigManager, EngineConfig};
use tictactoe_engine::logger::{self, LogTarget};
use tictactoe_engine::{GameHost, GameMode, GameSnapshot, SessionRng, log, log_warn};

use input::{HELP, InputCommand, InputError, parse_input};
use render::render;

#[derive(Parser)]
#[command(name = "tictactoe_console")]
struct Args {
    #[arg(long, default_value = "tictactoe_config.yaml")]
    config: String,
    /// local, bot-easy, bot-medium or bot-hard
    #[arg(long)]
    mode: Option<GameMode>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    bot_delay_ms: Option<u64>,
    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_manager: ConfigManager<_, EngineConfig> = ConfigManager::from_yaml_file(&args.config);
    let loaded = config_manager.get_config();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let prefix = args.use_log_prefix.then(|| "Console".to_string());
    let target = match &config.log.file {
        Some(path) => LogTarget::File(path.clone()),
        None => LogTarget::Stderr,
    };
    logger::init_logger(prefix, config.log.level, target)?;
    if let Err(e) = &loaded {
        log_warn!("Using default config instead of {}: {}", args.config, e);
    }

    let mode = args.mode.unwrap_or(config.default_mode);
    let bot_delay = args
        .bot_delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.bot_delay());
    let rng = match args.seed.or(config.seed) {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!("Bot seed {}, thinking time {:?}", rng.seed(), bot_delay);

    let (host, handle) = GameHost::new(mode, rng, bot_delay);
    let host_task = tokio::spawn(host.run());
    let render_task = tokio::spawn(render_loop(handle.snapshots()));

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Ok(InputCommand::Place(index)) => match handle.place(index).await {
                Some(Err(e)) => println!("{}", e),
                Some(Ok(_)) => {}
                None => break,
            },
            Ok(InputCommand::NewGame(new_mode)) => {
                let mode = new_mode.unwrap_or(handle.snapshot().mode);
                handle.new_game(mode);
            }
            Ok(InputCommand::ResetScores) => {
                handle.reset_scores();
            }
            Ok(InputCommand::Help) => println!("{}", HELP),
            Ok(InputCommand::Quit) => break,
            Err(InputError::Empty) => {}
            Err(e) => {
                log_warn!("Ignoring input '{}': {}", line.trim(), e);
                println!("{}", e);
            }
        }
    }

    handle.shutdown();
    let scores = host_task.await?;
    render_task.abort();

    println!(
        "Final score  X: {}  O: {}  Draws: {}",
        scores.x_wins, scores.o_wins, scores.draws
    );
    Ok(())
}

async fn render_loop(mut snapshots: watch::Receiver<GameSnapshot>) {
    let frame = render(&snapshots.borrow_and_update());
    println!("{}", frame);

    while snapshots.changed().await.is_ok() {
        let frame = render(&snapshots.borrow_and_update());
        println!("{}", frame);
    }
}
