use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use emperor_rank::build_info;
use emperor_rank::catalog::{export, Catalog, ListQuery, RecordSource};
use emperor_rank::constants::{DEFAULT_DATA_PATH, DEFAULT_HOST, DEFAULT_PORT};
use emperor_rank::emperor::{EmperorRecord, ScoreField};
use emperor_rank::guess::{
    parse_difficulty, GameController, GameError, GuessOutcome, SessionStore,
};
use emperor_rank::web::{start_web_server, AppState};

#[derive(Parser, Debug)]
#[command(name = "emperor-rank", about = "Emperor ranking catalog and guessing game")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print build date and commit
    #[arg(short = 'V', long)]
    version: bool,

    /// Emperor data file (JSON array of records)
    #[arg(long, env = "EMPEROR_DATA", default_value = DEFAULT_DATA_PATH, global = true)]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API (default)
    Serve {
        #[arg(long, env = "EMPEROR_HOST", default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, env = "EMPEROR_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Play one round in the terminal
    Play {
        /// easy, medium, hard or hell
        #[arg(long, short, default_value = "medium")]
        difficulty: String,
        /// Fixed seed for a reproducible round
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write the filtered catalog as CSV to stdout
    Export {
        #[arg(long, default_value = "overall_rank")]
        sort: String,
        #[arg(long, default_value = "asc")]
        order: String,
        #[arg(long)]
        era: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if cli.version {
        println!("{}", build_info::version_line());
        return Ok(());
    }

    let catalog = match Catalog::load(&cli.data) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Could not load {}: {e}", cli.data.display());
            std::process::exit(1);
        }
    };

    // No subcommand means serve, still honoring the serve env vars
    let command = cli.command.unwrap_or_else(|| Command::Serve {
        host: std::env::var("EMPEROR_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        port: std::env::var("EMPEROR_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT),
    });

    match command {
        Command::Serve { host, port } => serve(catalog, &host, port),
        Command::Play { difficulty, seed } => play(catalog, &difficulty, seed),
        Command::Export {
            sort,
            order,
            era,
            search,
        } => {
            let mut params = std::collections::HashMap::new();
            params.insert("sort".to_string(), sort);
            params.insert("order".to_string(), order);
            params.extend(era.map(|v| ("era".to_string(), v)));
            params.extend(search.map(|v| ("search".to_string(), v)));
            let csv = export::export_csv(&catalog, &ListQuery::from_params(&params));
            io::stdout().write_all(csv.as_bytes())
        }
    }
}

fn serve(catalog: Catalog, host: &str, port: u16) -> io::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{host}:{port}: {e}")))?;
    info!("{}", build_info::version_line());
    info!("Serving {} emperors", catalog.len());

    let state = Arc::new(AppState::new(catalog));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(start_web_server(addr, state))
}

const PLAYER: &str = "terminal";

fn play(catalog: Catalog, difficulty: &str, seed: Option<u64>) -> io::Result<()> {
    let difficulty = match parse_difficulty(difficulty) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let seed = seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);
    let game = GameController::new(Arc::new(catalog));

    let start = match game.start(PLAYER, difficulty, &mut rng) {
        Ok(start) => start,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!(
        "难度 {}，共 {} 次机会 (seed {seed})",
        difficulty.name(),
        start.total_guesses
    );
    for hint in &start.hints {
        println!("  提示 {}: {}", hint.label, hint.value);
    }
    println!("输入皇帝姓名或称号，/giveup 放弃");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            // EOF gives up
            return reveal(&game);
        };
        let line = line.trim();
        if line == "/giveup" {
            return reveal(&game);
        }

        match game.guess(PLAYER, line) {
            Ok(outcome) => {
                print_outcome(&outcome);
                if let Some(answer) = &outcome.answer {
                    if outcome.won {
                        println!("猜中了！");
                    } else {
                        println!("机会用完了。");
                    }
                    print_card(answer);
                    return Ok(());
                }
            }
            Err(e @ (GameError::NotFound(_) | GameError::InvalidInput(_))) => println!("{e}"),
            Err(e) => {
                eprintln!("{e}");
                return Ok(());
            }
        }
    }
}

fn reveal<S: RecordSource, T: SessionStore>(game: &GameController<S, T>) -> io::Result<()> {
    match game.give_up(PLAYER) {
        Ok(outcome) => {
            println!("答案是：");
            print_card(&outcome.answer);
        }
        Err(e) => eprintln!("{e}"),
    }
    Ok(())
}

fn print_outcome(outcome: &GuessOutcome) {
    let rank = outcome
        .guess_rank
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    println!("{} (#{rank}), 剩余 {} 次", outcome.guess_name, outcome.guesses_left);
    for row in &outcome.comparison {
        let value = serde_json::to_string(&row.value).unwrap_or_default();
        println!("  {:<6} {:>8} {}", row.label, value.trim_matches('"'), row.result.symbol());
    }
}

fn print_card(record: &EmperorRecord) {
    let rank = record
        .overall_rank
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    println!(
        "#{rank} {} {} {}",
        record.era_str().unwrap_or("-"),
        record.title,
        record.name
    );
    if !record.short_comment.is_empty() {
        println!("  {}", record.short_comment);
    }
    for field in ScoreField::ALL {
        println!("  {:<6} {}", field.label(), export::format_score(record.score(field)));
    }
}
