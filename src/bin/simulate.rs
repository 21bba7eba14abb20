//! Play automated games against the in-memory store.
//!
//! Every player picks uniformly among the offered moves. Useful to smoke
//! test the rules end to end and to eyeball game lengths.
//!
//! ```bash
//! cargo run --release --bin simulate -- --games 100 --players 4 --seed 42
//! RUST_LOG=ludo_rules=info cargo run --bin simulate -- --games 1 --seed 7
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;

use ludo_rules::core::{DiceRng, EngineConfig, PlayerId};
use ludo_rules::events::TracingSink;
use ludo_rules::game::Game;
use ludo_rules::rules::Engine;
use ludo_rules::store::{GameStore, MemoryStorage};

#[derive(Parser)]
#[command(name = "simulate", version, about = "Play random games with the rules engine")]
struct Cli {
    /// Number of games to play.
    #[arg(short, long, default_value_t = 1)]
    games: usize,

    /// Players per game (1 to 4).
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// Seed for dice and move choices. Random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Reject moves the evaluator did not offer.
    #[arg(long)]
    strict: bool,

    /// Give up on a game after this many rounds.
    #[arg(long, default_value_t = 20_000)]
    max_rounds: usize,
}

struct Outcome {
    rounds: usize,
    winner: Option<String>,
}

fn main() {
    ludo_rules::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if !(1..=4).contains(&cli.players) {
        bail!("--players must be between 1 and 4, got {}", cli.players);
    }

    let mut config = EngineConfig::new().with_max_players(cli.players);
    if let Some(seed) = cli.seed {
        config = config.with_dice_seed(seed);
    }
    if cli.strict {
        config = config.strict();
    }
    let engine = Engine::new(MemoryStorage::new())
        .with_config(config)
        .with_events(TracingSink);
    let mut chooser = DiceRng::from_seed_option(cli.seed.map(|s| s.wrapping_add(1)));

    let mut finished = 0;
    let mut total_rounds = 0;
    for index in 0..cli.games {
        let outcome = play(&engine, &mut chooser, cli.players, cli.max_rounds)
            .with_context(|| format!("game {index}"))?;
        total_rounds += outcome.rounds;
        match &outcome.winner {
            Some(color) => {
                finished += 1;
                println!("game {index}: {color} won after {} rounds", outcome.rounds);
            }
            None => println!("game {index}: no winner after {} rounds", outcome.rounds),
        }
    }

    if cli.games > 0 {
        println!(
            "{finished}/{} games finished, {:.1} rounds on average",
            cli.games,
            total_rounds as f64 / cli.games as f64
        );
    }
    Ok(())
}

fn play(
    engine: &Engine<MemoryStorage, TracingSink>,
    chooser: &mut DiceRng,
    players: usize,
    max_rounds: usize,
) -> Result<Outcome> {
    let mut game = Game::new("simulation");
    for _ in 0..players {
        game.seat_player(PlayerId::new())?;
    }
    engine.store().create_game(&game)?;
    engine.start_game(game.id)?;

    for _ in 0..max_rounds {
        let Some(round) = engine.current_round(game.id)? else {
            break;
        };
        let player = round.player_id;
        let round = engine.roll_dice(game.id, player, round.id)?;
        let options = engine.evaluate_options(game.id, player, round.id)?;

        if let Some(choice) = chooser.choose(&options.movable_pawns) {
            engine.commit_move(game.id, player, round.id, choice.name, choice.source, choice.destination)?;
        }
    }

    let stats = engine.end_stats(game.id)?;
    let stored = engine
        .store()
        .find_game(game.id)?
        .context("game vanished from the store")?;
    Ok(Outcome {
        rounds: stats.round_count,
        winner: stats
            .winner
            .and_then(|winner| stored.color_of(winner))
            .map(|color| color.to_string()),
    })
}
