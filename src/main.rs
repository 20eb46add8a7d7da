//! The chesscore command line: lists moves, counts variations, plays random games and dumps the
//! attack tables.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand, crate_version};
use log::info;
use simplelog::{WriteLogger, LevelFilter, Config};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use chrono::Local;
use chesscore::chess::{self, variations, AttackCache, Game, Position, PromotionMode, Square};
use chesscore::chess::START_FEN;

mod config;
use config::Settings;

fn main() -> Result<(), Error> {
    let fen_arg = Arg::with_name("fen")
        .value_name("FEN_STRING")
        .help("Position in Forsyth-Edwards Notation (FEN). Defaults to the configured or \
               standard starting position.");

    let matches =
        App::new("chesscore")
            .version(crate_version!())
            .author("Mike Leany")
            .about("Bitboard move generation and variation counting.")
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .arg(Arg::with_name("config")
                .long("config")
                .short("c")
                .global(true)
                .value_name("CONFIG_FILE")
                .takes_value(true)
                .help("Reads settings from the given YAML file \
                       [default: ~/.chesscore/config.yaml]"))
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .help("Sets the log file if logging is turned on [default: chesscore.log]"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .help("Sets the log level if logging is turned on [default: info]"))
            .arg(Arg::with_name("promotions")
                .long("promotions")
                .short("p")
                .global(true)
                .value_name("MODE")
                .takes_value(true)
                .possible_values(&["none", "all", "queen", "queen-knight"])
                .help("Which promotion moves to generate [default: none]"))
            .subcommand(SubCommand::with_name("moves")
                .about("Lists the moves available in a position")
                .arg(fen_arg.clone()))
            .subcommand(SubCommand::with_name("counts")
                .about("Counts the number of variations from a given starting position \
                        to a specified\ndepth. Defaults to the standard starting position.")
                .arg(Arg::with_name("depth")
                    .long("depth")
                    .short("d")
                    .value_name("DEPTH")
                    .takes_value(true)
                    .required(true)
                    .help("Depth to search the position"))
                .arg(fen_arg.clone().multiple(true)))
            .subcommand(SubCommand::with_name("play")
                .about("Plays random moves from a position")
                .arg(Arg::with_name("plies")
                    .long("plies")
                    .short("n")
                    .value_name("PLIES")
                    .takes_value(true)
                    .default_value("20")
                    .help("Number of half moves to play"))
                .arg(Arg::with_name("seed")
                    .long("seed")
                    .value_name("SEED")
                    .takes_value(true)
                    .help("Seeds the random number generator"))
                .arg(fen_arg))
            .subcommand(SubCommand::with_name("cache")
                .about("Prints the attack tables for one square")
                .arg(Arg::with_name("square")
                    .value_name("SQUARE")
                    .required(true)
                    .help("The square, such as e4")))
            .get_matches();

    let settings = match matches.value_of_os("config") {
        Some(path) => Settings::load(&PathBuf::from(path))?,
        None => Settings::load_if_present(&config::app_dir().join(config::CONFIG_FILE))?,
    };

    init_logging(&matches, &settings)?;

    let cache = Arc::new(AttackCache::build()?);
    let promotions: PromotionMode = matches
        .value_of("promotions")
        .or_else(|| settings.get("promotions"))
        .unwrap_or("none")
        .parse()
        .map_err(|_| Error("invalid promotion mode".to_owned()))?;
    let default_fen = settings.get("fen").unwrap_or(START_FEN).to_owned();

    match matches.subcommand() {
        ("moves", Some(matches)) => {
            let mut game = Game::new(cache);
            game.set_promotions(promotions);
            game.load_fen(matches.value_of("fen").unwrap_or(&default_fen))?;

            println!("{:#}\n", game.position()?);
            let moves = game.moves()?;
            for mv in moves {
                println!("{}", mv);
            }
            println!("{} moves", moves.len());
        },
        ("counts", Some(matches)) => {
            let depth = matches
                .value_of("depth")
                .expect("INFALLIBLE")
                .parse()
                .map_err(|_| {Error("depth must be numeric".to_owned())})?;
            let fens: Vec<&str> = match matches.values_of("fen") {
                Some(fens) => fens.collect(),
                None => vec![default_fen.as_str()],
            };

            println!();
            for fen in fens {
                let pos: Position = fen
                    .parse()
                    .map_err(|err| {Error(format!("{}: {}", fen, err))})?;
                println!("{}", fen);
                let start = Local::now();
                let count = variations::print(&cache, &pos, depth);
                let elapsed = Local::now() - start;
                println!("Depth {} total:\t{:12}", depth, count);
                println!("Time:\t\t{:9} ms\n", elapsed.num_milliseconds());
                info!("depth {} from '{}': {} variations in {}", depth, fen, count, elapsed);
            }
        },
        ("play", Some(matches)) => play(matches, cache, promotions, &default_fen)?,
        ("cache", Some(matches)) => {
            let square = matches.value_of("square").expect("INFALLIBLE");
            let sq: Square = square.parse()
                .map_err(|_| {Error(format!("{}: invalid square", square))})?;
            println!("{}", cache.describe(sq));
        },
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logging(matches: &ArgMatches, settings: &Settings) -> Result<(), Error> {
    let log_file = PathBuf::from(matches
        .value_of("log-file")
        .or_else(|| settings.get("log-file"))
        .unwrap_or("chesscore.log"));
    let log_level = match matches.value_of("log-level").or_else(|| settings.get("log-level")) {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") | None => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some(level) => return Err(Error(format!("{}: invalid log level", level))),
    };

    let _logger = if matches.is_present("log") || settings.flag("log") {
        WriteLogger::init(
            log_level,
            Config::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink())
    };

    Ok(())
}

fn play(
    matches: &ArgMatches,
    cache: Arc<AttackCache>,
    promotions: PromotionMode,
    default_fen: &str,
) -> Result<(), Error> {
    let plies: usize = matches
        .value_of("plies")
        .expect("INFALLIBLE")
        .parse()
        .map_err(|_| {Error("plies must be numeric".to_owned())})?;
    let mut rng = match matches.value_of("seed") {
        Some(seed) => StdRng::seed_from_u64(seed.parse()
            .map_err(|_| {Error("seed must be numeric".to_owned())})?),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new(cache.clone());
    game.set_promotions(promotions);
    game.load_fen(matches.value_of("fen").unwrap_or(default_fen))?;

    for _ in 0..plies {
        let pos = game.position()?;
        if pos.king_square(pos.turn()).is_none() {
            println!("{} has no king", pos.turn());
            break;
        }

        let mv = match game.moves()?.choose(&mut rng) {
            Some(mv) => *mv,
            None => {
                println!("{} has no moves", pos.turn());
                break;
            }
        };

        let number = pos.fullmove_number();
        let turn = pos.turn();
        game.play_str(&mv.to_string())?;

        let pos = game.position()?;
        let check = if pos.is_in_check(&cache, pos.turn()) { "+" } else { "" };
        match turn {
            chess::Color::White => println!("{:3}. {}{}", number, mv, check),
            chess::Color::Black => println!("{:3}. ... {}{}", number, mv, check),
        }
    }

    let pos = game.position()?;
    println!("\n{:#}\n\n{}", pos, pos);

    Ok(())
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<chess::error::Error> for Error {
    fn from(err: chess::error::Error) -> Self {
        Error(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error(err.to_string())
    }
}
