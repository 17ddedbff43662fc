use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};

use halfkp_eval::board::START_FEN;
use halfkp_eval::nnue::slot;
use halfkp_eval::{Board, Evaluator, NnueConfig, NnueNetwork};

const USAGE: &str = "usage: halfkp_eval [--net PATH] [--synthetic SEED] [--verify DEPTH] [FEN ...]";

struct Args {
    synthetic: Option<u64>,
    verify_depth: Option<usize>,
    fens: Vec<String>,
}

fn parse_args(config: &mut NnueConfig) -> Result<Args, String> {
    let mut args = Args {
        synthetic: None,
        verify_depth: None,
        fens: Vec::new(),
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--net" => {
                let path = iter.next().ok_or("--net needs a path")?;
                config.apply_option("evalfile", &path);
            }
            "--synthetic" => {
                let seed = iter.next().ok_or("--synthetic needs a seed")?;
                args.synthetic = Some(seed.parse().map_err(|_| format!("bad seed '{seed}'"))?);
            }
            "--verify" => {
                let depth = iter.next().ok_or("--verify needs a depth")?;
                args.verify_depth =
                    Some(depth.parse().map_err(|_| format!("bad depth '{depth}'"))?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => args.fens.push(arg),
        }
    }
    if args.fens.is_empty() {
        args.fens.push(START_FEN.to_string());
    }
    Ok(args)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = NnueConfig::from_env();
    let args = match parse_args(&mut config) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let slot = slot::global();
    let network = match args.synthetic {
        Some(seed) => {
            info!("Using synthetic network (seed {seed})");
            let network = Arc::new(NnueNetwork::synthetic(seed));
            slot.install(Arc::clone(&network));
            network
        }
        None => match slot.load(&config.net_path) {
            Ok(network) => network,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };
    let mut eval = Evaluator::with_config(network, &config);

    let mut status = ExitCode::SUCCESS;
    for fen in &args.fens {
        let mut board = match Board::try_from_fen(fen) {
            Ok(board) => board,
            Err(e) => {
                error!("{fen}: {e}");
                status = ExitCode::FAILURE;
                continue;
            }
        };
        eval.rebuild_accumulator(&board);
        println!("{fen}: {}", eval.evaluate(&board, true));

        if let Some(depth) = args.verify_depth {
            match eval.perft_verify(&mut board, depth) {
                Ok(nodes) => println!("  verified {nodes} nodes at depth {depth}"),
                Err(e) => {
                    error!("{fen}: {e}");
                    status = ExitCode::FAILURE;
                }
            }
        }
    }
    slot.release();
    status
}
