#![forbid(unsafe_code)]
//! Demo driver: builds a sample ledger with three participants, closes a few
//! blocks (proof-of-work by default), and prints final balances and the
//! chain's integrity verdict.

use clap::Parser;
use paychain::config::load_config;
use paychain::crypto::KeyPair;
use paychain::ledger::{valid_chain, Ledger};
use paychain::miner::{BlockCloser, ImmediateCloser, PowMiner};
use paychain::transaction::Transaction;
use std::collections::HashMap;

#[derive(Parser)]
#[command(
    name = "paychain-simulate",
    about = "Build a sample proof-of-work ledger with three participants"
)]
struct Args {
    /// Leading hex zeros required of each mined block hash
    #[arg(long)]
    difficulty: Option<usize>,

    /// Worker threads for the nonce search
    #[arg(long)]
    threads: Option<usize>,

    /// Close blocks immediately (nonce 0) instead of mining them
    #[arg(long)]
    no_pow: bool,

    /// Path to the TOML config file
    #[arg(long, default_value = "paychain.toml")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args.config)?;
    let difficulty = args.difficulty.unwrap_or(config.miner.difficulty);
    let threads = args.threads.unwrap_or(config.miner.threads);

    // Three participants, each with their own key pair
    let names = ["you", "alice", "bob"];
    let mut keys: HashMap<&str, KeyPair> = HashMap::new();
    for name in names {
        keys.insert(name, KeyPair::generate());
    }

    // Genesis: "you" mints the initial supply with a self-transfer
    let you = &keys["you"];
    let tx0 = Transaction::create(you, &you.account_id(), config.genesis.initial_amount)?;
    let mut ledger = Ledger::new(vec![tx0])?;
    println!(
        "Genesis block gives you {} tokens",
        config.genesis.initial_amount
    );

    let closer: Box<dyn BlockCloser> = if args.no_pow {
        println!("Closing blocks without proof-of-work\n");
        Box::new(ImmediateCloser)
    } else {
        println!(
            "Mining blocks at difficulty {} with {} thread(s)\n",
            difficulty, threads
        );
        Box::new(PowMiner::new(difficulty).with_threads(threads))
    };

    // Two transfers per block
    let planned = [
        ("you", "alice", 30),
        ("you", "bob", 20),
        ("alice", "bob", 10),
        ("you", "alice", 25),
        ("bob", "alice", 5),
        ("you", "bob", 15),
        ("alice", "you", 8),
        ("bob", "you", 12),
        ("you", "alice", 10),
        ("bob", "alice", 7),
    ];

    let mut total_elapsed = 0.0;
    for block_txs in planned.chunks(2) {
        println!("Creating block {} with transactions:", ledger.blocks().len());
        for (sender, receiver, amount) in block_txs {
            println!("  {} -> {}: {} tokens", sender, receiver, amount);
            let tx = Transaction::create(&keys[sender], &keys[receiver].account_id(), *amount)?;
            if let Err(e) = ledger.add_transaction(tx) {
                println!("  Skipped: {}", e);
            }
        }

        let closed = closer.close(&mut ledger, None)?;
        total_elapsed += closed.elapsed.as_secs_f64();
        println!(
            "Closed block with nonce {} in {:.2}s",
            closed.block.nonce,
            closed.elapsed.as_secs_f64()
        );
        println!("Block hash: {}\n", closed.block.hash()?);
    }

    println!("Total time spent closing blocks: {:.2}s", total_elapsed);
    println!("Number of blocks: {}", ledger.blocks().len());
    println!("Chain valid: {}", valid_chain(ledger.blocks()));

    let balances = ledger.get_balances();
    println!("\nFinal balances:");
    for name in names {
        let account = keys[name].account_id();
        println!("{}: {} tokens", name, balances.get(&account).unwrap_or(&0));
    }

    Ok(())
}
