use clap::Parser;
use std::io::{stdin, BufRead};
use std::process;

use rr_types::casing;

// the doc comments for this struct turn into the CLI help text
#[derive(Parser)]
/// Randomise the capitalisation of domain names, one coin toss per
/// letter.
///
/// Transforms the names given as arguments, or each line of stdin
/// when none are given.
struct Args {
    /// Names to transform
    #[clap(value_parser)]
    names: Vec<String>,
}

fn main() {
    let args = Args::parse();
    let mut rng = rand::rng();

    if args.names.is_empty() {
        for line in stdin().lock().lines() {
            match line {
                Ok(name) => println!("{}", casing::randomize(&name, &mut rng)),
                Err(err) => {
                    eprintln!("error reading names from stdin: {err:?}");
                    process::exit(1);
                }
            }
        }
    } else {
        for name in &args.names {
            println!("{}", casing::randomize(name, &mut rng));
        }
    }
}
