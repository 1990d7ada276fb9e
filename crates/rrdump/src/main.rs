use clap::Parser;
use std::io::{stdin, Read};
use std::process;

use rr_types::protocol::types::ResourceRecord;

// the doc comments for this struct turn into the CLI help text
#[derive(Parser)]
/// Decode DNS resource records from hex-encoded wire data and print
/// one `owner ttl class type rdata` line per record.
///
/// The input should be the hex dump of a whole message buffer, so
/// that compression pointers inside records resolve; whitespace in
/// the hex is ignored.  Reads from stdin when no argument is given.
struct Args {
    /// Hex-encoded octets
    #[clap(value_parser)]
    hex: Option<String>,

    /// Offset of the first record within the buffer
    #[clap(short, long, default_value_t = 0)]
    offset: usize,

    /// Number of records to decode; the whole rest of the buffer if
    /// not given
    #[clap(short, long)]
    count: Option<usize>,
}

fn main() {
    let args = Args::parse();

    let input = match args.hex {
        Some(hex) => hex,
        None => {
            let mut buf = String::new();
            if let Err(err) = stdin().read_to_string(&mut buf) {
                eprintln!("error reading hex from stdin: {err:?}");
                process::exit(1);
            }
            buf
        }
    };

    let input = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    let octets = match hex::decode(&input) {
        Ok(octets) => octets,
        Err(err) => {
            eprintln!("error decoding hex: {err}");
            process::exit(1);
        }
    };

    let mut offset = args.offset;
    let mut remaining = args.count;
    while offset < octets.len() && remaining != Some(0) {
        match ResourceRecord::from_octets_at(&octets, offset) {
            Ok((record, next)) => {
                println!("{record}");
                offset = next;
            }
            Err(err) => {
                eprintln!("error decoding record at offset {offset}: {err}");
                process::exit(1);
            }
        }
        remaining = remaining.map(|n| n - 1);
    }
}
