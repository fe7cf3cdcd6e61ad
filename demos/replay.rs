//! Example: step through the table fill at a fixed pace.
//!
//! Run with:
//! `cargo run --example replay -- 10,20,30,40`

use std::{env, thread, time::Duration};

use chain_dp::{DimensionSequence, Replay};

fn main() {
    let input = env::args()
        .nth(1)
        .unwrap_or_else(|| "5, 10, 3, 12, 5, 50, 6".to_string());
    let dims = match DimensionSequence::parse(&input) {
        Ok(dims) => dims,
        Err(err) => {
            eprintln!("invalid dimensions: {err}");
            std::process::exit(2);
        }
    };

    let mut replay = Replay::new(&dims);
    while let Some(step) = replay.advance() {
        println!("{step}");
        thread::sleep(Duration::from_millis(300));
    }
    println!("progress: {:.0}%", replay.progress() * 100.0);
}
