// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence expansion tool.
//!
//! Reads a recurrence text block (a `DTSTART` line plus an `RRULE` line)
//! from the command line or stdin and prints the expanded occurrences.
//!
//! ```sh
//! cargo run --example expand -- $'DTSTART:19970902T090000\nRRULE:FREQ=WEEKLY;COUNT=5;BYDAY=TU,TH'
//! ```

use std::error::Error;
use std::io::Read as _;

use ritmo_core::{Mode, Rule};

const DEFAULT_LIMIT: usize = 50;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let text = match args.next() {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let limit = match args.next() {
        Some(limit) => limit.parse()?,
        None => DEFAULT_LIMIT,
    };

    let rule = Rule::parse(&text, Mode::Strict)?;
    println!("{rule}");
    println!();

    for moment in rule.all(Some(limit))? {
        println!("{moment}");
    }
    Ok(())
}
