//! Reading parse and dump errors.
//!
//! Run with: cargo run --example errors

use flatsyntax::{value, Syntax};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let repos: Syntax = "[{name, stars: number}]".parse()?;

    // The outermost error locates the problem in the whole input
    let err = match repos.parse("flat:12,grid:many") {
        Ok(value) => return Err(format!("unexpected success: {}", value).into()),
        Err(err) => err,
    };
    println!("{}\n", err);
    println!("Position: {:?}", err.position());
    println!("Extra: {}\n", serde_json::to_string(&err.extra())?);

    // Each level of the chain adds its own context
    for (depth, cause) in err.chain().enumerate() {
        println!(
            "{:indent$}{} at {:?}: {}",
            "",
            cause.code().map(|c| c.as_str()).unwrap_or("-"),
            cause.position(),
            cause.message(),
            indent = depth * 2
        );
    }

    // Dump errors name the field or item that could not be written
    if let Err(err) = repos.dump(&value!([{ "name": "flat", "stars": "many" }])) {
        println!("\n{}", err);
        if let Some(cause) = err.root_cause().input() {
            println!("Rejected value: {}", cause);
        }
    }

    Ok(())
}
