//! A document of developer records, with the syntax built by hand.
//!
//! Run with: cargo run --example developers

use flatsyntax::{Syntax, Value};
use std::error::Error;

const DOCUMENT: &str = "Tarik Amine 500 flat:12,grid:3
Mohammed Ali flat:1
Ada Lovelace";

fn main() -> Result<(), Box<dyn Error>> {
    let repo = Syntax::object(vec![("name", Syntax::string()), ("stars", Syntax::number())])?;
    let developer = Syntax::object_with(
        vec![
            ("first_name", Syntax::string()),
            ("last_name", Syntax::string()),
            ("followers", Syntax::optional(Syntax::number(), 0)),
            (
                "repos",
                Syntax::optional(Syntax::array(repo), Value::Array(vec![])),
            ),
        ],
        " ",
    )?;
    let document = Syntax::array_with(developer, "\n");

    // Parse every line into a record
    let developers = document.parse(DOCUMENT)?;
    println!("Parsed as JSON:\n{}\n", serde_json::to_string_pretty(&developers)?);

    // Missing followers and repos fall back to their defaults
    if let Some(records) = developers.as_array() {
        for record in records {
            let name = record.get("first_name").and_then(Value::as_str).unwrap_or("?");
            let stars: f64 = record
                .get("repos")
                .and_then(Value::as_array)
                .map(|repos| repos.iter().filter_map(|r| r.get("stars")?.as_f64()).sum())
                .unwrap_or(0.0);
            println!("{} has {} stars", name, stars);
        }
    }

    // Dump back: followers are written out, an empty trailing repo list is left off
    let text = document.dump(&developers)?;
    println!("\nDumped:\n{}", text);
    assert_eq!(document.parse(&text)?, developers);
    println!("✓ Round-trip successful");

    Ok(())
}
