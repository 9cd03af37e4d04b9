//! Describing a syntax with grammar text.
//!
//! Run with: cargo run --example grammar

use flatsyntax::{value, Grammar, GrammarOptions, Syntax};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // One developer per line, fields separated by spaces
    let grammar = "[{first_name, last_name, followers: (number: 0), \
                   repos: ([{name: string, stars:number}]:[]) | }|\n]";
    let document: Syntax = grammar.parse()?;

    let developers = document.parse("Tarik Amine 500 flat:12,grid:3\nAda Lovelace")?;
    println!("Parsed: {}\n", developers);

    // Grammar text can be written back from any syntax tree
    let written = flatsyntax::grammar(&document)?;
    println!("Grammar written back:\n{}\n", written);
    assert_eq!(flatsyntax::syntax(&written)?, document);

    // Default separators are configurable
    let options = GrammarOptions::new()
        .with_array_separator(";")
        .with_object_separator("=");
    let pairs = Grammar::with_options(options).parse("[{key, value: number}]")?;
    let text = pairs.dump(&value!([{ "key": "width", "value": 80 }, { "key": "height", "value": 24 }]))?;
    println!("Dumped with custom separators: {}", text);
    assert_eq!(text, "width=80;height=24");

    Ok(())
}
