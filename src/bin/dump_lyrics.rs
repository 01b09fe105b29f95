//! Debug tool to show how a lyrics text is split and indexed.
//!
//! Usage:
//!   `cargo run --bin dump_lyrics -- <lyrics.txt>`
//!   `cargo run --bin dump_lyrics -- <lyrics.txt> --json`
//!   `pbpaste | cargo run --bin dump_lyrics -- -`
//!
//! Prints each section with the type it would be stored as, followed by
//! every line and the words it would be associated with.

use std::env;
use std::io::{self, Read};

use anyhow::{Context, Result};
use serde_json::json;
use songbase::ingest::resolve_section_types;
use songbase::lyrics::{segment, tokenize};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <lyrics.txt|-> [--json]", args[0]);
        std::process::exit(1);
    }

    let text = read_input(&args[1])?;
    let lines: Vec<&str> = text.lines().collect();

    if args.contains(&"--json".to_string()) {
        dump_json(&lines)
    } else {
        dump_sections(&lines);
        Ok(())
    }
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        return Ok(text);
    }

    Ok(fs_err::read_to_string(source)?)
}

fn dump_sections(lines: &[&str]) {
    let sections = segment(lines);
    let types = resolve_section_types(&sections);

    println!("=== {} sections ===", sections.len());
    for (section, section_type) in sections.iter().zip(&types) {
        let label = if section.label.is_empty() { "-" } else { section.label.as_str() };
        println!();
        println!("[{}] {} (label: {label})", section.order, section_type.name());
        for (order, line) in (1..).zip(&section.lines) {
            println!("  {order:>2}. {line}");
            println!("      words: {}", tokenize(line).join(", "));
        }
    }
}

fn dump_json(lines: &[&str]) -> Result<()> {
    let sections = segment(lines);
    let types = resolve_section_types(&sections);

    let out: Vec<_> = sections
        .iter()
        .zip(&types)
        .map(|(section, section_type)| {
            json!({
                "order": section.order,
                "label": section.label,
                "type": section_type,
                "lines": section.lines.iter().map(|line| json!({
                    "text": line,
                    "words": tokenize(line),
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&out).context("Failed to render sections")?);
    Ok(())
}
