//! `rim-display` — decode a CoRIM file (signed or plain) and print it.
//!
//! Usage:
//!   rim-display <corim-file> [--show-tags]

use rimlens::render::{render, RenderOptions};
use rimlens_core::{decode_container, TagRegistry};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut file = None;
    let mut show_entries = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "--show-tags" => show_entries = true,
            other => file = Some(other.to_string()),
        }
    }

    let Some(file) = file else {
        eprintln!("usage: rim-display <corim-file> [--show-tags]");
        std::process::exit(1);
    };

    let bytes = match std::fs::read(&file) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{file}: {e}");
            std::process::exit(1);
        }
    };

    let registry = TagRegistry::builtin();
    match decode_container(&bytes, &registry) {
        Ok(result) => print!("{}", render(&result, &RenderOptions { show_entries })),
        Err(e) => {
            eprintln!("{file}: error decoding CoRIM (signed or plain): {e}");
            std::process::exit(1);
        }
    }
}
