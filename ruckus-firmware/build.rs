//! Build script for ruckus-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates matrix.json at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_defaults();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate the compiled-in default configuration document
fn validate_defaults() {
    println!("cargo:rerun-if-changed=matrix.json");

    let path = Path::new("matrix.json");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail(&[format!("Failed to read matrix.json: {}", e)]),
    };

    let doc: serde_json::Value = match serde_json::from_str(&content) {
        Ok(doc) => doc,
        Err(e) => fail(&[format!("Invalid JSON in matrix.json: {}", e)]),
    };

    let Some(doc) = doc.as_object() else {
        fail(&["matrix.json must be a JSON object".to_string()]);
    };

    let mut errors = Vec::new();

    match doc.get("name") {
        Some(serde_json::Value::String(_)) => {}
        Some(_) => errors.push("'name' must be a string".to_string()),
        None => errors.push("missing 'name'".to_string()),
    }

    match doc.get("brightness").and_then(|b| b.as_u64()) {
        Some(level) if level <= 255 => {}
        Some(_) => errors.push("'brightness' must be 0-255".to_string()),
        None => errors.push("missing or non-integer 'brightness'".to_string()),
    }

    if let Some(color) = doc.get("color") {
        match color.as_str() {
            Some(text) if matches!(text.split(',').count(), 3 | 4) => {}
            _ => errors.push("'color' must be 3 or 4 comma-separated values".to_string()),
        }
    }

    if !errors.is_empty() {
        fail(&errors);
    }

    println!("cargo:warning=matrix.json validated successfully");
}

/// Abort the build with a boxed error listing
fn fail(errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: matrix.json is not a usable default configuration        ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
