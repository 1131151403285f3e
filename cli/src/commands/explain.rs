use anyhow::Result;
use cambiatus_eos_lib::failure::{extract_failure, translation_key, UNKNOWN_ERROR};
use std::fs;
use std::path::Path;

pub fn run(input: &str, namespace: &str) -> Result<()> {
    let path = Path::new(input);
    let raw = if path.is_file() {
        fs::read_to_string(path)?
    } else {
        input.to_string()
    };

    println!("Message: {}", extract_failure(&raw));
    println!("Key:     {}", translation_key(namespace, Some(&raw), UNKNOWN_ERROR));

    Ok(())
}
