use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use rayon::prelude::*;
use s4pi_codec::{resource_type_name, ResourceKey, TypedResource, REGISTRY};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_debug_mode() -> bool {
    std::env::var("S4PI_DEBUG_MODE").map(|v| v == "1").unwrap_or(false)
}

/// Result of pushing one resource file through decode and encode.
#[derive(Debug)]
enum Outcome {
    /// Re-encoding produced the original bytes.
    Identical,
    /// Different bytes that decode to the same value.
    Equivalent,
    Failed(String),
}

fn main() -> Result<()> {
    let default_filter = if is_debug_mode() { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_filter));

    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("--help");

    match cmd {
        "check" => {
            if args.iter().any(|a| a == "--help") {
                println!("Usage: s4pi-codec check <path>...");
                println!("\nRound-trips every exported resource file under the given paths.");
                println!("File names must carry the resource key, e.g.");
                println!("  S4_319E4F1D_00000000_0000000000012345.bin");
                return Ok(());
            }
            if args.len() < 3 {
                return Err(anyhow!("Usage: s4pi-codec check <path>...\nTry 's4pi-codec check --help' for more information."));
            }
            let paths: Vec<PathBuf> = args[2..].iter().map(PathBuf::from).collect();
            run_check(&paths)?;
        }
        "types" => run_types(),
        "--help" | "-h" | "help" => {
            println!("S4PI Resource Codec");
            println!("\nUsage: s4pi-codec <command> [args]");
            println!("\nAvailable commands:");
            println!("  check       Decode and re-encode exported resource files");
            println!("  types       List the resource types with a dedicated codec");
            println!("\nRun 's4pi-codec <command> --help' for more information on a specific command.");
        }
        _ => {
            println!("Unknown command: {}", cmd);
            println!("Available commands: check, types");
            println!("Run 's4pi-codec --help' for usage information.");
        }
    }
    Ok(())
}

fn run_types() {
    println!("Registered resource types:");
    for registration in REGISTRY {
        println!("  0x{:08X}  {}", registration.res_type, registration.name);
    }
}

fn collect_files(paths: &[PathBuf]) -> Vec<(ResourceKey, PathBuf)> {
    let mut files = Vec::new();
    for root in paths {
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            match ResourceKey::from_file_name(&name) {
                Some(key) => files.push((key, entry.path().to_path_buf())),
                None => debug!("Skipping {:?}: no resource key in the name", entry.path()),
            }
        }
    }
    files.sort();
    files
}

fn round_trip(key: &ResourceKey, path: &Path) -> Result<Outcome> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;

    let decoded = match TypedResource::from_bytes(key.res_type, &data) {
        Ok(decoded) => decoded,
        Err(e) => return Ok(Outcome::Failed(format!("decode: {}", e))),
    };
    let encoded = match decoded.to_bytes() {
        Ok(encoded) => encoded,
        Err(e) => return Ok(Outcome::Failed(format!("encode: {}", e))),
    };
    if encoded == data {
        return Ok(Outcome::Identical);
    }

    match TypedResource::from_bytes(key.res_type, &encoded) {
        Ok(again) if again == decoded => Ok(Outcome::Equivalent),
        Ok(_) => Ok(Outcome::Failed("re-decoded value differs".to_string())),
        Err(e) => Ok(Outcome::Failed(format!("re-decode: {}", e))),
    }
}

fn run_check(paths: &[PathBuf]) -> Result<()> {
    let files = collect_files(paths);
    if files.is_empty() {
        info!("No resource files found.");
        return Ok(());
    }
    info!("Checking {} resource files.", files.len());

    let results: Vec<(ResourceKey, PathBuf, Outcome)> = files
        .into_par_iter()
        .map(|(key, path)| {
            let outcome = round_trip(&key, &path)?;
            Ok((key, path, outcome))
        })
        .collect::<Result<_>>()?;

    let mut identical = 0;
    let mut equivalent = 0;
    let mut failed = 0;
    for (key, path, outcome) in &results {
        let name = resource_type_name(key.res_type).unwrap_or("generic");
        match outcome {
            Outcome::Identical => identical += 1,
            Outcome::Equivalent => {
                equivalent += 1;
                debug!("{} {} re-encoded to different bytes", name, key);
            }
            Outcome::Failed(reason) => {
                failed += 1;
                warn!("{} {} ({}): {}", name, key, path.display(), reason);
            }
        }
    }

    println!("\n--- Round-trip Summary ---");
    println!("Identical:  {}", identical);
    println!("Equivalent: {}", equivalent);
    println!("Failed:     {}", failed);

    if failed > 0 {
        return Err(anyhow!("{} of {} resources failed to round-trip", failed, results.len()));
    }
    Ok(())
}
