use anyhow::{Context, Result};
use chrono::TimeZone;
use std::env;
use std::fs;
use std::process::Command;
use vergen_gitcl::{Emitter, GitclBuilder};

fn main() -> Result<()> {
    // Generate git information
    let gitcl = GitclBuilder::default()
        .describe(true, true, Some("[0-9]*"))
        .build()?;

    let gitcl_res = Emitter::default()
        .idempotent()
        .fail_on_error()
        .add_instructions(&gitcl)
        .and_then(|emitter| emitter.emit());

    if let Err(e) = gitcl_res {
        eprintln!("error occurred while generating instructions: {e:?}");
        Emitter::default().idempotent().fail_on_error().emit()?;
    }

    // Reproducible builds pin the timestamp
    let now = match env::var("SOURCE_DATE_EPOCH") {
        Ok(val) => {
            let secs = val
                .parse::<i64>()
                .context("SOURCE_DATE_EPOCH is not an integer")?;
            chrono::Utc
                .timestamp_opt(secs, 0)
                .single()
                .context("SOURCE_DATE_EPOCH is out of range")?
        }
        Err(_) => chrono::Utc::now(),
    };

    println!(
        "cargo:rustc-env=BUILD_TIMESTAMP={}",
        now.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let flaccid_version = flaccid_version_from_metadata().unwrap_or_else(|_| {
        flaccid_version_fallback().unwrap_or_else(|_| "unknown".to_string())
    });
    println!("cargo:rustc-env=FLACCID_VERSION={flaccid_version}");

    println!("cargo:rerun-if-changed=flaccid/Cargo.toml");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    Ok(())
}

/// Version of the flaccid library as resolved by cargo, local or published.
fn flaccid_version_from_metadata() -> Result<String> {
    let output = Command::new(env::var("CARGO").unwrap_or_else(|_| "cargo".to_string()))
        .args(["metadata", "--format-version", "1"])
        .output()?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed");
    }

    let metadata: serde_json::Value = serde_json::from_slice(&output.stdout)?;

    let from_packages = metadata["packages"].as_array().and_then(|packages| {
        packages
            .iter()
            .find(|package| package["name"].as_str() == Some("flaccid"))
            .and_then(|package| package["version"].as_str())
    });

    if let Some(version) = from_packages {
        return Ok(version.to_string());
    }

    // Resolve graph ids look like "flaccid 0.1.0 (registry+...)"
    let from_resolve = metadata["resolve"]["nodes"].as_array().and_then(|nodes| {
        nodes.iter().find_map(|node| {
            let id = node["id"].as_str()?;
            let rest = id.strip_prefix("flaccid ")?;
            rest.split(' ').next()
        })
    });

    match from_resolve {
        Some(version) => Ok(version.to_string()),
        None => anyhow::bail!("flaccid package not found in metadata"),
    }
}

fn flaccid_version_fallback() -> Result<String> {
    let toml_content = fs::read_to_string("flaccid/Cargo.toml")?;

    toml_content
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("version") && line.contains('='))
        .and_then(|line| line.split_once('='))
        .map(|(_, value)| value.trim().trim_matches('"').trim_matches('\'').to_string())
        .context("Could not find version in flaccid/Cargo.toml")
}
