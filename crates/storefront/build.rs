//! Build script for the storefront crate.
//!
//! Fingerprints static assets so templates can reference them under
//! immutable, cache-busted URLs.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Assets fingerprinted at build time: (source path, env var, derived stem, extension).
const ASSETS: &[(&str, &str, &str, &str)] = &[
    ("static/css/main.css", "CSS_HASH", "static/css/derived/main", "css"),
    ("static/js/toast.js", "JS_HASH", "static/js/derived/toast", "js"),
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");

    for (source, var, stem, ext) in ASSETS {
        fingerprint(Path::new(&manifest_dir), source, var, stem, ext);
    }
}

/// Hash `source` and copy it next to itself as `<stem>.<hash>.<ext>`.
///
/// Exposes the short hash to the crate as `env!(var)`.
fn fingerprint(manifest_dir: &Path, source: &str, var: &str, stem: &str, ext: &str) {
    let source_path = manifest_dir.join(source);
    println!("cargo:rerun-if-changed={}", source_path.display());

    let content = match fs::read(&source_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {source}: {e}");
            println!("cargo:rustc-env={var}=");
            return;
        }
    };

    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = &hash[..8];
    println!("cargo:rustc-env={var}={short_hash}");

    let derived_path = manifest_dir.join(format!("{stem}.{short_hash}.{ext}"));
    if let Some(parent) = derived_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create derived asset directory");
    }
    fs::copy(&source_path, &derived_path).expect("Failed to copy asset to derived directory");
}
