use std::env;
use std::fs;
use std::path::Path;

/// Files copied from the workspace root next to the built binary
const RUNTIME_FILES: &[&str] = &["config.toml"];

fn main() {
    // OUT_DIR is typically target/<profile>/build/backend-xxx/out
    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap();
    let target_dir = Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .expect("Could not find target profile directory");

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root");

    for file in RUNTIME_FILES {
        println!("cargo:rerun-if-changed=../../{}", file);

        let source = workspace_root.join(file);
        if !source.exists() {
            println!("cargo:warning={} not found at {:?}, using embedded default", file, source);
            continue;
        }

        let dest = target_dir.join(file);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create {:?}: {}", parent, e));
        }
        fs::copy(&source, &dest).unwrap_or_else(|e| panic!("Failed to copy {}: {}", file, e));
    }
}
