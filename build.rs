// build.rs

use glob::glob;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A matrix file under `data/` paired with its reference spectrum.
#[derive(Debug)]
struct ReferenceInstance {
    pub name: String,
    pub matrix_path: PathBuf,
    pub eig_path: PathBuf,
}

/// Discovers all reference instances by scanning the `data/` directory.
///
/// A matrix file takes part only if a `.eig` file with the same stem sits next to it.
fn get_all_instances(data_dir: &Path) -> Vec<ReferenceInstance> {
    ["csv", "txt", "mtx"]
        .into_iter()
        .flat_map(|ext| {
            glob(&format!("{}/*.{ext}", data_dir.display())).expect("Failed to read glob pattern")
        })
        .filter_map(|entry| {
            let matrix_path = entry.ok()?;
            let eig_path = matrix_path.with_extension("eig");
            if !eig_path.exists() {
                return None;
            }
            let stem = matrix_path.file_stem()?.to_string_lossy();
            let ext = matrix_path.extension()?.to_string_lossy();
            let name: String = format!("{stem}_{ext}")
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
                .collect();
            Some(ReferenceInstance {
                name,
                matrix_path,
                eig_path,
            })
        })
        .collect()
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let data_dir = Path::new(&manifest_dir).join("data");
    println!("cargo:rerun-if-changed=data");

    // Get the Cargo output directory where we will place the generated code.
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("correctness_tests.rs");
    let mut file = BufWriter::new(File::create(&dest_path).unwrap());

    // Generate a separate `#[test]` function for each instance.
    for instance in get_all_instances(&data_dir) {
        let matrix_path_str = instance.matrix_path.to_str().unwrap();
        let eig_path_str = instance.eig_path.to_str().unwrap();

        writeln!(
            file,
            r#"
#[test]
fn reference_{name}() -> anyhow::Result<()> {{
    let case = ReferenceCase {{
        name: "{name}",
        matrix_path: "{matrix_path}".into(),
        eig_path: "{eig_path}".into(),
    }};
    run_reference_case(&case)
}}
"#,
            name = instance.name,
            matrix_path = matrix_path_str.escape_default(),
            eig_path = eig_path_str.escape_default()
        )
        .unwrap();
    }
}
