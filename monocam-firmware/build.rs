//! Build script for monocam-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates camera.toml and embeds it as `CAMERA_CONFIG`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use monocam_core::config::PipelineConfig;

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate camera.toml, then write it out as Rust
fn generate_config() {
    println!("cargo:rerun-if-changed=camera.toml");

    let config_path = Path::new("camera.toml");

    let config = if config_path.exists() {
        let content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) => {
                panic!(
                    "\n\
                    ╔══════════════════════════════════════════════════════════════════╗\n\
                    ║  ERROR: Failed to read camera.toml                               ║\n\
                    ║                                                                  ║\n\
                    ║  Error: {:<56} ║\n\
                    ╚══════════════════════════════════════════════════════════════════╝\n",
                    e
                );
            }
        };
        parse_config(&content)
    } else {
        println!("cargo:warning=camera.toml not found, using built-in defaults");
        PipelineConfig::DEFAULT
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid value in camera.toml                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&e.to_string())
        );
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("camera_config.rs"), render_config(&config)).unwrap();

    println!(
        "cargo:warning=camera.toml validated: source {}, threshold {}, {} ms/frame",
        config.source, config.brightness_threshold, config.frame_delay_ms
    );
}

/// Deserialize the TOML text, panicking with a readable box on errors
fn parse_config(content: &str) -> PipelineConfig {
    match toml::from_str(content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid camera.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Emit the configuration as a Rust constant
fn render_config(config: &PipelineConfig) -> String {
    format!(
        "/// Pipeline configuration generated from camera.toml\n\
         pub const CAMERA_CONFIG: PipelineConfig = PipelineConfig {{\n\
        \x20   source: Resolution::new({}, {}),\n\
        \x20   brightness_threshold: {},\n\
        \x20   frame_delay_ms: {},\n\
        \x20   max_retries: {},\n\
        \x20   startup_delay_ms: {},\n\
        \x20   error_saturation_limit: {},\n\
        \x20   stats_interval: {},\n\
        \x20   self_test: {},\n\
         }};\n",
        config.source.width,
        config.source.height,
        config.brightness_threshold,
        config.frame_delay_ms,
        config.max_retries,
        config.startup_delay_ms,
        config.error_saturation_limit,
        config.stats_interval,
        config.self_test,
    )
}
