//! Build script for cadence-firmware
//!
//! - Passes linker scripts for cortex-m-rt and defmt
//! - Validates machine.toml at compile time
//! - Assembles the recipes and emits them as constants

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use cadence_core::config::{MachineConfig, ServoConfig, TimingConfig};
use cadence_core::recipe::{assemble, Recipe};
use cadence_core::NUM_ACTUATORS;
use serde::Deserialize;

/// On-disk layout of machine.toml
#[derive(Deserialize)]
struct MachineFile {
    #[serde(default)]
    console: ConsoleSection,
    timing: TimingConfig,
    servo: ServoConfig,
    #[serde(default)]
    recipe: Vec<RecipeSection>,
}

#[derive(Deserialize)]
struct ConsoleSection {
    baudrate: u32,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self { baudrate: 9600 }
    }
}

#[derive(Deserialize)]
struct RecipeSection {
    name: String,
    program: String,
}

fn main() {
    setup_linker();

    let file = load_config();
    let recipes = validate_config(&file);
    emit_config(&file, &recipes);
}

/// Linker arguments for the embedded target
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse machine.toml
fn load_config() -> MachineFile {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        fail(
            "machine.toml not found",
            &["The firmware requires a machine.toml in the cadence-firmware directory."],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read machine.toml", &[&e.to_string()]),
    };

    match toml::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid machine.toml", &lines)
        }
    }
}

/// Check values and assemble every recipe
fn validate_config(file: &MachineFile) -> Vec<Recipe> {
    let mut errors = Vec::new();

    let machine = MachineConfig {
        timing: file.timing,
        servo: file.servo,
    };
    if let Err(e) = machine.validate() {
        errors.push(format!("[timing]/[servo] rejected: {:?}", e));
    }

    if file.console.baudrate == 0 {
        errors.push("[console] baudrate must be non-zero".to_string());
    }

    if file.recipe.len() != NUM_ACTUATORS {
        errors.push(format!(
            "expected {} [[recipe]] sections (one per actuator), found {}",
            NUM_ACTUATORS,
            file.recipe.len()
        ));
    }

    let mut recipes = Vec::new();
    for (i, section) in file.recipe.iter().enumerate() {
        match assemble(&section.program) {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => errors.push(format!(
                "recipe {} ('{}'): {:?}",
                i, section.name, e
            )),
        }
    }

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("Invalid machine configuration", &lines);
    }

    println!("cargo:warning=machine.toml validated successfully");
    recipes
}

/// Write the generated constants to OUT_DIR/machine.rs
fn emit_config(file: &MachineFile, recipes: &[Recipe]) {
    let mut out = String::new();
    let t = &file.timing;
    let s = &file.servo;

    let _ = writeln!(out, "// Generated from machine.toml by build.rs");
    let _ = writeln!(out, "pub const CONSOLE_BAUDRATE: u32 = {};", file.console.baudrate);
    let _ = writeln!(
        out,
        "pub const TIMING: cadence_core::config::TimingConfig = \
         cadence_core::config::TimingConfig {{ move_unit_us: {}, wait_unit_us: {}, settle_us: {} }};",
        t.move_unit_us, t.wait_unit_us, t.settle_us
    );
    let _ = writeln!(
        out,
        "pub const SERVO: cadence_core::config::ServoConfig = \
         cadence_core::config::ServoConfig {{ pulse_widths: {:?}, period_ticks: {}, tick_hz: {} }};",
        s.pulse_widths, s.period_ticks, s.tick_hz
    );

    let _ = writeln!(out, "pub const RECIPE_NAMES: [&str; {}] = [", recipes.len());
    for section in &file.recipe {
        let _ = writeln!(out, "    {:?},", section.name);
    }
    let _ = writeln!(out, "];");

    let _ = writeln!(out, "pub const RECIPES: [&[u8]; {}] = [", recipes.len());
    for recipe in recipes {
        let _ = writeln!(out, "    &{:?},", recipe.as_bytes());
    }
    let _ = writeln!(out, "];");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    if let Err(e) = fs::write(out_dir.join("machine.rs"), out) {
        fail("Failed to write generated config", &[&e.to_string()]);
    }
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.chars().count() > 62 {
                format!("{}...", line.chars().take(59).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
