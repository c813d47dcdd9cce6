//! Mock solver binary for integration testing
//!
//! Implements the external tool's output contract (prep stages, a run that
//! prints tagged summary lines, a snapshot export, a YAML point query) so the
//! harness can be exercised without a real solver installed. Extra flags
//! inject failures and vary the reported values.

use std::env;
use std::fs;
use std::path::Path;
use std::process::exit;

const SIM_DIR: &str = "lmrsim";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let code = match args.first().map(String::as_str) {
        Some("prep-gas") => prep_gas(&args[1..]),
        Some("make-profile") => make_profile(&args[1..]),
        Some("prep-grid") => prep_grid(),
        Some("prep-sim") => prep_sim(),
        Some("run") => run(&args[1..]),
        Some("snapshot2vtk") => snapshot2vtk(&args[1..]),
        Some("probe-flow") => probe_flow(&args[1..]),
        Some("sleep-run") => sleep_run(),
        Some("touch") => touch(&args[1..]),
        Some("fail") => {
            eprintln!("mock_solver: injected failure");
            1
        }
        other => {
            eprintln!("mock_solver: unknown subcommand {other:?}");
            2
        }
    };
    exit(code);
}

/// Value of a `--flag=value` argument, if present
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let prefix = format!("{flag}=");
    args.iter().find_map(|a| a.strip_prefix(&prefix))
}

/// Value following a `-x value` style option, if present
fn option_value<'a>(args: &'a [String], option: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == option)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn prep_gas(args: &[String]) -> i32 {
    let output = option_value(args, "-o").unwrap_or("ideal-air.gas");
    match fs::write(output, "mock gas model\n") {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("mock_solver: cannot write {output}: {e}");
            1
        }
    }
}

fn make_profile(args: &[String]) -> i32 {
    let Some(output) = args.first() else {
        eprintln!("mock_solver: make-profile needs an output path");
        return 2;
    };
    match fs::write(output, "mock inflow profile\n") {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("mock_solver: cannot write {output}: {e}");
            1
        }
    }
}

fn prep_grid() -> i32 {
    if fs::create_dir_all(SIM_DIR).is_err() {
        return 1;
    }
    i32::from(fs::write(Path::new(SIM_DIR).join("grid"), "mock grid\n").is_err())
}

fn prep_sim() -> i32 {
    if !Path::new(SIM_DIR).is_dir() {
        eprintln!("mock_solver: prep-sim before prep-grid");
        return 1;
    }
    i32::from(fs::write(Path::new(SIM_DIR).join("config"), "mock sim config\n").is_err())
}

fn run(args: &[String]) -> i32 {
    if has_flag(args, "--explode") {
        eprintln!("mock_solver: solver blew up");
        return 1;
    }
    let steps = flag_value(args, "--steps").unwrap_or("435");
    let final_time = flag_value(args, "--final-time").unwrap_or("0.0005");
    let stop_reason = flag_value(args, "--stop-reason").unwrap_or("maximum-time 5.000e-04");

    println!("mock solver starting up");
    println!("Step 100: t=1.15e-04 dt=1.1e-06");
    println!("Step 400: t=4.60e-04 dt=1.1e-06");
    if !has_flag(args, "--omit-markers") {
        println!("STOP-REASON {stop_reason}");
        println!("FINAL-STEP {steps}");
        println!("FINAL-TIME {final_time}");
    }
    println!("done.");

    if Path::new(SIM_DIR).is_dir() {
        let _ = fs::write(Path::new(SIM_DIR).join("snapshot"), "mock snapshot\n");
    }
    0
}

fn snapshot2vtk(args: &[String]) -> i32 {
    if !Path::new(SIM_DIR).is_dir() {
        eprintln!("mock_solver: no {SIM_DIR} directory to export");
        return 1;
    }
    if has_flag(args, "--skip-export") {
        // Succeed without producing the export, for artifact-check tests.
        return 0;
    }
    i32::from(fs::create_dir_all(Path::new(SIM_DIR).join("vtk")).is_err())
}

fn probe_flow(args: &[String]) -> i32 {
    if has_flag(args, "--garbage") {
        println!("flowdata: {{}}");
        return 0;
    }
    let names: Vec<&str> = flag_value(args, "--names")
        .map(|v| v.split(',').collect())
        .unwrap_or_default();
    let x: f64 = flag_value(args, "--location")
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    let shock_x: f64 = flag_value(args, "--shock-x")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.925);

    // Two-state field: post-shock values upstream of the shock position,
    // undisturbed driven-gas values beyond it.
    let post_shock = x < shock_x;
    println!("pointdata:");
    for (i, name) in names.iter().enumerate() {
        let value = match (*name, post_shock) {
            ("rho", true) => 0.0417124,
            ("rho", false) => 0.0124931,
            ("p", true) => 7152.19,
            ("p", false) => 1.0e3,
            ("T", true) => 597.22,
            ("T", false) => 278.8,
            ("vel.x", true) => 587.33,
            ("vel.x", false) => 0.0,
            _ => {
                eprintln!("mock_solver: unknown field {name}");
                return 1;
            }
        };
        if i == 0 {
            println!("- {name}: {value}");
        } else {
            println!("  {name}: {value}");
        }
    }
    0
}

fn sleep_run() -> i32 {
    std::thread::sleep(std::time::Duration::from_secs(30));
    0
}

fn touch(args: &[String]) -> i32 {
    let Some(path) = args.first() else {
        eprintln!("mock_solver: touch needs a path");
        return 2;
    };
    i32::from(fs::write(path, "").is_err())
}
