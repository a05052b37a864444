use std::process::ExitCode;

use rdtap_core::{MAX_ROUND_SIZE, cpu_features, detect_machine_info};

pub fn run() -> ExitCode {
    let machine = detect_machine_info();
    let features = cpu_features();

    println!(
        "Platform: {} {} ({} cores)",
        machine.os, machine.arch, machine.cores
    );
    if !features.vendor.is_empty() {
        println!("CPU vendor: {} (max CPUID leaf {:#x})", features.vendor, features.max_leaf);
    }
    println!();
    println!("  {:<8} {}", "RDRAND", mark(features.rdrand));
    println!("  {:<8} {}", "RDSEED", mark(features.rdseed));
    println!();
    println!("Round size: {MAX_ROUND_SIZE} words");

    if features.rdrand || features.rdseed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn mark(present: bool) -> &'static str {
    if present { "available" } else { "not available" }
}
