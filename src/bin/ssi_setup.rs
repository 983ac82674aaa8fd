//! Validate an SSI setup file and print the engine parameters as JSON
//!
//! Usage: `ssi-setup <config.json> [--summary]`

use anyhow::{bail, Context, Result};
use log::info;

use ssi_params::prelude::*;

/// Print every settable parameter with its unit
fn print_declared<P: ParamSet>(params: &P) {
    for spec in P::DECLARED {
        if let Some(value) = params.value(spec.name) {
            println!("  {} = {} {}", spec.name, value, spec.unit);
        }
    }
}

fn print_summary(setup: &AnalysisSetup) {
    let m = &setup.material;
    let mesh = &setup.mesh;
    let a = &setup.analysis;

    println!("=== Material ===");
    print_declared(m);
    println!("  G = {:.1} kPa", m.shear_modulus());
    println!("  E = {:.1} kPa", m.youngs_modulus());
    println!("  K = {:.1} kPa", m.bulk_modulus());
    println!("  Site period = {:.3} s", m.site_period());
    println!("  Impedance ratio = {:.3}", m.impedance_ratio());

    println!("\n=== Mesh ===");
    print_declared(mesh);
    println!("  eleSize = {:.4} m (actual {:.4} m)", mesh.ele_size(), mesh.ele_height());
    println!("  {} elements, {} nodes", mesh.num_elements(), mesh.num_nodes());

    println!("\n=== Analysis ===");
    print_declared(a);
    println!("  {} steps x {} s = {:.2} s", a.steps(), a.dt(), a.duration());
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: ssi-setup <config.json> [--summary]");
    };
    let summary = args.any(|arg| arg == "--summary");

    let setup = AnalysisSetup::from_file(&path)
        .with_context(|| format!("Failed to build setup from '{path}'"))?;
    info!("Loaded {path}");

    if summary {
        print_summary(&setup);
    } else {
        println!("{}", setup.to_json()?);
    }
    Ok(())
}
