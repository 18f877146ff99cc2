//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum homomorphic encryption toolkit",
        style("QHE").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qhe-ir           Circuit intermediate representation");
    println!("  qhe-compile      Clifford+T compiler and gridsynth adapter");
    println!("  qhe-hal          Backend abstraction and bit-string utilities");
    println!("  qhe-protocol     Homomorphic circuit builder and decoding");
    println!("  qhe-adapter-sim  Statevector simulator");
    println!();
    println!(
        "Repository: {}",
        style(env!("CARGO_PKG_REPOSITORY")).underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
