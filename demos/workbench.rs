//! Interactive workbench in the terminal.
//!
//! Set `FORGE_CONFIG` to a JSON file to override defaults, e.g.
//! `{ "seed": 7, "log_path": "forge.log" }`.

use std::env;

use forge_panels::{CliDriver, DriverResult, ForgeConfig, build_workbench};

fn main() -> DriverResult<()> {
    let config = match env::var_os("FORGE_CONFIG") {
        Some(path) => ForgeConfig::from_path(path)?,
        None => ForgeConfig::default(),
    };
    let runtime = build_workbench(&config)?;
    CliDriver::new(runtime).run()
}
