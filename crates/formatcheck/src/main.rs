use std::path::PathBuf;
use std::process::ExitCode;

use formatcheck::runtime::boot;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    boot::init_logging();
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let report = boot::check(path.as_deref())?;
    Ok(if boot::finish(report) { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
