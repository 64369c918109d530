//! Command-line parsing for the scan driver

use std::path::PathBuf;

#[derive(Debug)]
pub struct CliArgs {
    pub config_path: PathBuf,
    pub images: Vec<PathBuf>,
    /// Histogram images on a thread pool instead of one by one
    pub parallel: bool,
}

pub fn usage(program: &str) -> String {
    format!("Usage: {program} [--parallel] <config.json> <image>...")
}

pub fn parse_args<I>(program: &str, args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parallel = false;
    let mut positional = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--parallel" => parallel = true,
            "-h" | "--help" => return Err(usage(program)),
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{flag}'\n{}", usage(program)));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() < 2 {
        return Err(usage(program));
    }
    let config_path = positional.remove(0);

    Ok(CliArgs {
        config_path,
        images: positional,
        parallel,
    })
}
