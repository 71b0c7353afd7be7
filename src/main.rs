//! rsyncr CLI
//!
//! Entry point for the `rsyncr` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use rsyncr::{
    run, CommandLineOverrides, ConfigPaths, LogHandle, LoggingLevel, ProcessExecutor, RunOutput,
    RunRequest,
};

#[derive(Parser)]
#[command(name = "rsyncr")]
#[command(about = "Run rsync backups from layered config files", version)]
struct Cli {
    /// Job name; reads <configs-dir>/config.<JOB>.toml
    job: String,

    /// Path to the job config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory holding the config files (default: /etc/rsyncr/)
    #[arg(long)]
    configs_dir: Option<PathBuf>,

    /// Path to the global config file (default: <configs-dir>/global.toml)
    #[arg(long, short = 'g')]
    global_config: Option<PathBuf>,

    /// Simulate the transfer (pass --dry-run to rsync)
    #[arg(long)]
    dry_run: bool,

    /// Pass --verbose to rsync
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Print the report instead of sending it
    #[arg(long)]
    console: bool,

    /// Also save the report to this file
    #[arg(long)]
    capture_output: Option<String>,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    show_config: bool,
}

impl Cli {
    /// Only flags that were actually given
    fn overrides(&self) -> CommandLineOverrides {
        CommandLineOverrides {
            dry_run: self.dry_run.then_some(true),
            verbose: self.verbose.then_some(true),
            console_override: self.console.then_some(true),
            capture_file: self.capture_output.clone(),
        }
    }

    fn paths(&self) -> ConfigPaths {
        ConfigPaths {
            configs_dir: self.configs_dir.clone(),
            global_config: self.global_config.clone(),
            job_config: self.config.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let log = LogHandle::install(LoggingLevel::Warning);

    let request = RunRequest {
        job: cli.job.clone(),
        paths: cli.paths(),
        overrides: cli.overrides(),
        show_config: cli.show_config,
    };

    match run(&request, Some(&log), &ProcessExecutor, None) {
        Ok(RunOutput::Config(json)) => println!("{}", json),
        Ok(RunOutput::Report(_)) => {}
        Err(e) => {
            eprintln!("rsyncr: {}", e);
            process::exit(e.exit_code());
        }
    }
}
