use clap::Parser;
use clitest::{Config, ListMode, OperatorError};
use std::io::IsTerminal;
use std::path::PathBuf;

/// A test runner for shell commands embedded as examples inside
/// documentation-style text files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(required = true, help = "Input files to scan for test blocks")]
    files: Vec<PathBuf>,

    #[arg(short = '1', long = "first", help = "Stop on the first failure")]
    first: bool,

    #[arg(short = 'l', long = "list", help = "List blocks, do not execute")]
    list: bool,

    #[arg(short = 'L', long = "list-run", help = "List blocks annotated with OK/FAIL")]
    list_run: bool,

    #[arg(short = 'q', long = "quiet", help = "Suppress normal output")]
    quiet: bool,

    #[arg(short = 'v', long = "verbose", help = "Echo each command before running it")]
    verbose: bool,

    #[arg(short = 'n', long = "number", default_value = "", help = "Restrict to ordinals in RANGE, e.g. 1,3,5-8")]
    number: String,

    #[arg(long = "no-color", help = "Disable ANSI color")]
    no_color: bool,

    #[arg(long = "prefix", default_value = "", help = "Required per-line prefix")]
    prefix: String,

    #[arg(long = "prompt", default_value = "$ ", help = "Prompt marker that introduces a command line")]
    prompt: String,

    #[arg(long = "inline-prefix", default_value = "#→ ", help = "Inline separator between a command and its expected output")]
    inline_prefix: String,

    #[arg(long = "diff-options", default_value = "-u", help = "Options passed through to the diff renderer")]
    diff_options: String,

    #[arg(long = "shell", default_value = "/bin/sh", help = "Shell binary used to execute each command")]
    shell: String,
}

impl Args {
    fn into_config(self) -> Result<Config, OperatorError> {
        let list_mode =
            if self.list { ListMode::List } else if self.list_run { ListMode::ListRun } else { ListMode::Off };

        let use_colors = !self.no_color && std::io::stdout().is_terminal();

        Config::new(
            self.prefix,
            self.prompt,
            self.inline_prefix,
            self.diff_options,
            &self.number,
            self.first,
            list_mode,
            self.verbose,
            self.quiet,
            use_colors,
            self.shell,
        )
    }
}

fn main() {
    let args = Args::parse();
    let files = args.files.clone();
    let prog = std::env::args().next().unwrap_or_else(|| "clitest".to_string());

    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{prog}: Error: {err}");
            std::process::exit(2);
        }
    };

    match clitest::run_files(&config, &files) {
        Ok(summary) => std::process::exit(summary.exit_code),
        Err(err) => {
            eprintln!("{prog}: Error: {err}");
            std::process::exit(2);
        }
    }
}
