mod commands;
mod utils;
pub use utils::*;

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::Write;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: CommonOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
pub struct CommonOptions {
    /// Show successful open/close events, not just failures
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available MIDI output ports
    Ports(commands::ports::Options),
    /// Send a channel-voice message to an output port
    Send(commands::send::Options),
    /// `midiout completions --generate=zsh > midiout.zsh`
    Completions(Completions),
}

#[derive(Debug, Parser)]
#[command(arg_required_else_help(true))]
struct Completions {
    /// shell to generate the completion script for
    #[arg(long = "generate", value_enum)]
    shell: Option<clap_complete::Shell>,
}

impl Completions {
    fn generate(&self) -> anyhow::Result<()> {
        let Some(shell) = self.shell else {
            anyhow::bail!("no shell specified for autocompletion generation");
        };

        let mut stdout = std::io::stdout();
        stdout.flush()?;

        let mut cli = Cli::command();
        clap_complete::generate(shell, &mut cli, "midiout", &mut stdout);

        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if let Commands::Completions(ref c) = args.command {
        return c.generate();
    }

    logger::start("midiout", args.opts.verbose)?;

    match args.command {
        Commands::Ports(opts) => commands::ports::run(opts),
        Commands::Send(opts) => commands::send::run(opts),
        Commands::Completions(_) => Ok(()),
    }
}
