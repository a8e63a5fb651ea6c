use colored::Colorize;
use midiout::{controllers::midi::MidiSenderController, midi::HostedMidiSender};

#[derive(Debug, clap::Parser)]
pub struct Options {
    /// MIDI client name announced to the system
    #[arg(long, default_value = "midiout")]
    client_name: String,
}

pub fn run(opts: Options) -> anyhow::Result<()> {
    let sender = HostedMidiSender::new(&opts.client_name)?;
    let sender = MidiSenderController::new(Box::new(sender), &opts.client_name);

    let ports = sender.list_ports();
    if ports.is_empty() {
        println!("no output ports found");
        return Ok(());
    }

    for (index, name) in ports.iter().enumerate() {
        println!("{} : {name}", index.to_string().cyan());
    }

    Ok(())
}
