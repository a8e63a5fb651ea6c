use midiout_lib::controllers::midi::MidiSenderController;
use midiout_lib::midi::HostedMidiSender;
use std::{thread::sleep, time::Duration};

fn main() -> anyhow::Result<()> {
    setup_logger()?;

    let host = HostedMidiSender::new("send_note")?;
    let mut sender = MidiSenderController::new(Box::new(host), "send_note");

    let ports = sender.list_ports();
    if ports.is_empty() {
        anyhow::bail!("no output ports found");
    }

    for (index, name) in ports.iter().enumerate() {
        log::info!("{index} : {name}");
    }

    if !sender.open(0) {
        anyhow::bail!("could not open output port 0");
    }

    for pitch in [60, 64, 67, 72] {
        sender.send_note_on(1, pitch, 100);
        sleep(Duration::from_millis(200));
        sender.send_note_off(1, pitch, 0);
        sleep(Duration::from_millis(50));
    }

    sender.close();
    Ok(())
}

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
