use midiout::{controllers::midi::MidiSenderController, midi::HostedMidiSender};

#[derive(Debug, clap::Parser)]
pub struct Options {
    /// Index of the output port to open. Defaults to the first port
    #[arg(long, conflicts_with = "virtual_port")]
    port: Option<usize>,

    /// Create a virtual output port with this name instead of opening a
    /// real port
    #[arg(long = "virtual")]
    virtual_port: Option<String>,

    /// MIDI client name announced to the system
    #[arg(long, default_value = "midiout")]
    client_name: String,

    #[command(subcommand)]
    message: Message,
}

#[derive(Debug, clap::Subcommand)]
enum Message {
    /// Note on (velocity 0 is equivalent to a note off)
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    /// Note off
    NoteOff { channel: u8, pitch: u8, velocity: u8 },
    /// Continuous controller change
    ControlChange { channel: u8, control: u8, value: u8 },
    /// Patch select
    ProgramChange { channel: u8, value: u8 },
    /// 14-bit pitch bend, 8192 is centred
    PitchBend { channel: u8, value: u16 },
    /// Channel pressure
    Aftertouch { channel: u8, value: u8 },
    /// Per-note pressure
    PolyAftertouch { channel: u8, pitch: u8, value: u8 },
    /// Raw bytes, passed through unvalidated
    Raw { bytes: Vec<u8> },
}

pub fn run(opts: Options) -> anyhow::Result<()> {
    let sender = HostedMidiSender::new(&opts.client_name)?;
    let mut sender = MidiSenderController::new(Box::new(sender), &opts.client_name);

    let opened = match (opts.port, &opts.virtual_port) {
        (_, Some(name)) => sender.open_virtual(name),
        (index, None) => sender.open(index.unwrap_or(0)),
    };

    if !opened {
        anyhow::bail!("could not open the requested output");
    }

    match opts.message {
        Message::NoteOn {
            channel,
            pitch,
            velocity,
        } => sender.send_note_on(channel, pitch, velocity),
        Message::NoteOff {
            channel,
            pitch,
            velocity,
        } => sender.send_note_off(channel, pitch, velocity),
        Message::ControlChange {
            channel,
            control,
            value,
        } => sender.send_control_change(channel, control, value),
        Message::ProgramChange { channel, value } => sender.send_program_change(channel, value),
        Message::PitchBend { channel, value } => sender.send_pitch_bend(channel, value),
        Message::Aftertouch { channel, value } => sender.send_aftertouch(channel, value),
        Message::PolyAftertouch {
            channel,
            pitch,
            value,
        } => sender.send_poly_aftertouch(channel, pitch, value),
        Message::Raw { bytes } => sender.send_bytes(&bytes),
    }

    Ok(())
}
