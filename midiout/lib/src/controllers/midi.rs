use crate::midi::{MidiMessage, MidiSending};

/// Owns the lifecycle of a connection to a single MIDI output destination
/// and serializes channel-voice messages onto it.
///
/// At most one destination is active at a time, either a real port opened
/// by index or a named virtual port; opening either mode first closes any
/// existing connection. Dropping the controller closes the port.
///
/// The controller is single threaded: every operation blocks until it
/// completes and there is no internal locking. Callers sharing one
/// controller across threads must serialize access themselves.
pub struct MidiSenderController {
    sender: Box<dyn MidiSending>,
    display_name: String,
    port_index: Option<usize>,
    port_name: Option<String>,
    is_virtual: bool,
}

impl MidiSenderController {
    /// `display_name` is an optional client-facing label folded into the
    /// connection label when a real port is opened.
    pub fn new(sender: Box<dyn MidiSending>, display_name: &str) -> Self {
        Self {
            sender,
            display_name: display_name.to_owned(),
            port_index: None,
            port_name: None,
            is_virtual: false,
        }
    }

    /// Available output port names, in provider index order.
    ///
    /// The ordering is volatile: it may change as devices are attached or
    /// detached between calls.
    pub fn list_ports(&self) -> Vec<String> {
        (0..self.sender.port_count())
            .map(|index| self.port_name(index))
            .collect()
    }

    /// Number of output ports currently available, as reported live by
    /// the provider.
    pub fn port_count(&self) -> usize {
        self.sender.port_count()
    }

    /// Name of an output port by index, or `""` if the index is invalid.
    pub fn port_name(&self, index: usize) -> String {
        self.sender.port_name(index).unwrap_or_default()
    }

    /// Connect to the output port at `index`.
    ///
    /// Any open connection is closed first. Returns `false` and logs the
    /// provider's error if the port could not be opened; the connection
    /// is left closed and another target can be tried.
    pub fn open(&mut self, index: usize) -> bool {
        self.close();

        let label = format!("{}Output {index}", self.display_name);
        match self.sender.open_port(index, &label) {
            Ok(name) => {
                log::debug!("Opened output port {index} : {name}");
                self.port_index = Some(index);
                self.port_name = Some(name);
                true
            }
            Err(e) => {
                log::error!("Failed to open output port {index} : {e}");
                false
            }
        }
    }

    /// Create and connect to a virtual output port that other
    /// applications can route to.
    ///
    /// Any open connection is closed first. Only available where the
    /// platform offers virtual ports (macOS and Linux ALSA); elsewhere
    /// this fails like any other open failure. A connection does not see
    /// its own virtual port when listing ports.
    pub fn open_virtual(&mut self, name: &str) -> bool {
        self.close();

        match self.sender.open_virtual_port(name) {
            Ok(()) => {
                log::debug!("Opened virtual output port {name}");
                self.port_name = Some(name.to_owned());
                self.is_virtual = true;
                true
            }
            Err(e) => {
                log::error!("Failed to open virtual output port {name} : {e}");
                false
            }
        }
    }

    /// Close the connection and release the output port. Safe to call
    /// when already closed.
    pub fn close(&mut self) {
        if self.is_virtual {
            debug_assert!(self.port_index.is_none());
            log::debug!(
                "Closed virtual output port {}",
                self.port_name.as_deref().unwrap_or_default()
            );
        } else if let Some(index) = self.port_index {
            log::debug!(
                "Closed output port {index} : {}",
                self.port_name.as_deref().unwrap_or_default()
            );
        }

        self.sender.close_port();
        self.port_index = None;
        self.port_name = None;
        self.is_virtual = false;
    }

    pub fn is_open(&self) -> bool {
        self.port_index.is_some() || self.is_virtual
    }

    pub fn is_virtual_port(&self) -> bool {
        self.is_virtual
    }

    /// Index of the connected port, `None` when closed or virtual.
    pub fn current_port(&self) -> Option<usize> {
        self.port_index
    }

    /// Name of the connected port, `None` when closed.
    pub fn current_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }

    // Channel-voice sends.
    //
    // Number ranges: channel 1 - 16, pitch / velocity / control /
    // program / touch values 0 - 127, bend 0 - 16383. None of these are
    // enforced here; out-of-range values pass through to the transport
    // as-is. A note-on with velocity 0 is equivalent to a note-off, and
    // most synths ignore the velocity of a note-off. Sends on a closed
    // connection are dropped with a debug diagnostic.

    pub fn send_note_on(&mut self, channel: u8, pitch: u8, velocity: u8) {
        self.send(MidiMessage::note_on(channel, pitch, velocity));
    }

    pub fn send_note_off(&mut self, channel: u8, pitch: u8, velocity: u8) {
        self.send(MidiMessage::note_off(channel, pitch, velocity));
    }

    pub fn send_control_change(&mut self, channel: u8, control: u8, value: u8) {
        self.send(MidiMessage::control_change(channel, control, value));
    }

    pub fn send_program_change(&mut self, channel: u8, value: u8) {
        self.send(MidiMessage::program_change(channel, value));
    }

    /// Send a 14-bit pitch bend (0 - 16383, 8192 centred).
    ///
    /// A value above 14 bits is reported as an error and then sent with
    /// the excess bits masked off rather than rejected.
    pub fn send_pitch_bend(&mut self, channel: u8, value: u16) {
        if value >> 14 != 0 {
            log::error!("Pitch bend values must be less than {}", 1u16 << 14);
        }

        self.send_pitch_bend_bytes(channel, (value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8);
    }

    /// Send a pitch bend as raw 7-bit lsb/msb bytes.
    ///
    /// Note: this form emits the base pitch-bend status and does not
    /// apply `channel`; use [`MidiSenderController::send_pitch_bend`]
    /// for channel-addressed bends.
    pub fn send_pitch_bend_bytes(&mut self, channel: u8, lsb: u8, msb: u8) {
        self.send(MidiMessage::pitch_bend_bytes(channel, lsb, msb));
    }

    pub fn send_aftertouch(&mut self, channel: u8, value: u8) {
        self.send(MidiMessage::aftertouch(channel, value));
    }

    pub fn send_poly_aftertouch(&mut self, channel: u8, pitch: u8, value: u8) {
        self.send(MidiMessage::poly_aftertouch(channel, pitch, value));
    }

    /// Push raw bytes to the transport without validation.
    pub fn send_bytes(&mut self, bytes: &[u8]) {
        if let Err(e) = self.sender.send_message(bytes) {
            log::debug!("Failed to send message : {e}");
        }
    }

    fn send(&mut self, message: MidiMessage) {
        self.send_bytes(message.as_bytes());
    }
}

impl Drop for MidiSenderController {
    fn drop(&mut self) {
        self.close();
    }
}
