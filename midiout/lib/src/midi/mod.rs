mod message;
mod sender;

pub use message::*;
pub use sender::*;

pub trait MidiSending {
    /// Number of real output ports currently visible to the provider.
    /// Queried live, never cached.
    fn port_count(&self) -> usize;

    /// Name of a real output port by index, `None` if the index is invalid.
    fn port_name(&self, index: usize) -> Option<String>;

    /// Open the output port at `index`, labelling the connection with
    /// `label`. Returns the resolved port name. Any previously held
    /// connection is released first.
    fn open_port(&mut self, index: usize, label: &str) -> anyhow::Result<String>;

    /// Create a virtual output port that other applications can connect
    /// to. Fails on platforms without virtual port support.
    fn open_virtual_port(&mut self, name: &str) -> anyhow::Result<()>;

    /// Release the current connection. Safe to call when already closed.
    fn close_port(&mut self);

    /// Push raw bytes to the open connection.
    fn send_message(&mut self, bytes: &[u8]) -> anyhow::Result<()>;
}
