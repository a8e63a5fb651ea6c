use super::*;
#[cfg(unix)]
use midir::os::unix::VirtualOutput;
use midir::{MidiOutput, MidiOutputConnection};

/// Errors reported by the midir-hosted transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to initialise the MIDI backend : {0}")]
    Backend(String),

    #[error("no output port at index {0}")]
    UnknownPort(usize),

    #[error("failed to connect to output port : {0}")]
    Connect(String),

    #[error("virtual ports are not supported on this platform")]
    VirtualPortsUnsupported,

    #[error("no open output connection")]
    NotConnected,

    #[error("failed to send message : {0}")]
    Send(String),
}

impl From<midir::InitError> for TransportError {
    fn from(e: midir::InitError) -> Self {
        Self::Backend(e.to_string())
    }
}

/// System MIDI output access through midir.
///
/// Holds one backend client for port enumeration over its whole lifetime
/// and at most one open connection at a time. Dropping the sender closes
/// any open connection.
pub struct HostedMidiSender {
    client_name: String,
    host: MidiOutput,
    connection: Option<MidiOutputConnection>,
}

impl HostedMidiSender {
    pub fn new(client_name: &str) -> anyhow::Result<Self> {
        Ok(Self {
            host: MidiOutput::new(client_name).map_err(TransportError::from)?,
            client_name: client_name.to_owned(),
            connection: None,
        })
    }

    fn connect_client(&self) -> Result<MidiOutput, TransportError> {
        // midir consumes a client on connect, so each connection gets a
        // fresh client while `self.host` stays behind for enumeration.
        Ok(MidiOutput::new(&self.client_name)?)
    }
}

impl MidiSending for HostedMidiSender {
    fn port_count(&self) -> usize {
        self.host.port_count()
    }

    fn port_name(&self, index: usize) -> Option<String> {
        let ports = self.host.ports();
        let port = ports.get(index)?;
        self.host.port_name(port).ok()
    }

    fn open_port(&mut self, index: usize, label: &str) -> anyhow::Result<String> {
        self.close_port();

        let host = self.connect_client()?;
        let ports = host.ports();
        let port = ports.get(index).ok_or(TransportError::UnknownPort(index))?;
        let name = host
            .port_name(port)
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        self.connection = Some(
            host.connect(port, label)
                .map_err(|e| TransportError::Connect(e.to_string()))?,
        );

        Ok(name)
    }

    #[cfg(unix)]
    fn open_virtual_port(&mut self, name: &str) -> anyhow::Result<()> {
        self.close_port();

        self.connection = Some(
            self.connect_client()?
                .create_virtual(name)
                .map_err(|e| TransportError::Connect(e.to_string()))?,
        );

        Ok(())
    }

    #[cfg(not(unix))]
    fn open_virtual_port(&mut self, _name: &str) -> anyhow::Result<()> {
        self.close_port();
        Err(TransportError::VirtualPortsUnsupported.into())
    }

    fn close_port(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
    }

    fn send_message(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let Some(connection) = self.connection.as_mut() else {
            return Err(TransportError::NotConnected.into());
        };

        connection
            .send(bytes)
            .map_err(|e| TransportError::Send(e.to_string()))?;

        Ok(())
    }
}
