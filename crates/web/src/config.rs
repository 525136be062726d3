use std::net::{Ipv4Addr, SocketAddr};

use nano_http::codec::{DEFAULT_BUFFER_SIZE, SourceMode};

/// Port used when no address is configured.
pub const DEFAULT_PORT: u16 = 80;

/// Runtime settings of a [`Server`](crate::Server).
///
/// Built through [`ServerBuilder`](crate::ServerBuilder); defaults to listening on
/// `0.0.0.0:80` with buffered reads and GET/DELETE bodies discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    addresses: Vec<SocketAddr>,
    preserve_body: bool,
    source_mode: SourceMode,
    read_buffer_size: usize,
}

impl ServerConfig {
    /// Addresses tried, in order, when binding.
    pub fn addresses(&self) -> &[SocketAddr] {
        &self.addresses
    }

    /// Whether GET and DELETE requests keep their body.
    pub fn preserve_body(&self) -> bool {
        self.preserve_body
    }

    pub fn source_mode(&self) -> SourceMode {
        self.source_mode
    }

    /// Initial capacity of the read buffer in [`SourceMode::Buffered`].
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    pub(crate) fn set_addresses(&mut self, addresses: Vec<SocketAddr>) {
        self.addresses = addresses;
    }

    pub(crate) fn set_preserve_body(&mut self, preserve_body: bool) {
        self.preserve_body = preserve_body;
    }

    pub(crate) fn set_source_mode(&mut self, source_mode: SourceMode) {
        self.source_mode = source_mode;
    }

    pub(crate) fn set_read_buffer_size(&mut self, read_buffer_size: usize) {
        self.read_buffer_size = read_buffer_size;
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addresses: vec![SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))],
            preserve_body: false,
            source_mode: SourceMode::default(),
            read_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
