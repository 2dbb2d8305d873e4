//! Recording I2C bus for unit tests

use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::command::{COMMAND_MODE, DATA_MODE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MockError(ErrorKind);

impl embedded_hal::i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// One write-only transaction as seen on the wire
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transfer {
    pub address: u8,
    pub bytes: Vec<u8>,
}

/// I2C bus with a configurable set of acknowledging slaves
///
/// Write-only transactions are recorded in order. Reads are answered either
/// from a fixed response or, in echo mode, with the last OLED data transfer,
/// which is what an SH1106 does for the off-screen probe columns.
#[derive(Debug, Default)]
pub(crate) struct MockBus {
    devices: Vec<u8>,
    transfers: Vec<Transfer>,
    read_requests: Vec<Transfer>,
    read_response: Vec<u8>,
    echo: bool,
    last_data: Vec<u8>,
}

impl MockBus {
    pub fn with_devices(devices: &[u8]) -> Self {
        Self {
            devices: devices.to_vec(),
            ..Self::default()
        }
    }

    pub fn set_read_response(&mut self, response: &[u8]) {
        self.read_response = response.to_vec();
    }

    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    pub fn clear_log(&mut self) {
        self.transfers.clear();
        self.read_requests.clear();
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn read_requests(&self) -> &[Transfer] {
        &self.read_requests
    }

    pub fn writes_to(&self, address: u8) -> Vec<Vec<u8>> {
        self.transfers
            .iter()
            .filter(|t| t.address == address)
            .map(|t| t.bytes.clone())
            .collect()
    }

    /// Single-byte commands sent in OLED command mode
    pub fn commands_to(&self, address: u8) -> Vec<u8> {
        self.writes_to(address)
            .iter()
            .filter(|bytes| bytes.len() == 2 && bytes[0] == COMMAND_MODE)
            .map(|bytes| bytes[1])
            .collect()
    }

    /// Transfers sent in OLED data mode, mode byte included
    pub fn data_to(&self, address: u8) -> Vec<Vec<u8>> {
        self.writes_to(address)
            .into_iter()
            .filter(|bytes| bytes.first() == Some(&DATA_MODE))
            .collect()
    }
}

impl ErrorType for MockBus {
    type Error = MockError;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if !self.devices.contains(&address) {
            return Err(MockError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }

        let mut written = Vec::new();
        let mut did_read = false;

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => written.extend_from_slice(bytes),
                Operation::Read(buffer) => {
                    let source = if self.echo {
                        &self.last_data
                    } else {
                        &self.read_response
                    };
                    for (i, byte) in buffer.iter_mut().enumerate() {
                        *byte = source.get(i).copied().unwrap_or(0);
                    }
                    did_read = true;
                }
            }
        }

        if did_read {
            if !written.is_empty() {
                self.read_requests.push(Transfer {
                    address,
                    bytes: written,
                });
            }
        } else if !written.is_empty() {
            if written.first() == Some(&DATA_MODE) {
                self.last_data.clone_from(&written);
            }
            self.transfers.push(Transfer {
                address,
                bytes: written,
            });
        }

        Ok(())
    }
}

pub(crate) struct MockDelay;

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
