//! Embedded controller register access.

use log::{debug, trace};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Single-byte write access to the EC register space.
pub trait EcChannel: Send + Sync {
    /// Write `value` to the register at `address`. One attempt, no retry.
    fn write_register(&self, address: u16, value: u8) -> io::Result<()>;
}

impl<T: EcChannel + ?Sized> EcChannel for Arc<T> {
    fn write_register(&self, address: u16, value: u8) -> io::Result<()> {
        (**self).write_register(address, value)
    }
}

impl<T: EcChannel + ?Sized> EcChannel for &T {
    fn write_register(&self, address: u16, value: u8) -> io::Result<()> {
        (**self).write_register(address, value)
    }
}

// =============================================================================
// Port I/O
// =============================================================================

/// Byte-wide access to x86 I/O ports.
pub trait PortIo: Send {
    /// Write one byte to `port`.
    fn outb(&mut self, port: u16, value: u8) -> io::Result<()>;

    /// Read one byte from `port`.
    fn inb(&mut self, port: u16) -> io::Result<u8>;
}

/// Port I/O through the `/dev/port` character device.
///
/// Offsets in the device file are port numbers. Needs `CAP_SYS_RAWIO`.
#[derive(Debug)]
pub struct DevPort {
    file: File,
}

impl DevPort {
    /// Open `/dev/port` for reading and writing.
    pub fn open() -> io::Result<Self> {
        Self::open_path("/dev/port")
    }

    /// Open a different device (or plain file) as the port space.
    pub fn open_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file })
    }
}

impl PortIo for DevPort {
    fn outb(&mut self, port: u16, value: u8) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(u64::from(port)))?;
        self.file.write_all(&[value])
    }

    fn inb(&mut self, port: u16) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.file.seek(SeekFrom::Start(u64::from(port)))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}

// =============================================================================
// I2EC channel
// =============================================================================

const EC_PORT_ADDR: u16 = 0x4e;
const EC_PORT_DATA: u16 = 0x4f;

const I2EC_REG_ADDR: u8 = 0x2e;
const I2EC_REG_DATA: u8 = 0x2f;

const I2EC_ADDR_LOW: u8 = 0x10;
const I2EC_ADDR_HIGH: u8 = 0x11;
const I2EC_ADDR_DATA: u8 = 0x12;

const FW_VERSION_MAJOR: u16 = 0x0400;
const FW_VERSION_MINOR: u16 = 0x0401;

/// EC RAM access over the indirect (I2EC) index/data port protocol.
///
/// Every access selects the 16-bit RAM address one byte at a time before
/// touching the data register, so the whole sequence is serialized by an
/// internal lock.
pub struct I2ecChannel<P> {
    port: Mutex<P>,
}

impl<P: PortIo> I2ecChannel<P> {
    /// Drive the EC through `port`.
    pub fn new(port: P) -> Self {
        Self {
            port: Mutex::new(port),
        }
    }

    /// Read one byte of EC RAM.
    pub fn read_register(&self, address: u16) -> io::Result<u8> {
        let mut port = self.port.lock().unwrap_or_else(PoisonError::into_inner);
        select_address(&mut *port, address)?;
        io_write(&mut *port, I2EC_REG_ADDR, I2EC_ADDR_DATA)?;
        let value = io_read(&mut *port, I2EC_REG_DATA)?;
        trace!("ec read {:#06x} -> {:#04x}", address, value);
        Ok(value)
    }

    /// Read the EC firmware version as `(major, minor)`.
    pub fn firmware_version(&self) -> io::Result<(u8, u8)> {
        let major = self.read_register(FW_VERSION_MAJOR)?;
        let minor = self.read_register(FW_VERSION_MINOR)?;
        debug!("EC firmware version {}.{}", major, minor);
        Ok((major, minor))
    }

    /// Consume the channel and return the port.
    pub fn into_inner(self) -> P {
        self.port.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl I2ecChannel<DevPort> {
    /// Open the channel on `/dev/port`.
    pub fn open() -> io::Result<Self> {
        Ok(Self::new(DevPort::open()?))
    }
}

impl<P: PortIo> EcChannel for I2ecChannel<P> {
    fn write_register(&self, address: u16, value: u8) -> io::Result<()> {
        let mut port = self.port.lock().unwrap_or_else(PoisonError::into_inner);
        select_address(&mut *port, address)?;
        io_write(&mut *port, I2EC_REG_ADDR, I2EC_ADDR_DATA)?;
        io_write(&mut *port, I2EC_REG_DATA, value)?;
        trace!("ec write {:#06x} <- {:#04x}", address, value);
        Ok(())
    }
}

fn select_address<P: PortIo + ?Sized>(port: &mut P, address: u16) -> io::Result<()> {
    let [high, low] = address.to_be_bytes();
    io_write(port, I2EC_REG_ADDR, I2EC_ADDR_HIGH)?;
    io_write(port, I2EC_REG_DATA, high)?;
    io_write(port, I2EC_REG_ADDR, I2EC_ADDR_LOW)?;
    io_write(port, I2EC_REG_DATA, low)
}

fn io_write<P: PortIo + ?Sized>(port: &mut P, reg: u8, data: u8) -> io::Result<()> {
    port.outb(EC_PORT_ADDR, reg)?;
    port.outb(EC_PORT_DATA, data)
}

fn io_read<P: PortIo + ?Sized>(port: &mut P, reg: u8) -> io::Result<u8> {
    port.outb(EC_PORT_ADDR, reg)?;
    port.inb(EC_PORT_DATA)
}
