//! # Address Sources
//!
//! Where the scan population comes from:
//! * a line-delimited text file, one address per line;
//! * a CIDR block, fully expanded.
//!
//! Both produce an [`AddressList`]; malformed entries are counted, never fatal.

use std::fs;
use std::path::PathBuf;

use crate::error::SourceError;
use crate::network::address::AddressList;
use crate::network::range;
use crate::success;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressSource {
    /// Text file with one address per line; an optional `:port` is allowed.
    File(PathBuf),
    /// CIDR block such as `10.20.0.0/23`.
    Cidr(String),
}

impl AddressSource {
    /// Reads or expands the source into a validated address list.
    pub fn load(&self) -> Result<AddressList, SourceError> {
        let list: AddressList = match self {
            AddressSource::File(path) => {
                let content: Vec<u8> = fs::read(path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_bytes(&content)
            }
            AddressSource::Cidr(block) => AddressList {
                valid: range::cidr_addresses(block)?,
                invalid: Vec::new(),
            },
        };

        let len: usize = list.valid_count();
        let unit: &str = if len == 1 { "address is" } else { "addresses are" };
        success!("{len} {unit} ready to be checked");

        Ok(list)
    }
}

/// Validates every line of `content`. A trailing newline does not add an
/// empty line.
pub fn parse_lines(content: &str) -> AddressList {
    content.lines().collect()
}

/// Like [`parse_lines`] for raw file contents. Bytes that are not UTF-8 only
/// spoil the line they sit on, which then fails validation.
pub fn parse_bytes(content: &[u8]) -> AddressList {
    parse_lines(&String::from_utf8_lossy(content))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
