// UnitexFile: minimal file handle over the gateway.
//
// Lets callers read artifacts straight out of the virtual filesystem without
// dumping them to disk first. All text is UTF-8.

use unitex_core::{Result, UnitexError};

use crate::gateway::FileGateway;

const BOM: &str = "\u{FEFF}";

/// Mode a [`UnitexFile`] is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Read UTF-8 text.
    #[default]
    Read,
    /// Read raw bytes.
    ReadBinary,
    /// Create or truncate, then write text.
    Write,
    /// Write text at the end of the file, creating it if needed.
    Append,
}

impl FileMode {
    fn is_read(self) -> bool {
        matches!(self, Self::Read | Self::ReadBinary)
    }
}

#[derive(Debug)]
struct OpenFile {
    path: String,
    mode: FileMode,
    use_bom: bool,
    /// Set after the first write in `Write` mode; later writes append.
    truncated: bool,
}

/// A single-file handle with an explicit open/close discipline.
///
/// Opening while a file is already open, or reading/writing in the wrong
/// mode, is a usage error.
#[derive(Debug)]
pub struct UnitexFile<'g> {
    gateway: &'g FileGateway,
    current: Option<OpenFile>,
}

impl<'g> UnitexFile<'g> {
    pub fn new(gateway: &'g FileGateway) -> Self {
        Self {
            gateway,
            current: None,
        }
    }

    /// Open `path` in `mode`. `use_bom` only matters in [`FileMode::Write`].
    pub fn open(&mut self, path: &str, mode: FileMode, use_bom: bool) -> Result<()> {
        if let Some(open) = &self.current {
            return Err(UnitexError::usage(format!(
                "you must close the current file ({}) before opening another one",
                open.path
            )));
        }
        self.current = Some(OpenFile {
            path: path.to_string(),
            mode,
            use_bom,
            truncated: false,
        });
        Ok(())
    }

    /// Close the open file.
    pub fn close(&mut self) -> Result<()> {
        match self.current.take() {
            Some(_) => Ok(()),
            None => Err(UnitexError::usage("there is no file to close")),
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Path of the open file.
    pub fn path(&self) -> Option<&str> {
        self.current.as_ref().map(|f| f.path.as_str())
    }

    /// Write (or append) `data`. The file must be open in `Write` or
    /// `Append` mode.
    pub fn write(&mut self, data: &str) -> Result<()> {
        let gateway = self.gateway;
        let open = self
            .current
            .as_mut()
            .ok_or_else(|| UnitexError::usage("you must open a file before writing"))?;
        if open.mode.is_read() {
            return Err(UnitexError::usage(format!(
                "file '{}' is opened in read mode",
                open.path
            )));
        }

        if open.mode == FileMode::Write && !open.truncated {
            let mut bytes = Vec::with_capacity(data.len() + BOM.len());
            if open.use_bom {
                bytes.extend_from_slice(BOM.as_bytes());
            }
            bytes.extend_from_slice(data.as_bytes());
            gateway.write_bytes(&open.path, &bytes, false)?;
            open.truncated = true;
        } else {
            gateway.write_bytes(&open.path, data.as_bytes(), true)?;
        }
        Ok(())
    }

    /// Whole contents as text, without a leading byte-order mark. The file
    /// must be open in `Read` mode.
    pub fn read(&self) -> Result<String> {
        let open = self.readable(FileMode::Read)?;
        let bytes = self.gateway.read_bytes(&open.path)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            UnitexError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("'{}' is not valid UTF-8: {e}", open.path),
            ))
        })?;
        Ok(match text.strip_prefix(BOM) {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }

    /// Whole contents as bytes. The file must be open in `ReadBinary` mode.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        let open = self.readable(FileMode::ReadBinary)?;
        Ok(self.gateway.read_bytes(&open.path)?)
    }

    fn readable(&self, wanted: FileMode) -> Result<&OpenFile> {
        let open = self
            .current
            .as_ref()
            .ok_or_else(|| UnitexError::usage("you must open a file before reading"))?;
        if open.mode != wanted {
            let reason = if open.mode.is_read() {
                "the other read mode"
            } else {
                "write/append mode"
            };
            return Err(UnitexError::usage(format!(
                "file '{}' is opened in {reason}",
                open.path
            )));
        }
        Ok(open)
    }
}

/// Read a whole text file through the gateway with a scoped handle.
pub fn read_text(gateway: &FileGateway, path: &str) -> Result<String> {
    let mut file = UnitexFile::new(gateway);
    file.open(path, FileMode::Read, false)?;
    let content = file.read();
    file.close()?;
    content
}

/// Read a whole binary file through the gateway with a scoped handle.
pub fn read_binary(gateway: &FileGateway, path: &str) -> Result<Vec<u8>> {
    let mut file = UnitexFile::new(gateway);
    file.open(path, FileMode::ReadBinary, false)?;
    let content = file.read_bytes();
    file.close()?;
    content
}
