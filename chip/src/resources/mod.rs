//! Loading roms from plain files or zip archives.
use std::{
    fs::File,
    io::{prelude::*, BufReader},
    path::Path,
};

use zip::read::ZipArchive;

use crate::{definitions::rom, RomError};

/// Represents an archive of roms, every file inside of the archive is a
/// single rom.
pub struct RomArchive<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl RomArchive<BufReader<File>> {
    /// Opens the zip archive at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RomError::Io {
            name: path.display().to_string(),
            source,
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> RomArchive<R> {
    /// Will generate a new rom archive object based of the given reader
    pub fn new(reader: R) -> Result<Self, RomError> {
        Ok(RomArchive {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Will return all the rom names available to be chosen
    pub fn file_names(&self) -> Vec<&'_ str> {
        self.archive.file_names().collect()
    }

    /// Will decompress the rom with the given name from the archive
    pub fn rom(&mut self, name: &str) -> Result<Rom, RomError> {
        let file = self.archive.by_name(name)?;
        let size = file.size() as usize;
        if size > rom::MAX_SIZE {
            return Err(RomError::TooLarge {
                name: name.to_string(),
                size,
                max: rom::MAX_SIZE,
            });
        }
        Rom::from_reader(name, file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The program stored as a u8 slice on the heap
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data.
    ///
    /// # Example
    /// ```rust
    /// # use chip::resources::Rom;
    /// let rom = Rom::new("jump", vec![0x12, 0x00].into_boxed_slice()).expect("fits into memory");
    /// assert_eq!(rom.get_name(), "jump");
    /// assert_eq!(rom.get_data(), &[0x12, 0x00]);
    ///
    /// assert!(Rom::new("huge", vec![0; 0x1000].into_boxed_slice()).is_err());
    /// ```
    pub fn new<S: Into<String>>(name: S, data: Box<[u8]>) -> Result<Self, RomError> {
        let name = name.into();
        if data.len() > rom::MAX_SIZE {
            return Err(RomError::TooLarge {
                name,
                size: data.len(),
                max: rom::MAX_SIZE,
            });
        }
        Ok(Rom { name, data })
    }

    /// Reads the whole reader as the rom content.
    pub fn from_reader<S: Into<String>, R: Read>(name: S, mut reader: R) -> Result<Self, RomError> {
        let name = name.into();
        let mut data = Vec::new();
        if let Err(source) = reader.read_to_end(&mut data) {
            return Err(RomError::Io { name, source });
        }
        Self::new(name, data.into_boxed_slice())
    }

    /// Reads the rom from a file, the file stem is used as the name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path).map_err(|source| RomError::Io {
            name: name.clone(),
            source,
        })?;
        Self::from_reader(name, BufReader::new(file))
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}
