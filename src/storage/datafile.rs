//! Physical storage file descriptor and its reconciliation decisions.
//!
//! A `Datafile` is built once per comparison side, either from declared
//! configuration or from a catalog row, and never mutated afterwards. It
//! answers the two planning questions (resize? autoextend change?) and
//! renders the SQL clause fragments any statement referencing the file needs.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::storage::size::Size;
use crate::storage::tablespace::FileType;

/// Highest block count addressable in a small file. A small file whose
/// maximum size reaches this many blocks cannot grow further, which is what
/// the catalog reports back where a declaration said "unlimited".
pub const SMALLFILE_MAX_BLOCKS: u128 = 4194302;

fn default_block_size() -> u64 {
    8192
}

/// One data file (or temp file) of a tablespace.
#[derive(Debug, Clone, Deserialize)]
pub struct Datafile {
    path: String,
    size: Size,
    #[serde(default)]
    autoextend: bool,
    #[serde(default)]
    nextsize: Option<Size>,
    #[serde(default)]
    maxsize: Option<Size>,
    #[serde(default)]
    bigfile: bool,
    #[serde(default = "default_block_size")]
    block_size: u64,
}

impl Datafile {
    /// Creates a descriptor with autoextend off, small-file addressing and
    /// the default 8K block size.
    pub fn new(path: impl Into<String>, size: Size) -> Self {
        Self {
            path: path.into(),
            size,
            autoextend: false,
            nextsize: None,
            maxsize: None,
            bigfile: false,
            block_size: 8192,
        }
    }

    pub fn autoextend(mut self, autoextend: bool) -> Self {
        self.autoextend = autoextend;
        self
    }

    pub fn nextsize(mut self, nextsize: Size) -> Self {
        self.nextsize = Some(nextsize);
        self
    }

    pub fn maxsize(mut self, maxsize: Size) -> Self {
        self.maxsize = Some(maxsize);
        self
    }

    /// Marks the file as belonging to a bigfile tablespace.
    pub fn bigfile(mut self, bigfile: bool) -> Self {
        self.bigfile = bigfile;
        self
    }

    pub fn block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_autoextend(&self) -> bool {
        self.autoextend
    }

    pub fn next_size(&self) -> Option<Size> {
        self.nextsize
    }

    /// Declared maximum size, with the small-file ceiling folded in: a small
    /// file whose maximum equals `SMALLFILE_MAX_BLOCKS * block_size` bytes
    /// reports `Unlimited`. The identical byte count on a big file is an
    /// ordinary finite maximum, far below that regime's own ceiling.
    pub fn max_size(&self) -> Option<Size> {
        match self.maxsize {
            Some(Size::Bytes(bytes))
                if !self.bigfile && bytes == SMALLFILE_MAX_BLOCKS * self.block_size as u128 =>
            {
                Some(Size::Unlimited)
            }
            other => other,
        }
    }

    pub fn is_bigfile(&self) -> bool {
        self.bigfile
    }

    pub fn file_type(&self) -> FileType {
        FileType::from(self.bigfile)
    }

    pub fn block_size_bytes(&self) -> u64 {
        self.block_size
    }

    /// Resize is done only if the file must grow and is not on autoextend.
    pub fn needs_resize(&self, prev: &Datafile) -> bool {
        !self.autoextend && prev.size < self.size
    }

    /// Autoextend change when switching off/on in either direction, or when
    /// it stays on and a declared maxsize or nextsize differs. A target with
    /// autoextend off suppresses the size comparisons entirely.
    pub fn needs_autoextend_change(&self, prev: &Datafile) -> bool {
        let maxsize_changed =
            self.autoextend && self.maxsize.is_some() && self.max_size() != prev.max_size();
        let nextsize_changed =
            self.autoextend && self.nextsize.is_some() && self.nextsize != prev.nextsize;
        self.autoextend != prev.autoextend || maxsize_changed || nextsize_changed
    }

    /// `'path' size ... reuse ...` as used after an `add datafile` keyword.
    pub fn data_file_clause(&self) -> String {
        format!("'{}' {}", self.path, self.file_specification_clause())
    }

    /// `size ... reuse ...` with the autoextend clause appended.
    pub fn file_specification_clause(&self) -> String {
        format!("size {} reuse {}", self.size, self.autoextend_clause())
    }

    /// ` autoextend on [next N] [maxsize N]` or ` autoextend off`.
    /// The leading space is part of the clause.
    pub fn autoextend_clause(&self) -> String {
        if self.autoextend {
            let mut sql = String::from(" autoextend on");
            if let Some(nextsize) = self.nextsize {
                sql.push_str(&format!(" next {}", nextsize));
            }
            if let Some(maxsize) = self.max_size() {
                sql.push_str(&format!(" maxsize {}", maxsize));
            }
            sql
        } else {
            String::from(" autoextend off")
        }
    }
}

/// Report shape: sizes in canonical form, growth bounds only when the file
/// autoextends, maxsize normalized.
impl Serialize for Datafile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("size", &self.size)?;
        map.serialize_entry("autoextend", &self.autoextend)?;
        if self.autoextend {
            if let Some(nextsize) = self.nextsize {
                map.serialize_entry("nextsize", &nextsize)?;
            }
            if let Some(maxsize) = self.max_size() {
                map.serialize_entry("maxsize", &maxsize)?;
            }
        }
        map.end()
    }
}
