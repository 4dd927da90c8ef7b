//! Closed-set tags describing a tablespace's addressing regime and contents.
//!
//! Both tags are fixed for the lifetime of the container; a cross-value
//! transition is an unsupported operation the caller must reject, not a
//! statement this layer will render.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage-file addressing regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Bigfile,
    Smallfile,
}

impl FileType {
    pub fn is_bigfile(&self) -> bool {
        matches!(self, FileType::Bigfile)
    }
}

/// Catalog BIGFILE flag ("YES"/"NO") arrives as a boolean by the time it
/// reaches this layer.
impl From<bool> for FileType {
    fn from(bigfile: bool) -> FileType {
        if bigfile {
            FileType::Bigfile
        } else {
            FileType::Smallfile
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Bigfile => f.write_str("bigfile"),
            FileType::Smallfile => f.write_str("smallfile"),
        }
    }
}

/// What a tablespace holds. Each value carries the keyword pair used in DDL:
/// the creation qualifier and the word that introduces its data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Permanent,
    Undo,
    Temp,
}

impl ContentType {
    /// Qualifier in `create ... tablespace`; empty for permanent content.
    pub fn create_keyword(&self) -> &'static str {
        match self {
            ContentType::Permanent => "",
            ContentType::Undo => "undo",
            ContentType::Temp => "temporary",
        }
    }

    /// Keyword introducing a file reference in alter/create statements.
    pub fn datafile_keyword(&self) -> &'static str {
        match self {
            ContentType::Permanent | ContentType::Undo => "datafile",
            ContentType::Temp => "tempfile",
        }
    }

    /// Maps a DBA_TABLESPACES.CONTENTS value.
    pub fn from_catalog(contents: &str) -> Option<ContentType> {
        match contents {
            "PERMANENT" => Some(ContentType::Permanent),
            "UNDO" => Some(ContentType::Undo),
            "TEMPORARY" => Some(ContentType::Temp),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Permanent => f.write_str("permanent"),
            ContentType::Undo => f.write_str("undo"),
            ContentType::Temp => f.write_str("temp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_vocabulary() {
        assert_eq!(ContentType::Permanent.create_keyword(), "");
        assert_eq!(ContentType::Undo.create_keyword(), "undo");
        assert_eq!(ContentType::Temp.create_keyword(), "temporary");
        assert_eq!(ContentType::Permanent.datafile_keyword(), "datafile");
        assert_eq!(ContentType::Undo.datafile_keyword(), "datafile");
        assert_eq!(ContentType::Temp.datafile_keyword(), "tempfile");
    }

    #[test]
    fn test_catalog_contents_mapping() {
        assert_eq!(
            ContentType::from_catalog("PERMANENT"),
            Some(ContentType::Permanent)
        );
        assert_eq!(ContentType::from_catalog("UNDO"), Some(ContentType::Undo));
        assert_eq!(
            ContentType::from_catalog("TEMPORARY"),
            Some(ContentType::Temp)
        );
        assert_eq!(ContentType::from_catalog("permanent"), None);
    }

    #[test]
    fn test_file_type_from_catalog_flag() {
        assert_eq!(FileType::from(true), FileType::Bigfile);
        assert_eq!(FileType::from(false), FileType::Smallfile);
        assert_eq!(FileType::Bigfile.to_string(), "bigfile");
        assert_eq!(FileType::Smallfile.to_string(), "smallfile");
    }
}
