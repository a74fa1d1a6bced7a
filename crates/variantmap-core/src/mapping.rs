// Variantmap Mapping Tables
// Reads "layout -> layout" mapping tables from text files

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::layout::{LayoutToken, TokenError};

/// Marker that starts a comment running to the end of the line
pub const COMMENT_MARKER: &str = "//";

/// A single table row: the source layout and the layout it maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPair {
    pub source: LayoutToken,
    pub target: LayoutToken,
}

impl MappingPair {
    pub fn new(source: LayoutToken, target: LayoutToken) -> Self {
        Self { source, target }
    }
}

/// Ordered list of mapping pairs, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    pairs: Vec<MappingPair>,
}

/// Why a single line could not be turned into a mapping pair
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("expected 2 or 4 fields, found {0}")]
    FieldCount(usize),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Errors that can occur while reading a mapping table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line_number}: invalid line: {line} ({reason})", .path.display())]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        line: String,
        reason: LineError,
    },
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: MappingPair) {
        self.pairs.push(pair);
    }

    pub fn pairs(&self) -> &[MappingPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MappingPair> {
        self.pairs.iter()
    }
}

impl FromIterator<MappingPair> for MappingTable {
    fn from_iter<I: IntoIterator<Item = MappingPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MappingTable {
    type Item = &'a MappingPair;
    type IntoIter = std::slice::Iter<'a, MappingPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Drop everything from the first `//` onwards
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse one table line
///
/// Returns `Ok(None)` for lines that are blank once the comment is removed.
/// Any other field count than 2 or 4 is an error, as is a 4-field line
/// whose layout fields already use the compact `layout(variant)` form.
pub fn parse_line(line: &str) -> Result<Option<MappingPair>, LineError> {
    let fields: Vec<&str> = strip_comment(line).split_whitespace().collect();

    let pair = match fields.as_slice() {
        [] => return Ok(None),
        [source, target] => {
            MappingPair::new(LayoutToken::parse(source)?, LayoutToken::parse(target)?)
        }
        [source, source_variant, target, target_variant] => MappingPair::new(
            LayoutToken::parse_with_variant(source, Some(*source_variant))?,
            LayoutToken::parse_with_variant(target, Some(*target_variant))?,
        ),
        other => return Err(LineError::FieldCount(other.len())),
    };

    Ok(Some(pair))
}

/// Read a mapping table from any buffered reader
///
/// `path` only labels errors; nothing is opened.
pub fn read_table_from<R: BufRead>(reader: R, path: &Path) -> Result<MappingTable, TableError> {
    let mut table = MappingTable::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = parse_line(&line).map_err(|reason| TableError::MalformedLine {
            path: path.to_path_buf(),
            line_number: index + 1,
            line: line.clone(),
            reason,
        })?;

        if let Some(pair) = parsed {
            log::trace!("{}:{}: {} -> {}", path.display(), index + 1, pair.source, pair.target);
            table.push(pair);
        }
    }

    log::debug!("read {} mapping(s) from {}", table.len(), path.display());
    Ok(table)
}

/// Read a mapping table from a file
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<MappingTable, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table_from(BufReader::new(file), path)
}
