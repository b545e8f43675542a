//! The persistent dictionary of confirmed glyph shapes.

use common_failures::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::geom::Point;
use crate::piece::{Fingerprint, Style, StyledText};

/// A mapping from normalized glyph fingerprints to the text an operator
/// confirmed for them.  Lookup is exact-shape only: the derived hash finds
/// candidates in average O(1) and equality re-checks the full pixel set, so
/// hash collisions merely cost time.
///
/// A dictionary usually lives longer than one session: load it at startup,
/// pass it to a [`Session`](crate::Session), and save whatever the session
/// hands back.  Within a session it only grows, except that confirming a
/// different text for a known shape overwrites the old entry.
#[derive(Debug, Default)]
pub struct GlyphDict {
    entries: HashMap<Fingerprint, StyledText>,
    max_symbol_count: usize,
}

impl GlyphDict {
    /// Create an empty dictionary.
    pub fn new() -> GlyphDict {
        GlyphDict::default()
    }

    /// Look up the confirmed text for a fingerprint, if any.
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<&StyledText> {
        self.entries.get(fingerprint)
    }

    /// Record the confirmed text for a fingerprint, replacing any previous
    /// entry for the same shape.
    pub fn insert(&mut self, fingerprint: Fingerprint, text: StyledText) {
        self.max_symbol_count = self.max_symbol_count.max(fingerprint.symbol_count());
        self.entries.insert(fingerprint, text);
    }

    /// The largest `symbol_count` ever stored.  Recognition uses this to
    /// bound how many merge lengths are worth trying.
    pub fn max_known_run(&self) -> usize {
        self.max_symbol_count
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the dictionary empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a snapshot previously written by `to_writer`.
    pub fn from_reader<R: Read>(reader: R) -> Result<GlyphDict> {
        let entries: Vec<SnapshotEntry> = serde_json::from_reader(reader)
            .with_context(|_| format_err!("could not parse glyph dictionary"))?;
        let mut dict = GlyphDict::new();
        for entry in entries {
            let SnapshotEntry {
                width,
                height,
                symbol_count,
                pixels,
                text,
                bold,
                italic,
                underline,
            } = entry;
            dict.insert(
                Fingerprint::from_parts(width, height, symbol_count, pixels),
                StyledText::new(
                    text,
                    Style {
                        bold,
                        italic,
                        underline,
                    },
                ),
            );
        }
        Ok(dict)
    }

    /// Write a snapshot of every entry.  Entries are sorted first so that
    /// saving the same dictionary twice produces identical bytes.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut entries: Vec<SnapshotEntry> = self
            .entries
            .iter()
            .map(|(fingerprint, text)| SnapshotEntry {
                width: fingerprint.width(),
                height: fingerprint.height(),
                symbol_count: fingerprint.symbol_count(),
                pixels: fingerprint.pixels().to_vec(),
                text: text.text.clone(),
                bold: text.style.bold,
                italic: text.style.italic,
                underline: text.style.underline,
            })
            .collect();
        entries.sort();
        serde_json::to_writer(writer, &entries)
            .with_context(|_| format_err!("could not write glyph dictionary"))?;
        Ok(())
    }

    /// Load a dictionary snapshot from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<GlyphDict> {
        let path = path.as_ref();
        let f = fs::File::open(path).io_read_context(path)?;
        let dict = GlyphDict::from_reader(io::BufReader::new(f))?;
        debug!(
            "loaded {} glyph shapes from {}",
            dict.len(),
            path.display()
        );
        Ok(dict)
    }

    /// Save a dictionary snapshot to a file, replacing it if present.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let f = fs::File::create(path).io_write_context(path)?;
        let mut writer = io::BufWriter::new(f);
        self.to_writer(&mut writer)?;
        writer.flush().io_write_context(path)?;
        debug!("saved {} glyph shapes to {}", self.len(), path.display());
        Ok(())
    }
}

/// One row of the on-disk snapshot.  The field list is the format contract:
/// normalized dimensions, run length, normalized pixel set, text and style
/// flags, all of which round-trip exactly through JSON.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
struct SnapshotEntry {
    width: usize,
    height: usize,
    symbol_count: usize,
    pixels: Vec<Point>,
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
}
