//! Taxonomy text loader.
//!
//! One group per line, whitespace-separated: the code first, then the
//! member words.
//!
//! ```text
//! Aa01A01= 人 士 人物 人士 人氏 人选
//! Aa01A02= 人类 生人 全人类
//! ```
//!
//! Blank lines are skipped. A line whose first token is not a valid code is
//! an error carrying its 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::model::Code;
use crate::{Error, Result};
use super::{CodeIndex, CodeIndexBuilder};

/// Parse taxonomy text held in memory.
pub fn parse_taxonomy(text: &str) -> Result<CodeIndex> {
    let mut builder = CodeIndex::builder();
    for (idx, line) in text.lines().enumerate() {
        parse_line(&mut builder, idx + 1, line)?;
    }
    finish(builder, "text")
}

/// Read taxonomy text from any buffered reader.
pub fn read_taxonomy<R: BufRead>(reader: R) -> Result<CodeIndex> {
    let mut builder = CodeIndex::builder();
    for (idx, line) in reader.lines().enumerate() {
        parse_line(&mut builder, idx + 1, &line?)?;
    }
    finish(builder, "reader")
}

/// Read a taxonomy file from disk.
pub fn load_taxonomy_file(path: impl AsRef<Path>) -> Result<CodeIndex> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let index = read_taxonomy(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), codes = index.len(), "loaded taxonomy file");
    Ok(index)
}

fn parse_line(builder: &mut CodeIndexBuilder, line_no: usize, line: &str) -> Result<()> {
    // A UTF-8 BOM may precede the first code.
    let line = line.trim_start_matches('\u{feff}').trim();
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(());
    };
    let code = Code::parse(first).map_err(|e| Error::Parse {
        line: line_no,
        message: e.to_string(),
    })?;
    builder.insert(code, tokens);
    Ok(())
}

fn finish(builder: CodeIndexBuilder, source: &'static str) -> Result<CodeIndex> {
    let index = builder.build();
    tracing::debug!(source, codes = index.len(), words = index.word_count(), "parsed taxonomy");
    Ok(index)
}
