//! System output files.
//!
//! One line per document, in id order:
//!
//! ```text
//! Document:0 talk.politics.guns talk.politics.guns -3.1 talk.politics.misc -4.7 ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::document::corpus::Corpus;
use crate::error::Result;

/// Write the system output of every document to `writer`.
///
/// With `exponentiate`, scores are printed as `10^score` instead of log10
/// values. Fails on the first unclassified document.
pub fn write_sys_output<W: Write>(corpus: &Corpus, mut writer: W, exponentiate: bool) -> Result<()> {
    for document in corpus.documents() {
        writeln!(writer, "{}", document.formatted_system_output(exponentiate)?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the system output to a file, replacing it if it exists.
pub fn write_sys_output_file<P: AsRef<Path>>(
    corpus: &Corpus,
    path: P,
    exponentiate: bool,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_sys_output(corpus, BufWriter::new(file), exponentiate)
}

/// The system output as a string.
pub fn format_sys_output(corpus: &Corpus, exponentiate: bool) -> Result<String> {
    let mut buffer = Vec::new();
    write_sys_output(corpus, &mut buffer, exponentiate)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
