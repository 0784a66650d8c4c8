//! Implementations of the `cdb` subcommands.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::reader::Reader;
use crate::writer::Writer;

/// `cdb create <db> [--from <records-file>]`
///
/// Reads `key\tvalue` lines, one record per line, from `from` (or stdin if
/// absent), and writes them to a freshly created `db`.
pub fn create(db: &Path, from: Option<&Path>) -> Result<()> {
    let mut writer = Writer::create(db)
        .with_context(|| format!("creating {}", db.display()))?;

    let mut line_no = 0usize;
    let read_lines = |mut handle: Box<dyn BufRead>| -> Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = handle.read_line(&mut line)?;
            if n == 0 {
                break;
            }
            line_no += 1;
            let line = line.strip_suffix('\n').unwrap_or(&line);
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once('\t').with_context(|| {
                format!("line {line_no}: expected `key<TAB>value`, found {line:?}")
            })?;
            writer.append_str(key, value)?;
        }
        Ok(())
    };

    match from {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_lines(Box::new(BufReader::new(file)))?;
        }
        None => {
            read_lines(Box::new(BufReader::new(io::stdin())))?;
        }
    }

    writer.close().with_context(|| format!("finishing {}", db.display()))?;
    Ok(())
}

/// `cdb get <db> <key>`
pub fn get(db: &Path, key: &str) -> Result<()> {
    let reader = Reader::open(db).with_context(|| format!("opening {}", db.display()))?;
    match reader.get_str(key)? {
        Some(value) => {
            io::stdout().write_all(&value)?;
            println!();
            Ok(())
        }
        None => bail!("key not found: {key:?}"),
    }
}

/// `cdb find <db> <key>`
pub fn find(db: &Path, key: &str) -> Result<()> {
    let reader = Reader::open(db).with_context(|| format!("opening {}", db.display()))?;
    let mut found = false;
    for value in reader.find(key.as_bytes()) {
        found = true;
        io::stdout().write_all(&value)?;
        println!();
    }
    if !found {
        bail!("key not found: {key:?}");
    }
    Ok(())
}

/// `cdb dump <db>`
pub fn dump(db: &Path) -> Result<()> {
    let reader = Reader::open(db).with_context(|| format!("opening {}", db.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for pair in reader.records() {
        let (key, value) = pair?;
        out.write_all(&key)?;
        out.write_all(b"\t")?;
        out.write_all(&value)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// `cdb stats <db>`
pub fn stats(db: &Path) -> Result<()> {
    let reader = Reader::open(db).with_context(|| format!("opening {}", db.display()))?;
    let record_count = reader.records().count();
    println!("records:          {record_count}");
    println!("occupied buckets: {}/256", reader.occupied_buckets());
    println!("max bucket len:   {}", reader.max_bucket_length());
    println!("total slots:      {}", reader.total_slots());
    Ok(())
}
