//! Binary `NEDX` export for runtime consumption.
//!
//! The export keeps only the traversal topology: node IDs, kind codes and the
//! outputs with their labels and link targets. Positions, layers and input
//! connectors are dropped, and the format cannot be loaded back.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! "NEDX"            4 bytes
//! version           i32 (1)
//! node count        i32
//! per node:
//!   id              16 bytes, mixed-endian GUID order
//!   kind code       i32
//!   output count    i32
//!   per output:
//!     label         7-bit varint byte length + UTF-8
//!     linked        u8 (0 or 1)
//!     target node   16 bytes, only when linked
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use log::info;

use crate::error::Result;
use crate::graph::Graph;

pub const MAGIC: &[u8; 4] = b"NEDX";
pub const VERSION: i32 = 1;

/// Write the export of `graph` into `writer`.
pub fn write_export<W: Write>(graph: &Graph, writer: &mut W) -> Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_i32::<LittleEndian>(VERSION)?;
    writer.write_i32::<LittleEndian>(count(graph.len()))?;

    for node in graph.nodes() {
        writer.write_all(&node.id().0.to_bytes_le())?;
        writer.write_i32::<LittleEndian>(node.kind().code())?;
        writer.write_i32::<LittleEndian>(count(node.outputs().len()))?;

        for output in node.outputs() {
            write_string(writer, output.text())?;
            match graph.target(output.id()) {
                Some(input) => {
                    writer.write_u8(1)?;
                    writer.write_all(&input.owner().0.to_bytes_le())?;
                }
                None => writer.write_u8(0)?,
            }
        }
    }
    Ok(())
}

/// Export `graph` to a file.
pub fn export(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_export(graph, &mut writer)?;
    writer.flush()?;
    info!("exported {} node(s) to {}", graph.len(), path.display());
    Ok(())
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Length-prefixed string: byte length as a 7-bit varint, then UTF-8 bytes.
fn write_string<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let mut len = text.len();
    while len >= 0x80 {
        writer.write_u8((len as u8 & 0x7f) | 0x80)?;
        len >>= 7;
    }
    writer.write_u8(len as u8)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}
