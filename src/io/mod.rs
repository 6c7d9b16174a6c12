//! I/O: the bit cursor, field codecs, body compression and the SWF
//! reader/writer.

pub mod bit_cursor;
pub mod compression;
pub mod field_codec;
pub mod reader;
pub mod writer;

pub use bit_cursor::BitCursor;
pub use compression::CompressionMethod;
pub use reader::{SwfReader, SwfReaderConfiguration};
pub use writer::SwfWriter;
