//! # Huffstream Library
//!
//! Compress or expand UTF-8 text using adaptive Huffman coding.
//! * `text_huff` is a single-pass compressor/decompressor; no statistics
//!   are transmitted, the Huffman tree on both sides is rebuilt from the
//!   symbol stream itself
//! * symbols are Unicode scalars; first occurrences travel as raw UTF-8
//!   behind a NYT ("not yet transmitted") escape code
//!
//! The compression/expansion functions are generics that operate on trait
//! objects with bounds `Read` or `Write + Seek`.  There are convenience
//! functions for working directly with buffers, and path-level wrappers
//! that also append a record to the stats registry.
//!
//! ## File Example
//!
//! ```rs
//! use huffstream::*;
//! let mut in_file = std::fs::File::open("some_input_path").expect("open failed");
//! let mut out_file = std::fs::File::create("some_output_path").expect("create failed");
//! let (in_size,out_size) = text_huff::compress(&mut in_file,&mut out_file)
//!     .expect("compression failed");
//! eprintln!("compressed {} into {}",in_size,out_size);
//! ```
//!
//! ## Buffer Example
//!
//! ```rs
//! use huffstream::*;
//! let test_data = "This is the chaunt of the priests.  The chaunt of the priests of Mung.".as_bytes();
//! let compressed = text_huff::compress_slice(test_data).expect("compression failed");
//! ```

mod tools;
mod stats;
pub mod text_huff;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Stream and tree errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,
    #[error("corrupted tree")]
    CorruptedTree,
    #[error("bad usage")]
    UsageError
}
