//! Internal components: the adaptive Huffman engine, the bit-level
//! reader/writer, and the UTF-8 escape helpers.

pub mod adaptive_huff;
pub mod bit_io;
pub mod utf8;
