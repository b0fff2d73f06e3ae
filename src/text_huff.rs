//! Adaptive Huffman Text Compression
//!
//! Single-pass compression of UTF-8 text.  Nothing about the symbol
//! distribution is stored in the output; the encoder and decoder grow the
//! same Huffman tree from the symbol stream, so the codeword for symbol k
//! is always formed under the tree state left behind by symbols 0..k-1.
//! A symbol's first occurrence is announced by the codeword of the NYT
//! escape leaf followed by the symbol's raw UTF-8 bytes.
//!
//! File format: an 8 byte big-endian count of useful payload bits, then
//! the payload packed MSB-first, final byte zero-padded.  The decoder
//! stops once the counted bits are consumed, so the padding never decodes.

use std::io::{Cursor,Read,Write,Seek,SeekFrom,BufReader,BufWriter,ErrorKind};
use crate::tools::adaptive_huff::AdaptiveHuffman;
use crate::tools::bit_io::{BitReader,BitWriter};
use crate::tools::utf8;
use crate::{Error,DYNERR,STDRESULT};

/// size of the useful-bit-count header
const HEADER_BITS: u64 = 64;

/// Main compression function.
/// `text_in` is an object with the `Read` trait, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `huff_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.  Input that is not valid UTF-8 is refused.
pub fn compress<R,W>(text_in: &mut R, huff_out: &mut W) -> Result<(u64,u64),DYNERR>
where R: Read, W: Write + Seek {
    let mut reader = BufReader::new(text_in);
    let mut text = String::new();
    if let Err(e) = reader.read_to_string(&mut text) {
        return match e.kind() {
            ErrorKind::InvalidData => Err(Box::new(Error::InvalidUtf8)),
            _ => Err(Box::new(e))
        };
    }
    let mut writer = BufWriter::new(huff_out);
    let payload_bits = {
        let mut bits = BitWriter::new(&mut writer);
        // header placeholder, patched once the payload has been sized
        bits.write_u64(0)?;
        let mut huff = AdaptiveHuffman::new();
        let mut buf: [u8;4] = [0;4];
        log::debug!("entering loop over {} bytes of text",text.len());
        for ch in text.chars() {
            let (is_new,code) = huff.code_for(ch);
            bits.write_bits(&code)?;
            if is_new {
                log::trace!("escape for {:?} after {} code bits",ch,code.len());
                for byte in ch.encode_utf8(&mut buf).as_bytes() {
                    bits.write_byte(*byte)?;
                }
            }
            huff.update(ch);
        }
        bits.finish()? - HEADER_BITS
    };
    writer.seek(SeekFrom::Start(0))?;
    writer.write_all(&payload_bits.to_be_bytes())?;
    writer.flush()?;
    let out_size = writer.seek(SeekFrom::End(0))?;
    log::debug!("wrote {} useful payload bits",payload_bits);
    Ok((text.len() as u64,out_size))
}

/// Main decompression function.
/// `huff_in` is an object with the `Read` trait, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `text_out` is an object with the `Write` trait, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn expand<R,W>(huff_in: &mut R, text_out: &mut W) -> Result<(u64,u64),DYNERR>
where R: Read, W: Write {
    let mut reader = BufReader::new(huff_in);
    let mut writer = BufWriter::new(text_out);
    let mut bits = BitReader::new(&mut reader);
    let useful_bits = match bits.read_u64()? {
        Some(v) => v,
        None => {
            log::error!("header missing or incomplete");
            return Err(Box::new(Error::UnexpectedEndOfStream));
        }
    };
    bits.set_limit(useful_bits);
    let mut huff = AdaptiveHuffman::new();
    let mut out_size: u64 = 0;
    let mut buf: [u8;4] = [0;4];
    log::debug!("expanding {} useful payload bits",useful_bits);
    while bits.bits_remaining() > 0 {
        let decoded = huff.decode_one(|| bits.read_bit())?;
        let ch = match decoded {
            Some(c) => c,
            // NYT: the symbol follows as raw UTF-8
            None => utf8::read_scalar(&mut bits)?
        };
        writer.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        out_size += ch.len_utf8() as u64;
        huff.update(ch);
    }
    writer.flush()?;
    Ok((HEADER_BITS/8 + (useful_bits + 7)/8,out_size))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8]) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8]) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans)?;
    Ok(ans.into_inner())
}

/// Compress from path to path and append a record to `compression.txt`.
pub fn compress_file(in_path: &str,out_path: &str) -> STDRESULT {
    let now = std::time::Instant::now();
    let mut in_file = std::fs::File::open(in_path)?;
    let mut out_file = std::fs::File::create(out_path)?;
    let (in_size,out_size) = compress(&mut in_file,&mut out_file)?;
    log::info!("compressed {} into {} bytes",in_size,out_size);
    crate::stats::record_compression(in_path,out_path,now.elapsed())
}

/// Expand from path to path and append a record to `decompression.txt`.
pub fn expand_file(in_path: &str,out_path: &str) -> STDRESULT {
    let now = std::time::Instant::now();
    let mut in_file = std::fs::File::open(in_path)?;
    let mut out_file = std::fs::File::create(out_path)?;
    let (in_size,out_size) = expand(&mut in_file,&mut out_file)?;
    log::info!("expanded {} into {} bytes",in_size,out_size);
    crate::stats::record_decompression(in_path,out_path,now.elapsed())
}

// *************** TESTS *****************

#[cfg(test)]
use rand::{rngs,Rng,SeedableRng};

#[test]
fn compression_works() {
    // the lone symbol travels raw behind an empty NYT codeword
    let compressed = compress_slice("a".as_bytes()).expect("compression failed");
    assert_eq!(compressed,hex::decode("00 00 00 00 00 00 00 08 61".replace(" ","")).unwrap());

    // second occurrence is the 1 bit path to the 'a' leaf
    let compressed = compress_slice("aa".as_bytes()).expect("compression failed");
    assert_eq!(compressed,hex::decode("00 00 00 00 00 00 00 09 61 80".replace(" ","")).unwrap());

    // 'b' is announced by the NYT path (one 0) then its raw byte
    let compressed = compress_slice("ab".as_bytes()).expect("compression failed");
    assert_eq!(compressed,hex::decode("00 00 00 00 00 00 00 11 61 31 00".replace(" ","")).unwrap());

    let compressed = compress_slice("aaaa".as_bytes()).expect("compression failed");
    assert_eq!(compressed,hex::decode("00 00 00 00 00 00 00 0B 61 E0".replace(" ","")).unwrap());

    let compressed = compress_slice("aba".as_bytes()).expect("compression failed");
    assert_eq!(compressed,hex::decode("00 00 00 00 00 00 00 12 61 31 40".replace(" ","")).unwrap());

    // 4 byte scalar, still one symbol
    let compressed = compress_slice("😀".as_bytes()).expect("compression failed");
    assert_eq!(compressed,hex::decode("00 00 00 00 00 00 00 20 F0 9F 98 80".replace(" ","")).unwrap());
}

#[test]
fn empty_input_is_a_bare_header() {
    let compressed = compress_slice("".as_bytes()).expect("compression failed");
    assert_eq!(compressed,vec![0;8]);
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(expanded.len(),0);
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);

    let test_data = "père Noël à l'œuvre 😀 — ᛃᛃᛃ\n".as_bytes();
    let compressed = compress_slice(test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);

    let test_data = "1234567".as_bytes();
    let compressed = compress_slice(test_data).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn compression_is_deterministic() {
    let test_data = "abracadabra abracadabra\n".as_bytes();
    let first = compress_slice(test_data).expect("compression failed");
    let second = compress_slice(test_data).expect("compression failed");
    assert_eq!(first,second);
}

#[test]
fn all_distinct_symbols_round_trip() {
    // every symbol is a first occurrence, the stream is all escapes
    let text: String = ('a'..='z').collect();
    let compressed = compress_slice(text.as_bytes()).expect("compression failed");
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(text.as_bytes().to_vec(),expanded);
}

#[test]
fn repeated_symbol_compresses_to_one_bit_codes() {
    let text = "a".repeat(2000);
    let compressed = compress_slice(text.as_bytes()).expect("compression failed");
    // one raw escape then a single bit per symbol
    assert_eq!(compressed.len(),8 + (8 + 1999 + 7)/8);
    let expanded = expand_slice(&compressed).expect("expansion failed");
    assert_eq!(text.as_bytes().to_vec(),expanded);
}

#[test]
fn random_streams_round_trip() {
    for (seed,alphabet,len) in [(1u64,2u32,500usize),(2,26,2000),(3,256,1000),(4,1000,3000)] {
        let mut rng = rngs::SmallRng::seed_from_u64(seed);
        let text: String = (0..len)
            .map(|_| char::from_u32(0x4E00 + rng.gen_range(0..alphabet)).expect("bad test scalar"))
            .collect();
        let compressed = compress_slice(text.as_bytes()).expect("compression failed");
        let expanded = expand_slice(&compressed).expect("expansion failed");
        assert_eq!(text.as_bytes().to_vec(),expanded);
    }
}

#[test]
fn ratio_improves_with_length() {
    // longer streams spend proportionally less on escapes
    let mut last = f64::MAX;
    for reps in [1,4,10,40] {
        let text = "abracadabra ".repeat(reps);
        let compressed = compress_slice(text.as_bytes()).expect("compression failed");
        let ratio = compressed.len() as f64 / text.len() as f64;
        assert!(ratio < last,"ratio {} did not improve on {}",ratio,last);
        last = ratio;
    }
}

#[test]
fn bad_input_is_refused() {
    // not UTF-8
    assert!(compress_slice(&[0xff,0xfe,0x00]).is_err());
    // no header
    assert!(expand_slice(&[1,2,3]).is_err());
    // header promises more bits than the file holds
    let mut compressed = compress_slice("ab".as_bytes()).expect("compression failed");
    compressed.truncate(9);
    let err = expand_slice(&compressed).expect_err("expansion should fail");
    assert_eq!(err.to_string(),Error::UnexpectedEndOfStream.to_string());
}
