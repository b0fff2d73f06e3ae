//! Bit-level reader and writer for the compressed stream.
//! Bits are packed MSB-first within each byte; the writer zero-pads the
//! final byte and reports how many bits were useful, the reader can be
//! bounded by that count so the padding is never surfaced.

use bit_vec::BitVec;
use std::io::{Read,Write,ErrorKind};

/// sentinel meaning the reader is bounded only by end-of-file
const UNBOUNDED: u64 = u64::MAX;

pub struct BitWriter<'a,W: Write> {
    writer: &'a mut W,
    current: u8,
    /// bits already filled in `current`, 0..=7
    bit_pos: u8,
    /// useful bits written so far, padding excluded
    written: u64
}

impl <'a,W: Write> BitWriter<'a,W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            current: 0,
            bit_pos: 0,
            written: 0
        }
    }
    pub fn write_bit(&mut self,bit: u8) -> Result<(),std::io::Error> {
        self.current = (self.current << 1) | (bit & 1);
        self.bit_pos += 1;
        self.written += 1;
        if self.bit_pos == 8 {
            self.writer.write_all(&[self.current])?;
            self.current = 0;
            self.bit_pos = 0;
        }
        Ok(())
    }
    pub fn write_bits(&mut self,bits: &BitVec) -> Result<(),std::io::Error> {
        for b in bits.iter() {
            self.write_bit(b as u8)?;
        }
        Ok(())
    }
    /// write a byte as 8 bits MSB-first, at whatever bit alignment
    pub fn write_byte(&mut self,value: u8) -> Result<(),std::io::Error> {
        for i in (0..8).rev() {
            self.write_bit((value >> i) & 1)?;
        }
        Ok(())
    }
    /// write 8 bytes big-endian
    pub fn write_u64(&mut self,value: u64) -> Result<(),std::io::Error> {
        for byte in value.to_be_bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
    /// Zero-pad the last byte and return the number of useful bits written.
    /// The padding does not count.
    pub fn finish(mut self) -> Result<u64,std::io::Error> {
        if self.bit_pos > 0 {
            self.current <<= 8 - self.bit_pos;
            self.writer.write_all(&[self.current])?;
        }
        Ok(self.written)
    }
}

pub struct BitReader<'a,R: Read> {
    reader: &'a mut R,
    current: u8,
    /// bits left in `current`, 0..=8
    buffered: u8,
    /// useful bits still allowed out, or UNBOUNDED
    remaining: u64
}

impl <'a,R: Read> BitReader<'a,R> {
    pub fn new(reader: &'a mut R) -> Self {
        Self {
            reader,
            current: 0,
            buffered: 0,
            remaining: UNBOUNDED
        }
    }
    /// Bound the reader: after another `useful_bits` bits it reports end of
    /// stream regardless of how many padding bits remain in the file.
    pub fn set_limit(&mut self,useful_bits: u64) {
        self.remaining = useful_bits;
    }
    pub fn bits_remaining(&self) -> u64 {
        self.remaining
    }
    /// Next bit, or None once the bound or the file is exhausted.
    pub fn read_bit(&mut self) -> Result<Option<u8>,std::io::Error> {
        if self.remaining == 0 {
            return Ok(None);
        }
        if self.buffered == 0 {
            let mut byte: [u8;1] = [0];
            match self.reader.read_exact(&mut byte) {
                Ok(()) => {
                    self.current = byte[0];
                    self.buffered = 8;
                },
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e)
            }
        }
        let bit = self.current >> 7;
        self.current <<= 1;
        self.buffered -= 1;
        if self.remaining != UNBOUNDED {
            self.remaining -= 1;
        }
        Ok(Some(bit))
    }
    /// read 8 bits MSB-first into a byte; None if the stream ends first
    pub fn read_byte(&mut self) -> Result<Option<u8>,std::io::Error> {
        let mut ans: u8 = 0;
        for _i in 0..8 {
            match self.read_bit()? {
                Some(bit) => ans = (ans << 1) | bit,
                None => return Ok(None)
            }
        }
        Ok(Some(ans))
    }
    /// read 8 bytes big-endian; None if the stream ends first
    pub fn read_u64(&mut self) -> Result<Option<u64>,std::io::Error> {
        let mut ans: u64 = 0;
        for _i in 0..8 {
            match self.read_byte()? {
                Some(byte) => ans = (ans << 8) | byte as u64,
                None => return Ok(None)
            }
        }
        Ok(Some(ans))
    }
}

// *************** TESTS *****************

#[test]
fn writer_packs_msb_first_and_pads() {
    let mut buf: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut buf);
    writer.write_bit(1).unwrap();
    writer.write_bit(0).unwrap();
    writer.write_bit(1).unwrap();
    let useful = writer.finish().unwrap();
    assert_eq!(useful,3);
    assert_eq!(buf,vec![0b1010_0000]);
}

#[test]
fn writer_handles_unaligned_bytes() {
    let mut buf: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut buf);
    writer.write_bit(1).unwrap();
    writer.write_byte(0x61).unwrap();
    let useful = writer.finish().unwrap();
    assert_eq!(useful,9);
    // 1 01100001 -> 10110000 1...
    assert_eq!(buf,vec![0b1011_0000,0b1000_0000]);
}

#[test]
fn u64_survives_a_round_trip() {
    let mut buf: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut buf);
    writer.write_u64(0x1234_5678_9abc_def0).unwrap();
    writer.finish().unwrap();
    assert_eq!(buf,0x1234_5678_9abc_def0u64.to_be_bytes().to_vec());
    let mut src = std::io::Cursor::new(buf);
    let mut reader = BitReader::new(&mut src);
    assert_eq!(reader.read_u64().unwrap(),Some(0x1234_5678_9abc_def0));
    assert_eq!(reader.read_bit().unwrap(),None);
}

#[test]
fn bounded_reader_stops_before_the_padding() {
    let data: Vec<u8> = vec![0b1010_0000];
    let mut src = std::io::Cursor::new(data);
    let mut reader = BitReader::new(&mut src);
    reader.set_limit(3);
    assert_eq!(reader.read_bit().unwrap(),Some(1));
    assert_eq!(reader.read_bit().unwrap(),Some(0));
    assert_eq!(reader.bits_remaining(),1);
    assert_eq!(reader.read_bit().unwrap(),Some(1));
    assert_eq!(reader.bits_remaining(),0);
    assert_eq!(reader.read_bit().unwrap(),None);
}

#[test]
fn truncated_files_run_dry() {
    let data: Vec<u8> = vec![0xff];
    let mut src = std::io::Cursor::new(data);
    let mut reader = BitReader::new(&mut src);
    reader.set_limit(100);
    for _i in 0..8 {
        assert!(reader.read_bit().unwrap().is_some());
    }
    assert_eq!(reader.read_bit().unwrap(),None);
    assert_eq!(reader.read_byte().unwrap(),None);
}
