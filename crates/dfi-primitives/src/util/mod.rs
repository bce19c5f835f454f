//! Utility types for binary serialization.
//!
//! Provides VarInt encoding/decoding, `DfiReader` and `DfiWriter` structs
//! for reading/writing DeFi chain wire data, and the bounded-slice helpers
//! used when decoding length-prefixed sub-structures.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A Bitcoin-style variable-length integer.
///
/// VarInt is used in transaction data to indicate the number of upcoming fields
/// or the length of an upcoming field. The encoding uses 1, 3, 5, or 9 bytes
/// depending on the magnitude of the value. The encoder always emits the
/// shortest form; the decoder rejects over-long forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from a byte slice.
    ///
    /// # Arguments
    /// * `data` - Byte slice starting with a VarInt encoding.
    ///
    /// # Returns
    /// A tuple of `(VarInt, bytes_consumed)`, or an error if the slice is
    /// truncated or the encoding is not minimal.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let mut reader = DfiReader::new(data);
        let value = reader.read_varint()?;
        Ok((value, reader.position()))
    }

    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= 0xffff {
            3
        } else if self.0 <= 0xffff_ffff {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` of 1, 3, 5, or 9 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.length()];
        self.put_bytes(&mut buf);
        buf
    }

    /// Write the VarInt into a destination buffer.
    ///
    /// The buffer must be at least `self.length()` bytes long.
    ///
    /// # Arguments
    /// * `dst` - Destination buffer to write into.
    ///
    /// # Returns
    /// The number of bytes written.
    pub fn put_bytes(&self, dst: &mut [u8]) -> usize {
        let v = self.0;
        if v < 0xfd {
            dst[0] = v as u8;
            1
        } else if v <= 0xffff {
            dst[0] = 0xfd;
            dst[1..3].copy_from_slice(&(v as u16).to_le_bytes());
            3
        } else if v <= 0xffff_ffff {
            dst[0] = 0xfe;
            dst[1..5].copy_from_slice(&(v as u32).to_le_bytes());
            5
        } else {
            dst[0] = 0xff;
            dst[1..9].copy_from_slice(&v.to_le_bytes());
            9
        }
    }

    /// Return the underlying u64 value.
    ///
    /// # Returns
    /// The integer value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Return the value as a `usize` length or count.
    ///
    /// # Returns
    /// The value, or `VarIntTooLarge` if it does not fit the platform word.
    pub fn as_len(&self) -> Result<usize, PrimitivesError> {
        usize::try_from(self.0).map_err(|_| PrimitivesError::VarIntTooLarge)
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<u32> for VarInt {
    fn from(v: u32) -> Self {
        VarInt(v as u64)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// DfiReader
// ---------------------------------------------------------------------------

/// A cursor-based reader for DeFi chain binary data.
///
/// Wraps a byte slice and maintains a read position, providing methods
/// to read fixed-size integers and VarInt values in little-endian order.
/// Every read is bounded by the slice; nothing reads past the end.
#[derive(Debug, Clone)]
pub struct DfiReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DfiReader<'a> {
    /// Create a new reader over the given byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from.
    ///
    /// # Returns
    /// A `DfiReader` positioned at the start of the data.
    pub fn new(data: &'a [u8]) -> Self {
        DfiReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or an error if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    ///
    /// # Returns
    /// The array, or an error if insufficient data remains.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a single byte and advance the position.
    ///
    /// # Returns
    /// The byte value, or an error if no data remains.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a little-endian u16 and advance the position by 2 bytes.
    ///
    /// # Returns
    /// The decoded u16, or an error if insufficient data.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u32 and advance the position by 4 bytes.
    ///
    /// # Returns
    /// The decoded u32, or an error if insufficient data.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u64 and advance the position by 8 bytes.
    ///
    /// # Returns
    /// The decoded u64, or an error if insufficient data.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a VarInt and advance the position accordingly.
    ///
    /// Over-long encodings (e.g. `fd 05 00` for 5) are rejected.
    ///
    /// # Returns
    /// The decoded `VarInt`, or an error if insufficient data or non-canonical.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let first = self.read_u8()?;
        let (value, min) = match first {
            0xff => (self.read_u64_le()?, 0x1_0000_0000),
            0xfe => (self.read_u32_le()? as u64, 0x1_0000),
            0xfd => (self.read_u16_le()? as u64, 0xfd),
            b => return Ok(VarInt(b as u64)),
        };
        if value < min {
            return Err(PrimitivesError::NonCanonicalVarInt {
                value,
                len: VarInt(min).length(),
            });
        }
        Ok(VarInt(value))
    }

    /// Read a VarInt length prefix followed by that many bytes.
    ///
    /// # Returns
    /// The bytes, or an error if the declared length exceeds the remaining data.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_varint()?.as_len()?;
        self.read_bytes(len)
    }

    /// Split off a strict sub-reader over the next `n` bytes.
    ///
    /// # Arguments
    /// * `n` - Exact byte length of the sub-structure.
    ///
    /// # Returns
    /// A reader over exactly `n` bytes, or `UnexpectedEof` when fewer remain.
    pub fn sub_reader(&mut self, n: usize) -> Result<DfiReader<'a>, PrimitivesError> {
        Ok(DfiReader::new(self.read_bytes(n)?))
    }

    /// Consume and return every remaining byte.
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    /// Fail if any bytes remain unread.
    ///
    /// # Returns
    /// `Ok(())` when the reader is exhausted, `TrailingBytes` otherwise.
    pub fn finish(&self) -> Result<(), PrimitivesError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(PrimitivesError::TrailingBytes(n)),
        }
    }

    /// Return the number of bytes remaining.
    ///
    /// # Returns
    /// The count of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Return the current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check whether every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

// ---------------------------------------------------------------------------
// DfiWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for DeFi chain binary data.
///
/// Wraps a `Vec<u8>` and provides methods to append fixed-size integers
/// and VarInt values in little-endian order.
#[derive(Debug, Clone)]
pub struct DfiWriter {
    buf: Vec<u8>,
}

impl DfiWriter {
    /// Create a new empty writer.
    ///
    /// # Returns
    /// A `DfiWriter` with an empty internal buffer.
    pub fn new() -> Self {
        DfiWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial byte capacity of the internal buffer.
    ///
    /// # Returns
    /// A `DfiWriter` with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        DfiWriter { buf: Vec::with_capacity(capacity) }
    }

    /// Append raw bytes to the buffer.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to append.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte to the buffer.
    ///
    /// # Arguments
    /// * `val` - The byte value.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a little-endian u16 (2 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The u16 value.
    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u32 (4 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The u32 value.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u64 (8 bytes) to the buffer.
    ///
    /// # Arguments
    /// * `val` - The u64 value.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a VarInt to the buffer.
    ///
    /// # Arguments
    /// * `varint` - The VarInt value to encode and append.
    pub fn write_varint(&mut self, varint: VarInt) {
        let bytes = varint.to_bytes();
        self.buf.extend_from_slice(&bytes);
    }

    /// Append a VarInt length prefix followed by the bytes.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to append.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    /// Consume the writer and return the accumulated bytes.
    ///
    /// # Returns
    /// The internal byte buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Return a reference to the current buffer contents.
    ///
    /// # Returns
    /// A byte slice of the written data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Return the current length of the buffer.
    ///
    /// # Returns
    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    ///
    /// # Returns
    /// `true` if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for DfiWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- VarInt canonical boundaries --

    #[test]
    fn test_varint_put_bytes() {
        let cases: Vec<(u64, &str)> = vec![
            (0, "00"),
            (1, "01"),
            (0xfc, "fc"),
            (0xfd, "fdfd00"),
            (0xff, "fdff00"),
            (0xffff, "fdffff"),
            (0x1_0000, "fe00000100"),
            (0xffff_ffff, "feffffffff"),
            (0x1_0000_0000, "ff0000000001000000"),
            (u64::MAX, "ffffffffffffffffff"),
        ];

        for (value, expected) in cases {
            let vi = VarInt(value);
            assert_eq!(hex::encode(vi.to_bytes()), expected, "encoding {}", value);
            assert_eq!(vi.length(), expected.len() / 2, "length of {}", value);

            let bytes = hex::decode(expected).unwrap();
            let (decoded, used) = VarInt::from_bytes(&bytes).unwrap();
            assert_eq!(decoded, vi);
            assert_eq!(used, bytes.len());
        }
    }

    #[test]
    fn test_varint_rejects_overlong() {
        // 5 in three bytes
        let err = VarInt::from_bytes(&[0xfd, 0x05, 0x00]).unwrap_err();
        assert!(matches!(err, PrimitivesError::NonCanonicalVarInt { value: 5, .. }));

        // 0xffff in five bytes
        assert!(VarInt::from_bytes(&[0xfe, 0xff, 0xff, 0x00, 0x00]).is_err());

        // 1 in nine bytes
        assert!(VarInt::from_bytes(&[0xff, 0x01, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_varint_truncated() {
        assert!(matches!(
            VarInt::from_bytes(&[0xfd, 0x00]),
            Err(PrimitivesError::UnexpectedEof)
        ));
        assert!(VarInt::from_bytes(&[]).is_err());
    }

    // -- DfiReader / DfiWriter round-trip tests --

    #[test]
    fn test_dfi_reader_writer_roundtrip() {
        let mut writer = DfiWriter::new();
        writer.write_u8(0x42);
        writer.write_u16_le(0x1234);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_u64_le(0x0102030405060708);
        writer.write_varint(VarInt(300));
        writer.write_var_bytes(b"hello");

        let data = writer.into_bytes();
        let mut reader = DfiReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_varint().unwrap(), VarInt(300));
        assert_eq!(reader.read_var_bytes().unwrap(), b"hello");
        assert_eq!(reader.remaining(), 0);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_dfi_reader_eof() {
        let reader_data: &[u8] = &[0x01];
        let mut reader = DfiReader::new(reader_data);
        assert!(reader.read_u8().is_ok());
        assert!(reader.read_u8().is_err());
    }

    #[test]
    fn test_var_bytes_length_exceeds_data() {
        let mut reader = DfiReader::new(&[0x05, 0xaa, 0xbb]);
        assert!(matches!(reader.read_var_bytes(), Err(PrimitivesError::UnexpectedEof)));
    }

    #[test]
    fn test_sub_reader_is_strict() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = DfiReader::new(&data);
        let mut sub = reader.sub_reader(2).unwrap();
        assert_eq!(sub.read_u16_le().unwrap(), 0x0201);
        assert!(sub.read_u8().is_err());
        assert_eq!(reader.remaining(), 2);
        assert!(reader.sub_reader(3).is_err());
    }

    #[test]
    fn test_finish_reports_trailing() {
        let reader = DfiReader::new(&[0x00, 0x00]);
        assert!(matches!(reader.finish(), Err(PrimitivesError::TrailingBytes(2))));
    }
}
