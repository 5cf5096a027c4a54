/// PNG file signature. Skipped by the walker, never validated.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// PNG container layout (illustrated profile).
pub const PNG_PREAMBLE_LEN: u64 = 8;
pub const PNG_LENGTH_WIDTH: usize = 4; // u32, big-endian
pub const PNG_TAG_WIDTH: usize = 4;    // chunk type, e.g. b"IHDR"
pub const PNG_TRAILER_WIDTH: usize = 4; // CRC-32 (not checked)

/// Widest length field `byteorder::BigEndian::read_uint` can decode.
pub const MAX_LENGTH_WIDTH: usize = 8;

/// Widest type tag a `Chunk` carries inline.
pub const MAX_TAG_WIDTH: usize = 16;

/// Default in-flight message slots for `pipe`. Zero is a rendezvous channel.
pub const DEFAULT_PIPE_CAPACITY: usize = 0;

/// Scratch buffer size used by `copy_n` and composite copies.
pub const COPY_BUF_SIZE: usize = 8 * 1024;
