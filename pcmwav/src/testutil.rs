use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::structs::header::{Header, MONO};

/// In-memory WAVE file with a canonical header describing `payload`.
pub(crate) fn wav(channels: u16, sample_rate: u32, bits: u16, payload: &[u8]) -> Cursor<Vec<u8>> {
    let mut bytes = Header::pcm(channels, sample_rate, bits, payload.len() as u32).encode();
    bytes.extend_from_slice(payload);
    Cursor::new(bytes)
}

pub(crate) fn mono16(sample_rate: u32, samples: &[i16]) -> Cursor<Vec<u8>> {
    let payload: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    wav(MONO, sample_rate, 16, &payload)
}

pub(crate) fn samples16(payload: &[u8]) -> Vec<i16> {
    payload
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

/// Sink that accepts `limit` bytes and fails every write after that.
pub(crate) struct FailingWriter {
    limit: usize,
    written: usize,
}

impl FailingWriter {
    pub(crate) fn after(limit: usize) -> Self {
        Self { limit, written: 0 }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit - self.written;
        if room == 0 {
            return Err(io::Error::other("disk full"));
        }
        let n = room.min(buf.len());
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Source whose reads fail once the cursor reaches `fail_at`.
pub(crate) struct FailingSource {
    inner: Cursor<Vec<u8>>,
    fail_at: u64,
}

impl FailingSource {
    pub(crate) fn after(inner: Cursor<Vec<u8>>, fail_at: u64) -> Self {
        Self { inner, fail_at }
    }
}

impl Read for FailingSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let room = self.fail_at.saturating_sub(self.inner.position());
        if room == 0 {
            return Err(io::Error::other("read failed"));
        }
        let n = (room as usize).min(buf.len());
        self.inner.read(&mut buf[..n])
    }
}

impl Seek for FailingSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
