use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Size of the canonical RIFF/WAVE header written before the PCM data.
pub const HEADER_LEN: usize = 44;

const PCM_FORMAT_TAG: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;
// "WAVE" + fmt chunk header + fmt body + data chunk header
const RIFF_OVERHEAD: u32 = 4 + 8 + FMT_CHUNK_LEN + 8;

#[derive(Debug, thiserror::Error)]
pub enum WavError {
    #[error("{field} must be a positive integer")]
    ZeroField { field: &'static str },

    #[error("audio format does not fit a WAV header: {0}")]
    FormatOverflow(&'static str),

    #[error("PCM buffer of {len} bytes is too large for a WAV file")]
    DataTooLarge { len: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Channel count, sample rate and sample width (in bytes) of a PCM stream.
///
/// Built through [`AudioFormat::new`] so that every derived header field is
/// known to fit. The default matches what Gemini TTS returns: mono, 24 kHz,
/// 16-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    channels: u16,
    sample_rate: u32,
    sample_width: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 24000,
            sample_width: 2,
        }
    }
}

impl AudioFormat {
    pub fn new(channels: u16, sample_rate: u32, sample_width: u16) -> Result<Self, WavError> {
        if channels == 0 {
            return Err(WavError::ZeroField { field: "channel count" });
        }
        if sample_rate == 0 {
            return Err(WavError::ZeroField { field: "sample rate" });
        }
        if sample_width == 0 {
            return Err(WavError::ZeroField { field: "sample width" });
        }

        sample_width
            .checked_mul(8)
            .ok_or(WavError::FormatOverflow("bits per sample"))?;
        let block_align = channels
            .checked_mul(sample_width)
            .ok_or(WavError::FormatOverflow("block align"))?;
        sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or(WavError::FormatOverflow("byte rate"))?;

        Ok(Self {
            channels,
            sample_rate,
            sample_width,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bytes per sample, per channel.
    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width * 8
    }

    /// Bytes per frame (one sample across all channels).
    pub fn block_align(&self) -> u16 {
        self.channels * self.sample_width
    }

    /// Bytes per second of playback.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }

    /// Whether `len` bytes hold a whole number of frames.
    pub fn is_aligned(&self, len: usize) -> bool {
        len % usize::from(self.block_align()) == 0
    }
}

pub struct WavHeader {
    pub format: AudioFormat,
    pub data_len: u32,
}

impl WavHeader {
    /// Header for `data_len` bytes of PCM in `format`.
    pub fn for_pcm(format: AudioFormat, data_len: usize) -> Result<Self, WavError> {
        let data_len = u32::try_from(data_len)
            .ok()
            .filter(|len| len.checked_add(RIFF_OVERHEAD).is_some())
            .ok_or(WavError::DataTooLarge { len: data_len })?;
        Ok(Self { format, data_len })
    }

    pub fn write_header<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        // RIFF header
        writer.write_all(b"RIFF")?;
        writer.write_all(&(RIFF_OVERHEAD + self.data_len).to_le_bytes())?;
        writer.write_all(b"WAVE")?;

        // Format chunk
        writer.write_all(b"fmt ")?;
        writer.write_all(&FMT_CHUNK_LEN.to_le_bytes())?;
        writer.write_all(&PCM_FORMAT_TAG.to_le_bytes())?;
        writer.write_all(&self.format.channels().to_le_bytes())?;
        writer.write_all(&self.format.sample_rate().to_le_bytes())?;
        writer.write_all(&self.format.byte_rate().to_le_bytes())?;
        writer.write_all(&self.format.block_align().to_le_bytes())?;
        writer.write_all(&self.format.bits_per_sample().to_le_bytes())?;

        // Data chunk header
        writer.write_all(b"data")?;
        writer.write_all(&self.data_len.to_le_bytes())?;

        Ok(())
    }
}

/// Writes a complete WAV stream: header, then `pcm` unmodified.
///
/// A buffer that does not hold a whole number of frames is still written as
/// is. The declared data length stays exact, but players will read the
/// trailing partial frame as malformed audio.
pub fn write_wav<W: Write>(writer: &mut W, pcm: &[u8], format: AudioFormat) -> Result<(), WavError> {
    let header = WavHeader::for_pcm(format, pcm.len())?;
    if !format.is_aligned(pcm.len()) {
        tracing::warn!(
            "PCM length {} is not a multiple of the {}-byte frame size; last frame is partial",
            pcm.len(),
            format.block_align()
        );
    }
    header.write_header(writer)?;
    writer.write_all(pcm)?;
    Ok(())
}

/// Creates (or truncates) the file at `path` and writes `pcm` into it as WAV.
///
/// The file is flushed and its handle closed before this returns, on success
/// and on error alike.
pub fn write_wav_file(path: &Path, pcm: &[u8], format: AudioFormat) -> Result<(), WavError> {
    // Reject oversized buffers before touching whatever is already at `path`.
    WavHeader::for_pcm(format, pcm.len())?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_wav(&mut writer, pcm, format)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    tracing::debug!("wrote {} bytes of PCM to {}", pcm.len(), path.display());
    Ok(())
}
