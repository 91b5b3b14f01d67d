use std::path::{Path, PathBuf};

use crate::error::{GenerateError, InputError, OperationalError};
use crate::tts::compose_prompt;
use crate::tts::synth::SpeechSynth;
use crate::utils::fileio::{ensure_parent_dir, read_audio_file};
use crate::utils::wav::{AudioFormat, write_wav_file};

/// What the user typed into the form.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub api_key: String,
    pub style: String,
    pub script: String,
}

impl GenerateRequest {
    /// Checks for empty fields before anything goes over the network.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.api_key.is_empty() {
            return Err(InputError::MissingApiKey);
        }
        if self.style.is_empty() || self.script.is_empty() {
            return Err(InputError::MissingStyleOrScript);
        }
        Ok(())
    }
}

/// Format details of a written file, as read back by a WAV reader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub frames: u32,
    pub duration_secs: f64,
}

impl WavInfo {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, hound::Error> {
        let reader = hound::WavReader::new(bytes)?;
        let spec = reader.spec();
        let frames = reader.duration();
        Ok(Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            frames,
            duration_secs: f64::from(frames) / f64::from(spec.sample_rate),
        })
    }

    /// Same details computed from the format alone, counting whole frames only.
    pub fn from_format(format: AudioFormat, data_len: usize) -> Self {
        let frames = (data_len / usize::from(format.block_align())) as u32;
        Self {
            channels: format.channels(),
            sample_rate: format.sample_rate(),
            bits_per_sample: format.bits_per_sample(),
            frames,
            duration_secs: f64::from(frames) / f64::from(format.sample_rate()),
        }
    }
}

/// The file a successful generation left behind.
#[derive(Debug, Clone)]
pub struct GeneratedAudio {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub info: WavInfo,
}

/// Writes `pcm` to `output` as WAV and returns the file's bytes as read back.
fn write_and_read_back(output: &Path, pcm: &[u8], format: AudioFormat) -> Result<Vec<u8>, GenerateError> {
    ensure_parent_dir(output)?;
    write_wav_file(output, pcm, format)?;
    Ok(read_audio_file(output)?)
}

/// Runs one generation: validate, synthesize, write `output` as WAV, read it back.
///
/// Style and script are sent exactly as typed. Input errors return before
/// `synth` is called. Errors from `synth` return before `output` is
/// touched, so an earlier file there survives.
pub async fn generate<S: SpeechSynth>(
    synth: &S,
    request: &GenerateRequest,
    output: &Path,
    format: AudioFormat,
) -> Result<GeneratedAudio, GenerateError> {
    request.validate()?;

    let prompt = compose_prompt(&request.style, &request.script);
    let pcm = synth.synthesize(&request.api_key, &prompt).await?;
    let pcm_len = pcm.len();

    let path = output.to_path_buf();
    let bytes = tokio::task::spawn_blocking(move || write_and_read_back(&path, &pcm, format))
        .await
        .map_err(OperationalError::from)??;

    // hound refuses partial trailing frames and widths it does not decode;
    // the file is still valid, so describe it from the format instead
    let info = WavInfo::from_bytes(&bytes).unwrap_or_else(|e| {
        tracing::warn!("could not re-read {}: {}", output.display(), e);
        WavInfo::from_format(format, pcm_len)
    });
    tracing::info!(
        "audio saved to {} ({:.2}s, {} Hz)",
        output.display(),
        info.duration_secs,
        info.sample_rate
    );

    Ok(GeneratedAudio {
        path: output.to_path_buf(),
        bytes,
        info,
    })
}
