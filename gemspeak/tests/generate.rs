use std::sync::Mutex;

use gemspeak::utils::wav::HEADER_LEN;
use gemspeak::{AudioFormat, GenerateError, GenerateRequest, InputError, OperationalError, SpeechSynth, generate};

/// Records every call and answers with a canned result.
struct FakeSynth {
    reply: Result<Vec<u8>, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeSynth {
    fn ok(pcm: &[u8]) -> Self {
        Self {
            reply: Ok(pcm.to_vec()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl SpeechSynth for FakeSynth {
    async fn synthesize(&self, api_key: &str, prompt: &str) -> Result<Vec<u8>, OperationalError> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), prompt.to_string()));
        match &self.reply {
            Ok(pcm) => Ok(pcm.clone()),
            Err(message) => Err(OperationalError::Api {
                status: 503,
                message: message.clone(),
            }),
        }
    }
}

fn request(api_key: &str, style: &str, script: &str) -> GenerateRequest {
    GenerateRequest {
        api_key: api_key.into(),
        style: style.into(),
        script: script.into(),
    }
}

#[tokio::test]
async fn writes_and_reads_back_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::ok(&[0x00, 0x01, 0x00, 0x02]);

    let audio = generate(
        &synth,
        &request("key", "Calm and friendly tone", "Hello there."),
        &output,
        AudioFormat::default(),
    )
    .await
    .unwrap();

    assert_eq!(audio.path, output);
    assert_eq!(audio.bytes, std::fs::read(&output).unwrap());
    assert_eq!(&audio.bytes[HEADER_LEN..], &[0x00, 0x01, 0x00, 0x02]);
    assert_eq!(audio.info.channels, 1);
    assert_eq!(audio.info.sample_rate, 24000);
    assert_eq!(audio.info.bits_per_sample, 16);
    assert_eq!(audio.info.frames, 2);

    let calls = synth.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![(
            "key".to_string(),
            "Calm and friendly tone: Hello there.".to_string()
        )]
    );
}

#[tokio::test]
async fn creates_the_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out/today/output.wav");
    let synth = FakeSynth::ok(&[]);

    let audio = generate(&synth, &request("k", "s", "t"), &output, AudioFormat::default())
        .await
        .unwrap();

    assert!(output.is_file());
    assert_eq!(audio.bytes.len(), HEADER_LEN);
    assert_eq!(audio.info.frames, 0);
}

#[tokio::test]
async fn missing_key_never_calls_the_api() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::ok(&[0, 0]);

    let err = generate(&synth, &request("", "calm", "hi"), &output, AudioFormat::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::Input(InputError::MissingApiKey)));
    assert_eq!(synth.call_count(), 0);
    assert!(!output.exists());
}

#[tokio::test]
async fn missing_script_never_calls_the_api() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::ok(&[0, 0]);

    let err = generate(&synth, &request("k", "calm", ""), &output, AudioFormat::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerateError::Input(InputError::MissingStyleOrScript)
    ));
    assert_eq!(synth.call_count(), 0);
}

#[tokio::test]
async fn api_failure_leaves_previous_output_alone() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    std::fs::write(&output, b"previous run").unwrap();
    let synth = FakeSynth::failing("model overloaded");

    let err = generate(&synth, &request("k", "calm", "hi"), &output, AudioFormat::default())
        .await
        .unwrap_err();

    assert!(!err.is_input());
    assert!(err.to_string().contains("model overloaded"));
    assert_eq!(synth.call_count(), 1);
    assert_eq!(std::fs::read(&output).unwrap(), b"previous run");
}

#[tokio::test]
async fn api_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::failing("boom");

    generate(&synth, &request("k", "calm", "hi"), &output, AudioFormat::default())
        .await
        .unwrap_err();

    assert!(!output.exists());
}

#[tokio::test]
async fn format_override_reaches_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::ok(&[0u8; 16]);
    let format = AudioFormat::new(2, 16000, 2).unwrap();

    let audio = generate(&synth, &request("k", "s", "t"), &output, format)
        .await
        .unwrap();

    assert_eq!(audio.info.channels, 2);
    assert_eq!(audio.info.sample_rate, 16000);
    assert_eq!(audio.info.frames, 4);
}

#[tokio::test]
async fn partial_trailing_frame_is_written_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::ok(&[0x10, 0x00, 0x20]);

    let audio = generate(&synth, &request("k", "s", "t"), &output, AudioFormat::default())
        .await
        .unwrap();

    assert_eq!(&audio.bytes[40..44], &3u32.to_le_bytes());
    assert_eq!(&audio.bytes[HEADER_LEN..], &[0x10, 0x00, 0x20]);
    assert_eq!(audio.info.frames, 1);
}

#[tokio::test]
async fn style_and_script_are_sent_as_typed() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::ok(&[0, 0]);

    generate(
        &synth,
        &request("key", "Calm ", "\n  Line one\n  Line two\n"),
        &output,
        AudioFormat::default(),
    )
    .await
    .unwrap();

    let calls = synth.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "Calm : \n  Line one\n  Line two\n");
}

#[tokio::test]
async fn whitespace_only_style_still_reaches_the_api() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::ok(&[0, 0]);

    generate(&synth, &request("k", " ", "hi"), &output, AudioFormat::default())
        .await
        .unwrap();

    assert_eq!(synth.call_count(), 1);
    assert_eq!(synth.calls.lock().unwrap()[0].1, " : hi");
}

#[tokio::test]
async fn width_the_reader_cannot_decode_is_described_from_the_format() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let synth = FakeSynth::ok(&[0u8; 15]);
    let format = AudioFormat::new(1, 8000, 5).unwrap();

    let audio = generate(&synth, &request("k", "s", "t"), &output, format)
        .await
        .unwrap();

    assert_eq!(audio.bytes.len(), HEADER_LEN + 15);
    assert_eq!(audio.info.channels, 1);
    assert_eq!(audio.info.sample_rate, 8000);
    assert_eq!(audio.info.bits_per_sample, 40);
    assert_eq!(audio.info.frames, 3);
}
