use clap::Parser;
use gemspeak::{AudioFormat, GeminiConfig, GeminiTts, GenerateRequest, generate};
use gemspeak_form::FormState;
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "speak")]
#[command(version = "0.1")]
#[command(about = "Gemini text-to-speech: a small web form, or one generation from the command line")]
struct Cli {
    #[arg(
        short = 't',
        long = "text",
        value_name = "TEXT",
        help = "Script to speak (or a path to a text file). Generates once and exits instead of serving the form"
    )]
    text: Option<String>,

    #[arg(short = 's', long = "style", value_name = "STYLE")]
    style: Option<String>,

    #[arg(short = 'k', long = "api-key", value_name = "KEY")]
    api_key: Option<String>,

    #[arg(short = 'o', long = "output", value_name = "PATH", default_value = "output.wav")]
    output: PathBuf,

    #[arg(long = "addr", value_name = "ADDR", default_value = "127.0.0.1:8501")]
    addr: SocketAddr,

    #[arg(short = 'm', long = "model", value_name = "MODEL")]
    model: Option<String>,

    #[arg(long = "voice", value_name = "VOICE")]
    voice: Option<String>,

    #[arg(long = "channels", default_value_t = 1)]
    channels: u16,

    #[arg(long = "rate", value_name = "HZ", default_value_t = 24000)]
    rate: u32,

    #[arg(long = "width", value_name = "BYTES", default_value_t = 2)]
    width: u16,
}

fn read_script(text: String) -> std::io::Result<String> {
    let path = Path::new(&text);
    if path.is_file() {
        return std::fs::read_to_string(path);
    }
    Ok(text)
}

async fn generate_once(
    tts: &GeminiTts,
    request: GenerateRequest,
    output: &Path,
    format: AudioFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    pb.set_message("Generating audio...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = generate(tts, &request, output, format).await;
    pb.finish_and_clear();

    match result {
        Ok(audio) => {
            println!(
                "Audio saved to {} ({:.2}s)",
                audio.path.display(),
                audio.info.duration_secs
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let args = Cli::parse();

        let defaults = GeminiConfig::default();
        let tts = GeminiTts::from_config(GeminiConfig {
            model: args.model.unwrap_or(defaults.model),
            voice: args.voice.unwrap_or(defaults.voice),
            ..defaults
        });
        let format = AudioFormat::new(args.channels, args.rate, args.width)?;

        if let Some(text) = args.text {
            let request = GenerateRequest {
                api_key: args.api_key.unwrap_or_default(),
                style: args.style.unwrap_or_default(),
                script: read_script(text)?,
            };
            return generate_once(&tts, request, &args.output, format).await;
        }

        tracing::info!(
            "model={} voice={} output={}",
            tts.config().model,
            tts.config().voice,
            args.output.display()
        );
        let app = gemspeak_form::create_server(FormState::new(tts, args.output).with_format(format));
        println!("Serving the TTS form on http://{}", args.addr);
        gemspeak_form::serve(
            tokio::net::TcpListener::bind(&args.addr).await?,
            app.into_make_service(),
        )
        .await?;
        Ok(())
    })
}
