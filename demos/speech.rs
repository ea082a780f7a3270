//! Synthesizes speech, then transcribes a raw PCM recording.
//!
//! Run with: `KAKAO_API_KEY=... cargo run --example speech -- out.mp3 [recording.pcm]`
//!
//! The recording must be mono 16 kHz 16-bit raw PCM.

use kakao_api::api::speech::{Speak, SpeechStyle, Voice, VoiceType};
use kakao_api::{Client, Error};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("kakao_api=info")
        .init();

    let api_key = std::env::var("KAKAO_API_KEY")?;
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "speech.mp3".to_string());

    let client = Client::new(api_key)?;
    client.set_verbose(std::env::var("KAKAO_VERBOSE").is_ok());

    let speak = Speak::new(vec![
        Voice::new("안녕하세요. 반갑습니다.").with_voice_type(VoiceType::WomanDialogBright),
        Voice::new("천천히 말해볼게요.")
            .with_voice_type(VoiceType::ManReadCalm)
            .with_speech_style(SpeechStyle::AltSlow),
    ]);
    println!("SSML: {}", speak.to_xml()?);

    let speech = client.text_to_speech(&speak)?;
    std::fs::write(&output_path, &speech.audio)?;
    println!(
        "Saved {} bytes of {} to {}",
        speech.audio.len(),
        speech.content_type,
        output_path
    );

    if let Some(recording_path) = args.next() {
        let pcm = std::fs::read(recording_path)?;
        match client.speech_to_text(pcm) {
            Ok(recognized) => {
                println!("Recognized: {}", recognized.text);
                for candidate in &recognized.n_best {
                    println!("  {} ({})", candidate.value, candidate.score);
                }
            }
            Err(Error::Recognition { message, .. }) => println!("Recognizer error: {}", message),
            Err(Error::IncompleteRecognition { raw_body }) => {
                println!("No final result in:\n{}", String::from_utf8_lossy(&raw_body));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
