//! Example demonstrating error handling.
//!
//! This example shows how to:
//! - Tell application-level rejections from plain HTTP failures
//! - Access raw response bodies on errors
//! - Deal with decoding failures
//! - Check if errors are worth retrying
//!
//! Run with: `cargo run --example error_handling`

use kakao_api::api::inference::TextGenerationParams;
use kakao_api::api::translation::Language;
use kakao_api::{ApiErrorKind, Client, Endpoints, Error};
use std::time::Duration;

fn describe(error: &Error) {
    match error {
        Error::Api {
            status,
            kind,
            message,
            ..
        } => {
            println!("API Error!");
            println!("  Status: {}", status);
            match kind {
                ApiErrorKind::Code(code) => println!("  Code: {}", code),
                ApiErrorKind::Type(error_type) => println!("  Type: {}", error_type),
            }
            println!("  Message: {}", message);
        }
        Error::HttpStatus { status, raw_body } => {
            println!("HTTP Error!");
            println!("  Status: {}", status);
            println!("  Raw response: {}", String::from_utf8_lossy(raw_body));
        }
        Error::Decoding {
            message, raw_body, ..
        } => {
            println!("Decoding Error!");
            println!("  Error: {}", message);
            println!("  Raw response: {}", String::from_utf8_lossy(raw_body));
        }
        Error::Transport(source) => println!("Transport Error: {}", source),
        Error::Timeout => println!("Timed out"),
        other => println!("Other error: {}", other),
    }
    println!("  Retryable: {}", error.is_retryable());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("kakao_api=info")
        .init();

    println!("=== Example 1: Rejected API key ===");
    let client = Client::new("not-a-real-key")?;
    match client.translate_text("안녕하세요", Language::Korean, Language::English) {
        Ok(translated) => println!("Success: {}", translated.joined()),
        Err(e) => describe(&e),
    }
    println!();

    println!("=== Example 2: Unreachable host ===");
    let client = Client::builder()
        .api_key("not-a-real-key")
        .endpoints(Endpoints::rooted_at("http://127.0.0.1:9"))
        .connect_timeout(Duration::from_secs(1))
        .build()?;
    match client.generate_texts(TextGenerationParams::new("오늘 아침 하늘은", 16)) {
        Ok(generated) => println!("Success: {:?}", generated.generations),
        Err(e) => describe(&e),
    }
    println!();

    println!("=== Example 3: Missing API key ===");
    match Client::new("") {
        Ok(_) => println!("Unexpectedly built a client"),
        Err(e) => describe(&e),
    }

    Ok(())
}
