//! Runs the vision endpoints against a local image.
//!
//! Run with: `KAKAO_API_KEY=... cargo run --example vision -- path/to/image.jpg`

use kakao_api::api::ImageSource;
use kakao_api::Client;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("kakao_api=info")
        .init();

    let api_key = std::env::var("KAKAO_API_KEY")?;
    let image_path = std::env::args()
        .nth(1)
        .ok_or("usage: vision <image path>")?;

    let client = Client::new(api_key)?;
    let image = ImageSource::from_path(&image_path)?;

    println!("=== Faces ===");
    match client.detect_face(image.clone(), 0.6) {
        Ok(faces) => {
            for face in &faces.result.faces {
                println!(
                    "  at ({:.2}, {:.2}) size {:.2}x{:.2}, age {:.0}, score {:.2}",
                    face.x, face.y, face.w, face.h, face.facial_attributes.age, face.score
                );
            }
        }
        Err(e) => println!("  Failed to detect faces: {}", e),
    }

    println!("=== Products ===");
    match client.detect_product(image.clone(), 0.6) {
        Ok(products) => {
            for product in &products.result.objects {
                println!("  {} at ({:.2}, {:.2})", product.class_name, product.x1, product.y1);
            }
        }
        Err(e) => println!("  Failed to detect products: {}", e),
    }

    println!("=== Thumbnail ===");
    match client.crop_thumbnail(image.clone(), 200, 200) {
        Ok(cropped) => println!("  cropped: {}", cropped.thumbnail_image_url),
        Err(e) => println!("  Failed to crop thumbnail: {}", e),
    }
    match client.suggest_thumbnail(image.clone(), 200, 200) {
        Ok(suggested) => println!("  suggested: {:?}", suggested.result.thumbnail),
        Err(e) => println!("  Failed to suggest thumbnail: {}", e),
    }

    println!("=== Tags ===");
    match client.generate_tags(image.clone()) {
        Ok(tags) => println!("  {}", tags.result.label_kr.join(", ")),
        Err(e) => println!("  Failed to generate tags: {}", e),
    }

    println!("=== Adult content ===");
    match client.detect_nsfw(image) {
        Ok(nsfw) => println!(
            "  normal {:.2}, soft {:.2}, adult {:.2}",
            nsfw.result.normal, nsfw.result.soft, nsfw.result.adult
        ),
        Err(e) => println!("  Failed to detect adult content: {}", e),
    }

    Ok(())
}
