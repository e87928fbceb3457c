//! Flex-tier image inference demo.
//!
//! Reads `images/test1.png`, submits it to Amazon Nova with the `flex`
//! service tier, and prints the full response plus a verification of which
//! tier the service actually applied.

use bedrock_flex::{describe_image, render_report, BedrockClientBuilder, ServiceTier};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const IMAGE_PATH: &str = "images/test1.png";
const PROMPT: &str = "Describe this image in detail.";

#[tokio::main]
async fn main() -> Result<(), bedrock_flex::BedrockError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let client = BedrockClientBuilder::new().from_env().build()?;

    println!("Flex tier image inference");
    println!("Image: {}\n", IMAGE_PATH);

    let report = describe_image(
        &client,
        Path::new(IMAGE_PATH),
        PROMPT,
        ServiceTier::Flex,
    )
    .await?;

    println!("{}", render_report(&report));
    Ok(())
}
