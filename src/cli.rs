use std::io::Write;

use clap::Parser;

use crate::{Layout, VisionClient};

/// Send an image to Cloud Vision text detection and print the result, one value per line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the image file
    pub image_path: String,
}

/// Resolves credentials, runs detection and writes the rendered output to
/// stdout in one piece.
pub async fn execute(args: Args, layout: Layout) -> anyhow::Result<()> {
    let client = VisionClient::from_env().await?;
    let output = crate::run(&client, &args.image_path, layout).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn missing_image_path_is_rejected() {
        for bin in ["vision-text", "vision-document"] {
            let err = Args::try_parse_from([bin]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn takes_a_single_positional_path() {
        let args = Args::try_parse_from(["vision-text", "receipts/レシート.png"]).unwrap();
        assert_eq!(args.image_path, "receipts/レシート.png");

        assert!(Args::try_parse_from(["vision-text", "a.png", "b.png"]).is_err());
    }
}
