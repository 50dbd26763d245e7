use clap::Parser;
use cloud_vision_ocr::{
    Layout,
    cli::{self, Args},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    cli::execute(args, Layout::Document).await
}
