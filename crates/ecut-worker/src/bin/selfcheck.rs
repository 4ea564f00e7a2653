use ecut_media::{check_ffmpeg, check_ffprobe, WhisperCliTranscriber};
use ecut_worker::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = WorkerConfig::from_env();

    println!(
        "ecut-selfcheck: starting with data_dir={}",
        config.data_dir.display()
    );

    config
        .ensure_dirs()
        .await
        .map_err(|e| anyhow::anyhow!("cannot create data directories: {}", e))?;

    let ffmpeg = check_ffmpeg()?;
    println!("ecut-selfcheck: ffmpeg at {}", ffmpeg.display());
    let ffprobe = check_ffprobe()?;
    println!("ecut-selfcheck: ffprobe at {}", ffprobe.display());

    let whisper = WhisperCliTranscriber::new(&config.whisper_bin, &config.whisper_model).check()?;
    println!(
        "ecut-selfcheck: whisper at {} (model {})",
        whisper.display(),
        config.whisper_model
    );

    if !config.brand_logo_path.is_file() {
        println!(
            "ecut-selfcheck: no watermark at {}, clips will not be branded",
            config.brand_logo_path.display()
        );
    }

    println!("ecut-selfcheck: ok");
    Ok(())
}
