//! # snipdoc-app
//!
//! snipdoc CLI 진입점.
//! 설정 로드, 로깅 초기화, 크롭/인코딩 명령, 오버레이 데모 실행.

mod demo;
mod image_io;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use snipdoc_core::config::AppConfig;
use snipdoc_core::config_manager::ConfigManager;
use snipdoc_core::models::geometry::PixelRect;
use snipdoc_core::models::image::ImageMimeType;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 문서 뷰어 선택 영역 캡처 도구
#[derive(Parser, Debug)]
#[command(name = "snipdoc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 이미지 파일에서 영역을 잘라 인코딩
    Crop(CropArgs),
    /// 이미지 파일을 그대로 data URL로 변환
    DataUrl {
        /// 입력 이미지 (png/jpeg/webp)
        #[arg(long, short = 'i')]
        input: PathBuf,
    },
    /// 인메모리 문서로 오버레이 생명주기와 캡처 흐름 시연
    Demo,
}

#[derive(ClapArgs, Debug)]
struct CropArgs {
    /// 입력 이미지
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// 크롭 영역 `L,T,W,H` (디바이스 픽셀)
    #[arg(long, short = 'r')]
    rect: PixelRect,

    /// 출력 파일 (생략 시 data URL 출력)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// 출력 포맷 (png, jpeg, webp; 기본: 설정값)
    #[arg(long, short = 'f')]
    format: Option<ImageMimeType>,

    /// 품질 0.0 ~ 1.0 (기본: 설정값)
    #[arg(long, short = 'q')]
    quality: Option<f32>,
}

/// 설정 로드
///
/// `--config`가 있으면 그 경로, 없으면 플랫폼 기본 경로.
/// 설정 관리자 생성에 실패하면 기본 설정으로 계속 진행한다.
fn load_config(path: Option<PathBuf>) -> AppConfig {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };

    match manager {
        Ok(manager) => {
            info!("설정 파일: {:?}", manager.config_path());
            manager.get()
        }
        Err(e) => {
            warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
            AppConfig::default_config()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "snipdoc={},snipdoc_app={},snipdoc_core={},snipdoc_vision={},snipdoc_overlay={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(args.config);

    match args.command {
        Command::Crop(crop) => {
            let opts = image_io::resolve_options(&config, crop.format, crop.quality);
            let encoded = image_io::crop_file(&crop.input, crop.rect, opts)
                .await
                .with_context(|| format!("크롭 실패: {}", crop.input.display()))?;

            match crop.output {
                Some(output) => {
                    image_io::write_encoded(&output, &encoded).await?;
                    info!(
                        "저장 완료: {} ({}x{}, {} bytes)",
                        output.display(),
                        encoded.width,
                        encoded.height,
                        encoded.data.len()
                    );
                }
                None => println!("{}", encoded.to_data_url()),
            }
        }
        Command::DataUrl { input } => {
            let url = image_io::file_data_url(&input)
                .await
                .with_context(|| format!("data URL 변환 실패: {}", input.display()))?;
            println!("{url}");
        }
        Command::Demo => demo::run(&config).await?,
    }

    Ok(())
}
