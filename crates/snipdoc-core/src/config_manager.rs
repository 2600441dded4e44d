//! 설정 파일 관리.

use directories::ProjectDirs;
use parking_lot::RwLock;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::CoreError;

const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "snipdoc";

/// JSON 설정 파일 + 메모리 사본
///
/// 저장은 임시 파일에 쓴 뒤 rename 하므로 중간에 실패해도 기존 파일이 남는다.
/// 검증에 실패한 설정은 메모리에도 파일에도 반영하지 않는다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    current: Arc<RwLock<AppConfig>>,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 설정 디렉토리의 `config.json` 사용 (없으면 기본값으로 생성)
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        let config = match read_config(&config_path)? {
            Some(config) => config,
            None => {
                let defaults = AppConfig::default_config();
                write_config(&config_path, &defaults)?;
                info!("기본 설정 파일 생성: {}", config_path.display());
                defaults
            }
        };

        Ok(Self {
            current: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// 현재 설정 사본
    pub fn get(&self) -> AppConfig {
        self.current.read().clone()
    }

    pub fn update(&self, config: AppConfig) -> Result<(), CoreError> {
        validate(&config)?;
        write_config(&self.config_path, &config)?;
        *self.current.write() = config;
        debug!("설정 저장: {}", self.config_path.display());
        Ok(())
    }

    /// 현재 설정을 고쳐서 저장하고 결과 반환
    pub fn update_with<F>(&self, edit: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.get();
        edit(&mut config);
        self.update(config.clone())?;
        Ok(config)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 파일에서 다시 읽기. 파일이 사라졌으면 `Config` 에러
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = read_config(&self.config_path)?.ok_or_else(|| {
            CoreError::Config(format!("설정 파일 없음: {}", self.config_path.display()))
        })?;
        *self.current.write() = config;
        info!("설정 다시 로드: {}", self.config_path.display());
        Ok(())
    }

    /// 플랫폼별 설정 디렉토리
    ///
    /// - Linux: `~/.config/snipdoc/`
    /// - macOS: `~/Library/Application Support/snipdoc/`
    /// - Windows: `%APPDATA%\snipdoc\config\`
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        ProjectDirs::from("", "", APP_DIR_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CoreError::Config("홈 디렉토리 없음".to_string()))
    }
}

/// 설정값 범위 검사
fn validate(config: &AppConfig) -> Result<(), CoreError> {
    let quality = config.capture.quality;
    if !(0.0..=1.0).contains(&quality) {
        return Err(CoreError::Config(format!(
            "capture.quality는 0.0 ~ 1.0 이어야 함: {quality}"
        )));
    }
    if config.overlay.marker_class.trim().is_empty() {
        return Err(CoreError::Config("overlay.marker_class 비어 있음".to_string()));
    }
    if config.viewer.viewer_container_id.trim().is_empty() {
        return Err(CoreError::Config(
            "viewer.viewer_container_id 비어 있음".to_string(),
        ));
    }
    Ok(())
}

/// 파일이 없으면 `Ok(None)`
fn read_config(path: &Path) -> Result<Option<AppConfig>, CoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CoreError::Config(format!(
                "{} 읽기 실패: {e}",
                path.display()
            )))
        }
    };

    let config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| CoreError::Config(format!("{} 파싱 실패: {e}", path.display())))?;
    validate(&config)?;

    debug!("설정 로드: {}", path.display());
    Ok(Some(config))
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| {
            CoreError::Config(format!("{} 디렉토리 생성 실패: {e}", dir.display()))
        })?;
    }

    let json = serde_json::to_vec_pretty(config)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json)
        .and_then(|_| fs::rename(&staging, path))
        .map_err(|e| CoreError::Config(format!("{} 저장 실패: {e}", path.display())))
}
