//! 編解碼設定
//!
//! 以 JSON 檔案保存字元集與無效輸入的處理方式

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::charset::Converter;
use crate::error::{CodecError, ConfigError};

/// 遇到無效輸入時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidInputPolicy {
    /// 回傳錯誤
    #[default]
    Strict,
    /// 以替代字元取代（解碼用 U+FFFD，編碼用數值字元參照）
    Replace,
}

/// 編解碼設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// 字元集名稱（WHATWG 標籤，例如 `utf-8`、`big5`）
    #[serde(default = "default_charset")]
    pub charset: String,
    /// 無效輸入的處理方式
    #[serde(default)]
    pub invalid_input: InvalidInputPolicy,
}

fn default_charset() -> String {
    "utf-8".to_string()
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            invalid_input: InvalidInputPolicy::default(),
        }
    }
}

impl CodecConfig {
    /// 從 JSON 字串解析設定，缺少的欄位使用預設值
    ///
    /// # Example
    /// ```
    /// use wcharcore::{CodecConfig, InvalidInputPolicy};
    ///
    /// let config = CodecConfig::from_json(r#"{ "invalid_input": "replace" }"#).unwrap();
    /// assert_eq!(config.charset, "utf-8");
    /// assert_eq!(config.invalid_input, InvalidInputPolicy::Replace);
    /// ```
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// 從檔案載入設定，檔案不存在時使用預設值
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("設定檔不存在，使用預設設定: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        debug!("已載入設定: {}", path.display());
        Ok(config)
    }

    /// 儲存設定到檔案
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // 確保目錄存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 依照設定開啟轉換環境
    pub fn open_converter(&self) -> Result<Converter, CodecError> {
        Converter::open(&self.charset).map(|c| c.with_policy(self.invalid_input))
    }
}
