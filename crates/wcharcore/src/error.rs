//! 錯誤型別
//!
//! 編解碼與設定載入的錯誤

use std::io;
use thiserror::Error;

/// 編解碼錯誤
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// 來源位元組不是合法的字元集序列（編碼方向）
    #[error("無效的 {charset} 位元組序列（合法長度: {valid_up_to:?}）")]
    InvalidEncoding {
        charset: &'static str,
        /// 第一個無效位元組之前的合法長度，無法得知時為 `None`
        valid_up_to: Option<usize>,
    },

    /// 碼元不是合法的 Unicode 純量值（解碼方向）
    #[error("無效的碼元 {unit:#x}（位置: {index:?}）")]
    InvalidScalar {
        unit: i32,
        /// 碼元在序列中的位置，單一碼元轉換時為 `None`
        index: Option<usize>,
    },

    /// 無法開啟轉換環境（未知的字元集名稱）
    #[error("無法開啟轉換環境: {0}")]
    ConversionUnavailable(String),

    /// 字元無法以目標字元集表示
    #[error("字元 {scalar:?} 無法以 {charset} 表示")]
    Unmappable {
        scalar: char,
        charset: &'static str,
    },
}

/// 設定載入錯誤
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO 錯誤: {0}")]
    Io(#[from] io::Error),

    #[error("JSON 格式錯誤: {0}")]
    Json(#[from] serde_json::Error),
}
