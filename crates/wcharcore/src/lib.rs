//! Wide Character Core Library
//!
//! 提供 UTF-8 與 32 位元寬字元之間的轉換：
//! - `wchar`: 碼元與碼元序列型別、外部緩衝區建構函式
//! - `codec`: 字串/字元與寬字元的雙向轉換
//! - `charset`: 其他字元集（Big5 等）的轉換環境
//! - `config`: 編解碼設定
//! - `error`: 錯誤型別

pub mod charset;
pub mod codec;
pub mod config;
pub mod error;
pub mod wchar;

pub use charset::Converter;
pub use codec::{decode, decode_scalar, decode_units, encode, encode_bytes, encode_scalar};
pub use config::{CodecConfig, InvalidInputPolicy};
pub use error::{CodecError, ConfigError};
pub use wchar::{Layout, Wchar, WcharString};
