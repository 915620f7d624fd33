//! UTF-8 與寬字元的轉換
//!
//! 每個碼元對應一個 Unicode 純量值，不使用 UTF-16 代理對。
//! 所有函式皆無狀態，可在多執行緒中同時呼叫。

use encoding_rs::UTF_8;
use tracing::{debug, warn};

use crate::config::InvalidInputPolicy;
use crate::error::CodecError;
use crate::wchar::{Wchar, WcharString};

/// 將 UTF-8 字串轉換為 NUL 結尾的碼元序列
///
/// 內容遇到第一個 NUL 字元即截斷，以維持「內容不含 `0`」的保證。
///
/// # Example
/// ```
/// use wcharcore::codec::encode;
///
/// let ws = encode("Iñt");
/// let values: Vec<i32> = ws.as_slice().iter().map(|w| w.value()).collect();
/// assert_eq!(values, vec![73, 241, 116, 0]);
/// ```
pub fn encode(text: &str) -> WcharString {
    let mut content = Vec::with_capacity(text.len());
    for c in text.chars() {
        if c == '\0' {
            debug!("輸入含有 NUL 字元，內容截斷於第 {} 個碼元", content.len());
            break;
        }
        content.push(encode_scalar(c));
    }
    WcharString::from_content(content)
}

/// 將 UTF-8 位元組轉換為 NUL 結尾的碼元序列
///
/// # Arguments
/// * `bytes` - 可能含有無效序列的位元組
/// * `policy` - `Strict` 時回傳 `InvalidEncoding`；`Replace` 時以 U+FFFD 取代無效序列
pub fn encode_bytes(bytes: &[u8], policy: InvalidInputPolicy) -> Result<WcharString, CodecError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(encode(text)),
        Err(e) => match policy {
            InvalidInputPolicy::Strict => Err(CodecError::InvalidEncoding {
                charset: UTF_8.name(),
                valid_up_to: Some(e.valid_up_to()),
            }),
            InvalidInputPolicy::Replace => {
                warn!("無效的 UTF-8 序列（位置 {}），以 U+FFFD 取代", e.valid_up_to());
                let (text, _) = UTF_8.decode_without_bom_handling(bytes);
                Ok(encode(&text))
            }
        },
    }
}

/// 將碼元序列轉換為 UTF-8 字串
///
/// NUL 結尾序列讀到終止符為止，明確長度序列讀完全部碼元。
///
/// # Example
/// ```
/// use wcharcore::codec::{decode, encode};
///
/// let ws = encode("你好");
/// assert_eq!(decode(&ws).unwrap(), "你好");
/// ```
pub fn decode(ws: &WcharString) -> Result<String, CodecError> {
    decode_units(ws.units())
}

/// 將碼元切片轉換為 UTF-8 字串
///
/// 切片視為明確長度，`0` 會解碼為 NUL 字元。
pub fn decode_units(units: &[Wchar]) -> Result<String, CodecError> {
    let mut output = String::with_capacity(units.len());
    for (index, &unit) in units.iter().enumerate() {
        output.push(to_scalar(unit, Some(index))?);
    }
    Ok(output)
}

/// 將單一字元轉換為碼元
///
/// 每個 Unicode 純量值都能以 32 位元碼元表示，因此不會失敗。
pub fn encode_scalar(c: char) -> Wchar {
    if c == '\0' {
        return Wchar::NUL;
    }
    Wchar::new(c as u32 as i32)
}

/// 將單一碼元轉換為字元
///
/// 代理區（U+D800..U+DFFF）、負值或超過 U+10FFFF 的碼元回傳 `InvalidScalar`。
pub fn decode_scalar(unit: Wchar) -> Result<char, CodecError> {
    if unit.is_nul() {
        return Ok('\0');
    }
    to_scalar(unit, None)
}

fn to_scalar(unit: Wchar, index: Option<usize>) -> Result<char, CodecError> {
    u32::try_from(unit.value())
        .ok()
        .and_then(char::from_u32)
        .ok_or(CodecError::InvalidScalar {
            unit: unit.value(),
            index,
        })
}
