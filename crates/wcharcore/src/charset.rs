//! 字元集轉換環境
//!
//! 在其他字元集（Big5、windows-1252、US-ASCII 等）與寬字元序列之間轉換。
//! 字元集名稱依照 WHATWG Encoding Standard 的標籤解析；`ascii` / `us-ascii`
//! 例外，對應真正的 7 位元 ASCII 而非 windows-1252。

use encoding_rs::{EncoderResult, Encoding, UTF_8};
use tracing::{debug, warn};

use crate::codec;
use crate::config::InvalidInputPolicy;
use crate::error::CodecError;
use crate::wchar::WcharString;

const ASCII_NAME: &str = "US-ASCII";
const ASCII_LABELS: [&str; 2] = ["ascii", "us-ascii"];

/// 轉換環境使用的字元集
#[derive(Debug, Clone, Copy)]
enum Charset {
    /// 7 位元 ASCII
    Ascii,
    /// 輸入與輸出編碼相同的 WHATWG 字元集
    Whatwg(&'static Encoding),
}

/// 某個字元集與寬字元之間的轉換環境
///
/// 不持有任何外部資源，可自由複製並在多執行緒間共用。
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    charset: Charset,
    policy: InvalidInputPolicy,
}

impl Converter {
    /// 依字元集標籤開啟轉換環境
    ///
    /// 輸出編碼與輸入編碼不同的字元集（UTF-16LE、UTF-16BE）無法雙向轉換，
    /// 回傳 `ConversionUnavailable`。
    ///
    /// # Arguments
    /// * `label` - 字元集標籤，例如 `utf-8`、`big5`、`latin1`、`ascii`
    ///
    /// # Example
    /// ```
    /// use wcharcore::charset::Converter;
    ///
    /// let converter = Converter::open("big5").unwrap();
    /// let ws = converter.to_wide(&[0xa7, 0x41, 0xa6, 0x6e]).unwrap(); // "你好" in Big5
    /// assert_eq!(ws.to_utf8().unwrap(), "你好");
    /// ```
    pub fn open(label: &str) -> Result<Self, CodecError> {
        let trimmed = label.trim_matches(|c: char| c.is_ascii_whitespace());
        if ASCII_LABELS
            .iter()
            .any(|ascii| trimmed.eq_ignore_ascii_case(ascii))
        {
            debug!("已開啟轉換環境: {} <-> wchar", ASCII_NAME);
            return Ok(Self {
                charset: Charset::Ascii,
                policy: InvalidInputPolicy::default(),
            });
        }

        let encoding = Encoding::for_label_no_replacement(label.as_bytes())
            .ok_or_else(|| CodecError::ConversionUnavailable(label.to_string()))?;
        if encoding.output_encoding() != encoding {
            warn!(
                "{} 的輸出編碼為 {}，無法雙向轉換",
                encoding.name(),
                encoding.output_encoding().name()
            );
            return Err(CodecError::ConversionUnavailable(label.to_string()));
        }

        debug!("已開啟轉換環境: {} <-> wchar", encoding.name());
        Ok(Self {
            charset: Charset::Whatwg(encoding),
            policy: InvalidInputPolicy::default(),
        })
    }

    /// UTF-8 轉換環境
    pub fn utf8() -> Self {
        Self {
            charset: Charset::Whatwg(UTF_8),
            policy: InvalidInputPolicy::default(),
        }
    }

    /// 設定無效輸入的處理方式
    pub fn with_policy(mut self, policy: InvalidInputPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 字元集的標準名稱
    pub fn charset(&self) -> &'static str {
        match self.charset {
            Charset::Ascii => ASCII_NAME,
            Charset::Whatwg(encoding) => encoding.name(),
        }
    }

    pub fn policy(&self) -> InvalidInputPolicy {
        self.policy
    }

    /// 將字元集位元組轉換為 NUL 結尾的碼元序列
    pub fn to_wide(&self, bytes: &[u8]) -> Result<WcharString, CodecError> {
        let encoding = match self.charset {
            Charset::Ascii => return self.ascii_to_wide(bytes),
            Charset::Whatwg(encoding) => encoding,
        };

        if encoding == UTF_8 {
            return codec::encode_bytes(bytes, self.policy);
        }

        let text = match self.policy {
            InvalidInputPolicy::Strict => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or(CodecError::InvalidEncoding {
                    charset: encoding.name(),
                    valid_up_to: None,
                })?,
            InvalidInputPolicy::Replace => {
                let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
                if had_errors {
                    warn!("無效的 {} 序列，以 U+FFFD 取代", encoding.name());
                }
                text
            }
        };

        Ok(codec::encode(&text))
    }

    /// 將碼元序列轉換為字元集位元組
    pub fn from_wide(&self, ws: &WcharString) -> Result<Vec<u8>, CodecError> {
        let text = codec::decode(ws)?;
        let encoding = match self.charset {
            Charset::Ascii => return self.ascii_from_wide(&text),
            Charset::Whatwg(encoding) => encoding,
        };

        match self.policy {
            InvalidInputPolicy::Strict => encode_strict(encoding, &text),
            InvalidInputPolicy::Replace => {
                let (bytes, _, had_unmappable) = encoding.encode(&text);
                if had_unmappable {
                    warn!("部分字元無法以 {} 表示，已改用數值字元參照", encoding.name());
                }
                Ok(bytes.into_owned())
            }
        }
    }

    fn ascii_to_wide(&self, bytes: &[u8]) -> Result<WcharString, CodecError> {
        let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) else {
            let text: String = bytes.iter().map(|&b| char::from(b)).collect();
            return Ok(codec::encode(&text));
        };

        match self.policy {
            InvalidInputPolicy::Strict => Err(CodecError::InvalidEncoding {
                charset: ASCII_NAME,
                valid_up_to: Some(pos),
            }),
            InvalidInputPolicy::Replace => {
                warn!("無效的 {} 位元組（位置 {}），以 U+FFFD 取代", ASCII_NAME, pos);
                let text: String = bytes
                    .iter()
                    .map(|&b| {
                        if b.is_ascii() {
                            char::from(b)
                        } else {
                            char::REPLACEMENT_CHARACTER
                        }
                    })
                    .collect();
                Ok(codec::encode(&text))
            }
        }
    }

    fn ascii_from_wide(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        let mut output = Vec::with_capacity(text.len());
        for c in text.chars() {
            if c.is_ascii() {
                output.push(c as u8);
                continue;
            }
            match self.policy {
                InvalidInputPolicy::Strict => {
                    return Err(CodecError::Unmappable {
                        scalar: c,
                        charset: ASCII_NAME,
                    });
                }
                InvalidInputPolicy::Replace => output.push(b'?'),
            }
        }
        Ok(output)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::utf8()
    }
}

/// 不做任何取代的編碼，遇到無法表示的字元即失敗
fn encode_strict(encoding: &'static Encoding, text: &str) -> Result<Vec<u8>, CodecError> {
    if encoding == UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }

    let mut encoder = encoding.new_encoder();
    let mut output = Vec::with_capacity(text.len());
    let mut remaining = text;

    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(remaining, &mut output, true);
        remaining = &remaining[read..];

        match result {
            EncoderResult::InputEmpty => return Ok(output),
            EncoderResult::OutputFull => {
                let needed = encoder
                    .max_buffer_length_from_utf8_without_replacement(remaining.len())
                    .unwrap_or(remaining.len() * 4 + 16);
                output.reserve(needed);
            }
            EncoderResult::Unmappable(scalar) => {
                return Err(CodecError::Unmappable {
                    scalar,
                    charset: encoding.name(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "你好" in Big5
    const BIG5_NIHAO: [u8; 4] = [0xa7, 0x41, 0xa6, 0x6e];

    #[test]
    fn test_open_unknown_label() {
        let err = Converter::open("not-a-charset").unwrap_err();
        assert_eq!(
            err,
            CodecError::ConversionUnavailable("not-a-charset".to_string())
        );
    }

    #[test]
    fn test_open_resolves_aliases() {
        assert_eq!(Converter::open("UTF8").unwrap().charset(), "UTF-8");
        assert_eq!(Converter::open("latin1").unwrap().charset(), "windows-1252");
        assert_eq!(Converter::open(" big5 ").unwrap().charset(), "Big5");
    }

    #[test]
    fn test_open_rejects_utf16() {
        for label in ["utf-16le", "utf-16be", "utf-16"] {
            assert_eq!(
                Converter::open(label).unwrap_err(),
                CodecError::ConversionUnavailable(label.to_string())
            );
        }
    }

    #[test]
    fn test_open_ascii_labels() {
        assert_eq!(Converter::open("ascii").unwrap().charset(), "US-ASCII");
        assert_eq!(Converter::open(" US-ASCII ").unwrap().charset(), "US-ASCII");
    }

    #[test]
    fn test_ascii_roundtrip() {
        let converter = Converter::open("ascii").unwrap();
        let ws = converter.to_wide(b"Hello").unwrap();
        assert_eq!(ws.to_utf8().unwrap(), "Hello");
        assert_eq!(converter.from_wide(&ws).unwrap(), b"Hello".to_vec());
    }

    #[test]
    fn test_ascii_strict_unmappable() {
        let converter = Converter::open("ascii").unwrap();
        let err = converter.from_wide(&WcharString::from("aé")).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unmappable {
                scalar: 'é',
                charset: "US-ASCII"
            }
        );
    }

    #[test]
    fn test_ascii_replace_unmappable() {
        let converter = Converter::open("ascii")
            .unwrap()
            .with_policy(InvalidInputPolicy::Replace);
        let bytes = converter.from_wide(&WcharString::from("aé😀b")).unwrap();
        assert_eq!(bytes, b"a??b".to_vec());
    }

    #[test]
    fn test_ascii_strict_rejects_high_bytes() {
        let converter = Converter::open("ascii").unwrap();
        let err = converter.to_wide(&[b'a', b'b', 0xE9]).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidEncoding {
                charset: "US-ASCII",
                valid_up_to: Some(2)
            }
        );
    }

    #[test]
    fn test_ascii_replace_high_bytes() {
        let converter = Converter::open("ascii")
            .unwrap()
            .with_policy(InvalidInputPolicy::Replace);
        let ws = converter.to_wide(&[b'a', 0xE9, b'c']).unwrap();
        assert_eq!(ws.to_utf8().unwrap(), "a\u{FFFD}c");
    }

    #[test]
    fn test_big5_to_wide() {
        let converter = Converter::open("big5").unwrap();
        let ws = converter.to_wide(&BIG5_NIHAO).unwrap();
        let values: Vec<i32> = ws.as_slice().iter().map(|w| w.value()).collect();
        assert_eq!(values, vec![0x4F60, 0x597D, 0]);
    }

    #[test]
    fn test_big5_mixed() {
        let converter = Converter::open("big5").unwrap();
        let mixed: Vec<u8> = [b"Hi".as_slice(), &BIG5_NIHAO].concat();
        let ws = converter.to_wide(&mixed).unwrap();
        assert_eq!(ws.to_utf8().unwrap(), "Hi你好");
    }

    #[test]
    fn test_big5_from_wide() {
        let converter = Converter::open("big5").unwrap();
        let ws = WcharString::from("你好");
        assert_eq!(converter.from_wide(&ws).unwrap(), BIG5_NIHAO.to_vec());
    }

    #[test]
    fn test_big5_roundtrip() {
        let converter = Converter::open("big5").unwrap();
        let original = WcharString::from("測試MUD客戶端");
        let bytes = converter.from_wide(&original).unwrap();
        assert_eq!(converter.to_wide(&bytes).unwrap(), original);
    }

    #[test]
    fn test_strict_rejects_invalid_bytes() {
        let converter = Converter::open("big5").unwrap();
        let err = converter.to_wide(&[0x41, 0xFF]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEncoding {
                charset: "Big5",
                ..
            }
        ));
    }

    #[test]
    fn test_replace_invalid_bytes() {
        let converter = Converter::open("big5")
            .unwrap()
            .with_policy(InvalidInputPolicy::Replace);
        let ws = converter.to_wide(&[0x41, 0xFF]).unwrap();
        assert_eq!(ws.to_utf8().unwrap(), "A\u{FFFD}");
    }

    #[test]
    fn test_strict_unmappable() {
        let converter = Converter::open("latin1").unwrap();
        let err = converter.from_wide(&WcharString::from("é😀")).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unmappable {
                scalar: '😀',
                charset: "windows-1252"
            }
        );
    }

    #[test]
    fn test_replace_unmappable() {
        let converter = Converter::open("latin1")
            .unwrap()
            .with_policy(InvalidInputPolicy::Replace);
        let bytes = converter.from_wide(&WcharString::from("é😀")).unwrap();
        assert_eq!(bytes, b"\xE9&#128512;".to_vec());
    }

    #[test]
    fn test_utf8_converter() {
        let converter = Converter::default();
        let ws = converter.to_wide("Iñt".as_bytes()).unwrap();
        assert_eq!(converter.from_wide(&ws).unwrap(), "Iñt".as_bytes().to_vec());
    }

    #[test]
    fn test_from_wide_invalid_scalar() {
        let converter = Converter::utf8();
        let ws = WcharString::from_units(vec![crate::Wchar::new(0xD800)]);
        assert!(matches!(
            converter.from_wide(&ws),
            Err(CodecError::InvalidScalar { .. })
        ));
    }
}
