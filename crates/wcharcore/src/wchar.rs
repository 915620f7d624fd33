//! 寬字元型別
//!
//! - `Wchar`: 單一 32 位元碼元（一個 Unicode 純量值）
//! - `WcharString`: 碼元序列，分為以 NUL 結尾與明確長度兩種形式
//!
//! 從外部記憶體建立序列的 `unsafe` 建構函式只存在於本模組。

use std::fmt;
use std::slice;

use tracing::trace;

use crate::codec;
use crate::error::CodecError;

/// 32 位元碼元
///
/// 數值等於其代表的 Unicode 純量值，`0` 保留為終止符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Wchar(i32);

impl Wchar {
    /// 終止符
    pub const NUL: Wchar = Wchar(0);

    /// 以原始數值建立碼元（不檢查是否為合法純量值）
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// 原始數值
    pub const fn value(self) -> i32 {
        self.0
    }

    /// 是否為終止符
    pub const fn is_nul(self) -> bool {
        self.0 == 0
    }

    /// 轉換為 Unicode 純量值
    pub fn to_char(self) -> Result<char, CodecError> {
        codec::decode_scalar(self)
    }
}

impl From<char> for Wchar {
    fn from(c: char) -> Self {
        codec::encode_scalar(c)
    }
}

impl From<i32> for Wchar {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Wchar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 序列形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// 以第一個 `0` 碼元結尾，終止符不屬於內容
    NulTerminated,
    /// 長度由序列本身決定，不附加也不搜尋終止符
    LengthDelimited,
}

/// 碼元序列
///
/// `NulTerminated` 形式保證內容中沒有 `0`，且最後恰好有一個終止符。
/// 序列建立後內容不可變。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WcharString {
    units: Vec<Wchar>,
    layout: Layout,
}

impl WcharString {
    /// 建立空的 NUL 結尾序列（僅含終止符）
    pub fn new() -> Self {
        Self {
            units: vec![Wchar::NUL],
            layout: Layout::NulTerminated,
        }
    }

    /// 由不含 `0` 的內容建立 NUL 結尾序列
    pub(crate) fn from_content(mut content: Vec<Wchar>) -> Self {
        debug_assert!(!content.iter().any(|w| w.is_nul()));
        content.push(Wchar::NUL);
        Self {
            units: content,
            layout: Layout::NulTerminated,
        }
    }

    /// 建立明確長度的序列，內容原樣保留（包含任何 `0`）
    pub fn from_units(units: Vec<Wchar>) -> Self {
        Self {
            units,
            layout: Layout::LengthDelimited,
        }
    }

    /// 建立 NUL 結尾序列，內容截斷於第一個 `0`
    ///
    /// # Example
    /// ```
    /// use wcharcore::{Wchar, WcharString};
    ///
    /// let units = vec![Wchar::new(72), Wchar::new(105), Wchar::NUL, Wchar::new(33)];
    /// let ws = WcharString::from_units_with_nul(units);
    /// assert_eq!(ws.as_slice(), &[Wchar::new(72), Wchar::new(105), Wchar::NUL]);
    /// ```
    pub fn from_units_with_nul(mut units: Vec<Wchar>) -> Self {
        if let Some(pos) = units.iter().position(|w| w.is_nul()) {
            units.truncate(pos);
        }
        Self::from_content(units)
    }

    /// 從 NUL 結尾的外部緩衝區建立序列
    ///
    /// 每次前進一個碼元（4 位元組），在第一個 `0` 停止，終止符不計入內容。
    /// 空指標會得到空序列，且不會被解參考。
    ///
    /// # Safety
    ///
    /// `ptr` 非空時，呼叫端必須保證：
    /// - `ptr` 對齊 `Wchar`，且從 `ptr` 到第一個 `0` 碼元（含）之間的記憶體皆可讀
    /// - 呼叫期間該記憶體不會被修改或釋放
    ///
    /// 缺少終止符時本函式會讀出緩衝區之外。
    pub unsafe fn from_ptr(ptr: *const Wchar) -> Self {
        if ptr.is_null() {
            return Self::new();
        }

        let mut content = Vec::new();
        let mut cursor = ptr;
        loop {
            let unit = cursor.read();
            if unit.is_nul() {
                break;
            }
            content.push(unit);
            cursor = cursor.add(1);
        }

        trace!("從外部緩衝區讀取 {} 個碼元", content.len());
        Self::from_content(content)
    }

    /// 從外部緩衝區讀取恰好 `len` 個碼元，建立明確長度的序列
    ///
    /// 不搜尋終止符；內容中的 `0` 會原樣保留。空指標會得到空序列。
    ///
    /// # Safety
    ///
    /// `ptr` 非空時，呼叫端必須保證 `ptr` 對齊 `Wchar`、至少有 `len` 個碼元可讀，
    /// 且呼叫期間該記憶體不會被修改或釋放。
    pub unsafe fn from_ptr_len(ptr: *const Wchar, len: usize) -> Self {
        if ptr.is_null() || len == 0 {
            return Self::from_units(Vec::new());
        }

        let units = slice::from_raw_parts(ptr, len).to_vec();
        trace!("從外部緩衝區複製 {} 個碼元", len);
        Self::from_units(units)
    }

    /// 序列形式
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// 是否為 NUL 結尾形式
    pub fn is_nul_terminated(&self) -> bool {
        self.layout == Layout::NulTerminated
    }

    /// 內容碼元（不含終止符）
    pub fn units(&self) -> &[Wchar] {
        match self.layout {
            Layout::NulTerminated => &self.units[..self.units.len() - 1],
            Layout::LengthDelimited => &self.units,
        }
    }

    /// 全部碼元（NUL 結尾形式包含終止符）
    pub fn as_slice(&self) -> &[Wchar] {
        &self.units
    }

    /// 內容碼元數量
    pub fn content_len(&self) -> usize {
        self.units().len()
    }

    /// 內容是否為空
    pub fn is_empty(&self) -> bool {
        self.units().is_empty()
    }

    /// 第一個碼元的位址，供需要連續碼元緩衝區的外部程式使用
    ///
    /// 回傳的指標不可在序列釋放後繼續使用。
    pub fn as_ptr(&self) -> *const Wchar {
        self.units.as_ptr()
    }

    /// 逐一走訪內容碼元
    pub fn iter(&self) -> slice::Iter<'_, Wchar> {
        self.units().iter()
    }

    /// 解碼為 UTF-8 字串
    pub fn to_utf8(&self) -> Result<String, CodecError> {
        codec::decode(self)
    }
}

impl Default for WcharString {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for WcharString {
    fn from(text: &str) -> Self {
        codec::encode(text)
    }
}

impl TryFrom<&WcharString> for String {
    type Error = CodecError;

    fn try_from(ws: &WcharString) -> Result<Self, Self::Error> {
        codec::decode(ws)
    }
}

impl<'a> IntoIterator for &'a WcharString {
    type Item = &'a Wchar;
    type IntoIter = slice::Iter<'a, Wchar>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
