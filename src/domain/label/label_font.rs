use ab_glyph::{Font, FontArc};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::domain::font_source::load_font_bytes;

#[derive(Debug, Error)]
pub enum LabelFontError {
    #[error("フォントファイルを読み込めません: {0}")]
    Io(#[from] std::io::Error),

    #[error("フォントデータとして解釈できません")]
    InvalidFont,
}

/// ラベル文字の描画に使う `ab_glyph` フォントのラッパー。
///
/// ファイルから読み込んだフォントも保持できるよう、所有型の `FontArc` を使います。
#[derive(Clone)]
pub struct LabelFont(FontArc);

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFont")
            .field("glyph_count", &self.0.glyph_count())
            .finish()
    }
}

impl LabelFont {
    /// フォントファイルのパスから読み込みます。`None` なら埋め込みフォントを使います。
    pub fn new(font_path: Option<&Path>) -> Result<Self, LabelFontError> {
        Self::from_bytes(load_font_bytes(font_path)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, LabelFontError> {
        FontArc::try_from_vec(bytes)
            .map(LabelFont)
            .map_err(|_| LabelFontError::InvalidFont)
    }

    pub fn font(&self) -> &FontArc {
        &self.0
    }
}
