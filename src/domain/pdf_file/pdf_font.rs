// genpdfクレートのfontsモジュールと、エラーハンドリングに必要なError型をインポートします。
use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use std::path::Path;

use crate::domain::font_source::load_font_bytes;

/// 印刷用 PDF で使用するフォントファミリーを管理するためのラッパー構造体。
///
/// ページには画像しか置きませんが、`genpdf::Document` の作成にはフォントが必須です。
#[derive(Debug, Clone)]
pub struct PdfFont(pub FontFamily<FontData>);

impl PdfFont {
    /// 新しい `PdfFont` インスタンスを作成します。
    ///
    /// * `Some(path)`: 指定されたパスからフォントを読み込みます。
    /// * `None`: バイナリに埋め込まれたデフォルトフォント (`DejaVuSans.ttf`) を使用します。
    pub fn new(font_path: Option<&Path>) -> Result<Self, Error> {
        let bytes = load_font_bytes(font_path)
            .map_err(|e| Error::new("フォントファイルを読み込めません", e))?;
        let font_data = FontData::new(bytes, None)?;

        // 全てのスタイルに同じフォントデータを割り当てます。
        let font_family = FontFamily {
            regular: font_data.clone(),
            bold: font_data.clone(),
            italic: font_data.clone(),
            bold_italic: font_data,
        };

        Ok(PdfFont(font_family))
    }

    pub fn get_font_family(&self) -> &FontFamily<FontData> {
        &self.0
    }
}
