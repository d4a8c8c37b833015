use crate::domain::render_config::RenderMode;

/// サニタイズ後のファイル名本体の最大文字数。
pub const MAX_SANITIZED_CHARS: usize = 20;

/// バッチ処理で生成された1件分の画像。生成後は変更されません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedItem {
    index: usize,
    source_text: String,
    file_name: String,
    image_data: Vec<u8>,
}

impl GeneratedItem {
    /// `index` は入力行の1始まりの位置。ファイル名はモードと元テキストから組み立てます。
    pub fn new(index: usize, source_text: &str, mode: RenderMode, image_data: Vec<u8>) -> Self {
        Self {
            index,
            source_text: source_text.to_string(),
            file_name: item_file_name(mode, index, source_text),
            image_data,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
    /// PNG エンコード済みのバイト列。
    pub fn image_data(&self) -> &[u8] {
        &self.image_data
    }
}

/// 英数字以外の文字をすべて `_` に置き換え、先頭20文字に切り詰めます。
pub fn sanitize_file_name(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_SANITIZED_CHARS)
        .collect()
}

/// `{prefix}_{index}_{sanitized}.png` 形式のファイル名。
pub fn item_file_name(mode: RenderMode, index: usize, text: &str) -> String {
    format!(
        "{}_{}_{}.png",
        mode.file_prefix(),
        index,
        sanitize_file_name(text)
    )
}
