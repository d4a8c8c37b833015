use std::fs;
use std::io;
use std::path::Path;

/// コンパイル時にバイナリへ埋め込む既定フォント（サンセリフ）。
const DEFAULT_FONT: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");

/// ラベル文字と PDF の両方で使うフォントファイルのバイト列を返します。
///
/// * `Some(path)`: 指定された TTF/OTF ファイルを読み込みます。
/// * `None`: 埋め込みの DejaVu Sans を使います。
pub fn load_font_bytes(font_path: Option<&Path>) -> io::Result<Vec<u8>> {
    match font_path {
        Some(path) => fs::read(path),
        None => Ok(DEFAULT_FONT.to_vec()),
    }
}
