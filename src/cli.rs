use clap::Parser;
use qr_label_batch::domain::render_config::{ForegroundColor, RenderMode};
use std::path::PathBuf;

/// 選択できる QR コードの一辺のピクセル数。
pub const SUPPORTED_SIZES: [u32; 5] = [100, 150, 200, 250, 300];

/// テキストの各行を QR コード画像（またはラベル画像）に一括変換するツール
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 1行に1件ずつ内容を書いたテキストファイルのパス (省略時または `-` は標準入力)
    pub input: Option<PathBuf>,

    /// QRコードの一辺のピクセル数 (100, 150, 200, 250, 300)
    #[arg(short, long, default_value_t = 200, value_parser = parse_pixel_size)]
    pub size: u32,

    /// QRコードと文字の色 (#RRGGBB または #RGB)
    #[arg(short, long, default_value = "#000000")]
    pub color: ForegroundColor,

    /// 生成モード: QRコードのみ (plain) か、QRコード＋テキストのラベル (label)
    #[arg(short, long, value_enum, default_value_t = RenderMode::Plain)]
    pub mode: RenderMode,

    /// 画像の出力先フォルダのパス (オプション: デフォルトはカレントディレクトリ)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 個別の画像ファイルではなく、1つのZIPファイルにまとめて出力する
    #[arg(short, long)]
    pub zip: bool,

    /// 1ページに1枚ずつ並べた印刷用PDFも出力する
    #[arg(long)]
    pub pdf: bool,

    /// ラベル文字とPDFに使うTTF/OTFフォントファイルのパス (オプション: デフォルトは組み込みフォント)
    #[arg(short, long)]
    pub font_path: Option<PathBuf>,
}

fn parse_pixel_size(s: &str) -> Result<u32, String> {
    let size: u32 = s
        .parse()
        .map_err(|_| format!("'{}' は数値ではありません", s))?;
    if SUPPORTED_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(format!(
            "サイズは {:?} のいずれかを指定してください",
            SUPPORTED_SIZES
        ))
    }
}
