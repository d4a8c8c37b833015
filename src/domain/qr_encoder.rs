//! QR シンボル生成のアダプタ。
//!
//! シンボル自体の符号化は `qrcode` クレートに任せ、ここでは指定サイズの
//! ラスタ画像へ塗り分けるだけを担当します。

use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use super::render_config::ForegroundColor;
use super::render_error::RenderError;

const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// テキストから `size × size` ピクセルの QR 画像を作るもの。
///
/// バッチ処理のテストで失敗するエンコーダを差し込めるよう、トレイトにしてあります。
pub trait QrEncoder {
    fn encode(
        &self,
        text: &str,
        size: u32,
        color: ForegroundColor,
    ) -> Result<RgbaImage, RenderError>;
}

/// `qrcode` クレートを使った誤り訂正レベル H の実装。
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeEncoder;

impl QrCodeEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl QrEncoder for QrCodeEncoder {
    /// 余白（クワイエットゾーン）なしでモジュールを画像全体に引き伸ばします。
    ///
    /// モジュール数で割り切れないサイズでも出力は必ず `size × size` になり、
    /// 各ピクセルは `px * n / size` 番目のモジュールの色を取ります。
    fn encode(
        &self,
        text: &str,
        size: u32,
        color: ForegroundColor,
    ) -> Result<RgbaImage, RenderError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)?;
        let modules = code.to_colors();
        let module_count = code.width() as u64;
        let dark = color.to_rgba();

        let img = RgbaImage::from_fn(size, size, |px, py| {
            let mx = px as u64 * module_count / size as u64;
            let my = py as u64 * module_count / size as u64;
            match modules[(my * module_count + mx) as usize] {
                Color::Dark => dark,
                Color::Light => LIGHT,
            }
        });

        tracing::trace!(modules = module_count, size, "QRコードをラスタ化しました");
        Ok(img)
    }
}
