//! QR 画像とテキストを1枚の印刷用ラベル画像に合成するモジュール。
//!
//! レイアウトは固定比率です。
//!
//! ```text
//! +--------------------------------------------------+  高さ = size + 2*PADDING
//! | [QR size×size]   1行目 (先頭18文字)              |
//! |                  2行目 (残り)                    |
//! +--------------------------------------------------+  幅 = size*3.5 + 2*PADDING
//! ```

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use super::label_font::LabelFont;
use super::text_split::split_label_text;
use crate::domain::render_config::ForegroundColor;
use crate::domain::render_error::RenderError;

/// キャンバス外周からの余白（`size` に依存しない固定値）。
pub const PADDING: u32 = 20;

/// 枠線の太さ。キャンバス外周の4ピクセルが黒で塗られる。
pub const BORDER_WIDTH: u32 = 4;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 文字の行間係数。各行の中心はキャンバス中央から `font_size * 0.8` だけ上下にずれる。
const LINE_OFFSET_RATIO: f32 = 0.8;

/// ラベル画像の寸法と各要素の配置。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub width: u32,
    pub height: u32,
    pub qr_origin: (u32, u32),
    pub text_x: f32,
    pub font_size: f32,
    pub first_line_y: f32,
    pub second_line_y: f32,
}

impl LabelLayout {
    pub fn for_size(size: u32) -> Self {
        let height = size + 2 * PADDING;
        let width = (size as f64 * 3.5).floor() as u32 + 2 * PADDING;
        let font_size = (size as f32 / 5.5).floor();
        let center_y = height as f32 / 2.0;

        Self {
            width,
            height,
            qr_origin: (PADDING + 10, PADDING),
            text_x: (PADDING + size + 30) as f32,
            font_size,
            first_line_y: center_y - font_size * LINE_OFFSET_RATIO,
            second_line_y: center_y + font_size * LINE_OFFSET_RATIO,
        }
    }
}

/// QR 画像と元テキストからラベル画像を作る合成器。
#[derive(Debug, Clone)]
pub struct LabelCompositor {
    font: LabelFont,
}

impl LabelCompositor {
    pub fn new(font: LabelFont) -> Self {
        Self { font }
    }

    /// ラベル画像を合成します。
    ///
    /// # 引数
    /// * `text`: ラベルに印字する元テキスト（QR の内容と同じ）。
    /// * `qr`: エンコーダが返した `size × size` の QR 画像。等倍のまま貼り付けます。
    /// * `size`: QR 画像の一辺のピクセル数。
    /// * `color`: 文字色。
    ///
    /// # 戻り値
    /// * `Err(RenderError::Composite)`: QR 画像の寸法が `size` と一致しない場合。
    pub fn composite(
        &self,
        text: &str,
        qr: &RgbaImage,
        size: u32,
        color: ForegroundColor,
    ) -> Result<RgbaImage, RenderError> {
        if qr.dimensions() != (size, size) {
            return Err(RenderError::Composite(format!(
                "QR画像の寸法 {}x{} がサイズ {} と一致しません",
                qr.width(),
                qr.height(),
                size
            )));
        }

        // STEP 1: レイアウトを計算し、白で塗りつぶしたキャンバスを用意する
        let layout = LabelLayout::for_size(size);
        let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, WHITE);

        // STEP 2: 外周に太さ4の黒枠を描く
        draw_border(&mut canvas);

        // STEP 3: QR 画像を拡大縮小せずに左側へ貼り付ける
        let (qr_x, qr_y) = layout.qr_origin;
        imageops::replace(&mut canvas, qr, qr_x as i64, qr_y as i64);

        // STEP 4: テキストを18文字目で2行に分け、QR の右側に上下に並べて描く
        // サイズが小さすぎてフォントサイズが0になる場合は文字を省略する
        if layout.font_size > 0.0 {
            let lines = split_label_text(text);
            let font = self.font.font();
            let rgba = color.to_rgba();
            draw_text_line(
                &mut canvas,
                font,
                layout.font_size,
                layout.text_x,
                layout.first_line_y,
                &lines.first,
                rgba,
            );
            draw_text_line(
                &mut canvas,
                font,
                layout.font_size,
                layout.text_x,
                layout.second_line_y,
                &lines.second,
                rgba,
            );
        }

        Ok(canvas)
    }
}

/// 外周から1ピクセルずつ内側へ、`BORDER_WIDTH` 本の矩形を重ねて枠線にします。
fn draw_border(canvas: &mut RgbaImage) {
    let (w, h) = canvas.dimensions();
    for inset in 0..BORDER_WIDTH {
        let rect = Rect::at(inset as i32, inset as i32).of_size(w - 2 * inset, h - 2 * inset);
        draw_hollow_rect_mut(canvas, rect, BLACK);
    }
}

/// em サイズ `font_size` の1行を、em ボックスの縦中央が `middle_y` に来るよう描画します。
///
/// `PxScale` はアセンダからディセンダまでの高さなので、em 基準に換算してから使います。
/// `draw_text_mut` の y は行の上端（ベースライン - アセント）を指します。
fn draw_text_line(
    canvas: &mut RgbaImage,
    font: &FontArc,
    font_size: f32,
    x: f32,
    middle_y: f32,
    text: &str,
    color: Rgba<u8>,
) {
    if text.is_empty() {
        return;
    }

    let units_per_em = font.units_per_em().unwrap_or(font.height_unscaled());
    let scale = PxScale::from(font_size * font.height_unscaled() / units_per_em);

    let scaled = font.as_scaled(scale);
    let baseline = middle_y + (scaled.ascent() + scaled.descent()) / 2.0;
    let top = baseline - scaled.ascent();

    // キャンバス外のピクセルは imageproc 側で切り捨てられる
    draw_text_mut(
        canvas,
        color,
        x.round() as i32,
        top.round() as i32,
        scale,
        font,
        text,
    );
}
