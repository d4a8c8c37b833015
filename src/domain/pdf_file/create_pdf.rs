use genpdf::{elements, Alignment, Document, PaperSize, Rotation, Scale, SimplePageDecorator};
use image::GenericImageView;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

use super::pdf_font::PdfFont;
use crate::domain::batch::pipeline::Batch;

// A4 (mm)
const PAGE_W_MM: f64 = 210.0;
const PAGE_H_MM: f64 = 297.0;
const MARGIN_MM: f64 = 10.0;

/// 印刷を見据え DPI は 300 を既定とする（大きすぎる画像は自動縮小）。
const PRINT_DPI: f64 = 300.0;

fn px_to_mm(px: u32, dpi: f64) -> f64 {
    (px as f64) / dpi * 25.4
}

/// 印刷用 PDF の生成や保存で発生するエラー。
#[derive(Debug, Error, PartialEq)]
pub enum PdfValidationError {
    /// 画像が1件もない場合。
    #[error("PDFに配置する画像がありません")]
    Empty,
    /// PDFドキュメントの構築やレンダリング中にエラーが発生した場合。
    #[error("PDFの作成に失敗しました: {0}")]
    PdfCreationError(String),
    /// 生成されたPDFデータをファイルに保存する際にエラーが発生した場合。
    #[error("PDFの保存に失敗しました: {0}")]
    PdfSaveError(String),
}

/// バッチで生成した画像を1ページに1枚ずつ並べた印刷用 PDF。
pub struct PdfFile {
    /// ドキュメントのタイトルとファイル名の元になる名前（`qr_codes` / `labels`）。
    pub file_name: String,
    pub page_count: usize,
    /// メモリ上にレンダリングされたPDFのバイト列。
    pub pdf_data: Vec<u8>,
}

/// 画像をページ中央に置くための倍率と回転。
///
/// 回転なしと90°回転の両方で収まる倍率を計算し、大きい方を採用する。等倍より拡大はしない。
fn fit_to_page(w_px: u32, h_px: u32) -> (f64, Option<f64>) {
    let usable_w = PAGE_W_MM - 2.0 * MARGIN_MM;
    let usable_h = PAGE_H_MM - 2.0 * MARGIN_MM;
    let (w_mm, h_mm) = (px_to_mm(w_px, PRINT_DPI), px_to_mm(h_px, PRINT_DPI));

    let s0 = (usable_w / w_mm).min(usable_h / h_mm);
    let s90 = (usable_w / h_mm).min(usable_h / w_mm);

    if s90 > s0 {
        (s90.min(1.0), Some(90.0))
    } else {
        (s0.min(1.0), None)
    }
}

impl PdfFile {
    /// バッチ内の各画像を1ページずつ配置した PDF をメモリ上に生成します。
    ///
    /// # 戻り値
    /// - `Err(PdfValidationError::Empty)`: バッチに画像がない場合。
    /// - `Err(PdfValidationError::PdfCreationError)`: 画像の読み込みやレンダリングに失敗した場合。
    pub fn create_file(batch: &Batch, pdf_font: &PdfFont) -> Result<Self, PdfValidationError> {
        let items = batch.items();
        if items.is_empty() {
            return Err(PdfValidationError::Empty);
        }

        // STEP 1: A4・余白10mmのドキュメントを準備
        let title = batch.mode().folder_name();
        let mut doc = Document::new(pdf_font.get_font_family().clone());
        doc.set_title(title);
        doc.set_paper_size(PaperSize::A4);
        // ICCプロファイルなどを省略してファイルサイズを抑える
        doc.set_minimal_conformance();

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(MARGIN_MM as i32);
        doc.set_page_decorator(decorator);

        // STEP 2: 画像を1ページに1枚ずつ、ページに収まるよう縮小・回転して配置
        for (idx, item) in items.iter().enumerate() {
            let (w_px, h_px) = image::load_from_memory(item.image_data())
                .map_err(|e| {
                    PdfValidationError::PdfCreationError(format!(
                        "{} の読み込みに失敗しました: {}",
                        item.file_name(),
                        e
                    ))
                })?
                .dimensions();
            let (scale, rotate_deg) = fit_to_page(w_px, h_px);

            let mut img = elements::Image::from_reader(Cursor::new(item.image_data().to_vec()))
                .map_err(|e| {
                    PdfValidationError::PdfCreationError(format!(
                        "{} のPDF要素への変換に失敗しました: {}",
                        item.file_name(),
                        e
                    ))
                })?;
            img.set_dpi(PRINT_DPI);
            img.set_scale(Scale::new(scale, scale));
            if let Some(deg) = rotate_deg {
                img.set_clockwise_rotation(Rotation::from_degrees(deg));
            }
            img.set_alignment(Alignment::Center);
            doc.push(img);

            // 最後の画像の後には改ページを入れない
            if idx + 1 < items.len() {
                doc.push(elements::PageBreak::new());
            }
        }

        // STEP 3: メモリ上にレンダリング
        let mut pdf_bytes: Vec<u8> = Vec::new();
        doc.render(&mut pdf_bytes)
            .map_err(|e| PdfValidationError::PdfCreationError(e.to_string()))?;

        tracing::info!(pages = items.len(), bytes = pdf_bytes.len(), "印刷用PDFを作成しました");

        Ok(Self {
            file_name: title.to_string(),
            page_count: items.len(),
            pdf_data: pdf_bytes,
        })
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), PdfValidationError> {
        fs::write(path, &self.pdf_data).map_err(|e| PdfValidationError::PdfSaveError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::pipeline::BatchPipeline;
    use crate::domain::input_lines::InputLines;
    use crate::domain::label::compositor::LabelCompositor;
    use crate::domain::label::label_font::LabelFont;
    use crate::domain::qr_encoder::QrCodeEncoder;
    use crate::domain::render_config::{ForegroundColor, RenderConfig, RenderMode};

    fn label_batch(raw: &str) -> Batch {
        let lines = InputLines::parse(raw).unwrap();
        let config = RenderConfig::new(150, ForegroundColor::BLACK, RenderMode::Label).unwrap();
        BatchPipeline::new(QrCodeEncoder::new())
            .with_compositor(LabelCompositor::new(LabelFont::new(None).unwrap()))
            .run(&lines, &config, |_| {})
            .unwrap()
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let (scale, rotation) = fit_to_page(200, 200);
        assert_eq!(scale, 1.0);
        assert_eq!(rotation, None);
    }

    /// 横長で用紙幅を超える画像は90°回転した方が大きく載る。
    #[test]
    fn wide_images_are_rotated_to_fit() {
        let (scale, rotation) = fit_to_page(4000, 800);
        assert_eq!(rotation, Some(90.0));
        assert!(scale < 1.0);
    }

    #[test]
    fn create_file_renders_one_page_per_item() {
        let batch = label_batch("SKU-0001\nSKU-0002");
        let font = PdfFont::new(None).unwrap();
        let pdf = PdfFile::create_file(&batch, &font).unwrap();

        assert_eq!(pdf.file_name, "labels");
        assert_eq!(pdf.page_count, 2);
        assert!(pdf.pdf_data.starts_with(b"%PDF"));
    }

    #[test]
    fn save_to_path_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let batch = label_batch("one");
        let pdf = PdfFile::create_file(&batch, &PdfFont::new(None).unwrap()).unwrap();
        let path = dir.path().join("labels.pdf");
        pdf.save_to_path(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), pdf.pdf_data);
    }
}
