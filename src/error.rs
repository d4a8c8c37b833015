use crate::domain::archive::zip_archive::ArchiveError;
use crate::domain::batch::pipeline::BatchError;
use crate::domain::input_lines::InputError;
use crate::domain::label::label_font::LabelFontError;
use crate::domain::pdf_file::create_pdf::PdfValidationError;
use crate::domain::render_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/Oエラーが発生しました: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Input(#[from] InputError),

    #[error("設定エラー: {0}")]
    Config(#[from] ConfigError),

    #[error("ラベル用フォントエラー: {0}")]
    LabelFont(#[from] LabelFontError),

    #[error("バッチ処理エラー: {0}")]
    Batch(#[from] BatchError),

    #[error("ZIP出力エラー: {0}")]
    Archive(#[from] ArchiveError),

    #[error("PDF生成エラー: {0}")]
    Pdf(#[from] PdfValidationError),

    #[error("PDF用フォントエラー: {0}")]
    PdfFont(#[from] genpdf::error::Error),

    #[error("{0} 件の入力から画像を1件も生成できませんでした")]
    NoItemsGenerated(usize),

    #[error(
        "{} に書き込めませんでした（{total} 件中 {written} 件は保存済み）: {source}",
        path.display()
    )]
    PartialWrite {
        path: PathBuf,
        written: usize,
        total: usize,
        source: std::io::Error,
    },
}
