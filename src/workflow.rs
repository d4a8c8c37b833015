//! アプリケーションのメインワークフローを定義するモジュール。
//!
//! このモジュールは、UI層（`cli`）とドメイン層（`domain`）を仲介し、
//! 入力の読み込みからバッチ生成、ファイル・ZIP・PDF の出力までの流れを実装します。

use crate::cli::Args;
use qr_label_batch::domain::archive::zip_archive::ArchiveFile;
use qr_label_batch::domain::batch::pipeline::{Batch, BatchPipeline, BatchProgress, LineOutcome};
use qr_label_batch::domain::input_lines::InputLines;
use qr_label_batch::domain::label::compositor::LabelCompositor;
use qr_label_batch::domain::label::label_font::LabelFont;
use qr_label_batch::domain::pdf_file::create_pdf::PdfFile;
use qr_label_batch::domain::pdf_file::pdf_font::PdfFont;
use qr_label_batch::domain::qr_encoder::QrCodeEncoder;
use qr_label_batch::domain::render_config::{RenderConfig, RenderMode};
use qr_label_batch::error::AppError;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

// --- public な main 関数 ---

/// アプリケーションのメインロジックを実行します。
///
/// # 引数
/// * `args`: コマンドラインからパースされた引数 (`cli::Args`)。
///
/// # 戻り値
/// * `Ok(Batch)`: 出力が完了した場合。一部の行が失敗していても `Ok` になります。
/// * `Err(AppError)`: 入力が空、または出力できる画像が1件もない場合など。
pub fn run(args: Args) -> Result<Batch, AppError> {
    // 1. 入力の読み込みと検証
    let raw = read_input(args.input.as_deref())?;
    let lines = InputLines::parse(&raw)?;

    // 2. 描画設定とバッチ処理器の準備
    let config = RenderConfig::new(args.size, args.color, args.mode)?;
    let mut pipeline = BatchPipeline::new(QrCodeEncoder::new());
    if config.mode() == RenderMode::Label {
        let font = LabelFont::new(args.font_path.as_deref())?;
        pipeline = pipeline.with_compositor(LabelCompositor::new(font));
    }

    // 3. バッチ生成
    // 件数表示は成功件数ではなく入力行数
    println!(
        "生成対象: {} 件 (サイズ {}px, 色 {})",
        lines.len(),
        config.pixel_size(),
        config.foreground()
    );
    let batch = pipeline.run(&lines, &config, print_progress)?;

    if batch.is_empty() {
        return Err(AppError::NoItemsGenerated(batch.requested()));
    }

    // 4. 出力ディレクトリの決定（生成できた画像があるときだけ作成する）
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    if !output_dir.exists() {
        fs::create_dir_all(&output_dir)?;
    }

    // 5. 出力
    if args.zip {
        write_archive(&batch, &output_dir)?;
    } else {
        write_items(&batch, &output_dir)?;
    }
    if args.pdf {
        write_print_sheet(&batch, &output_dir, args.font_path.as_deref())?;
    }

    println!(
        "完了: {} 件中 {} 件を生成しました（スキップ {} 件）",
        batch.requested(),
        batch.items().len(),
        batch.failures().len()
    );
    for failure in batch.failures() {
        eprintln!(
            "[警告] {} 行目 '{}' はスキップされました: {}",
            failure.index, failure.source_text, failure.error
        );
    }

    Ok(batch)
}

// --- private なヘルパー関数 ---

/// ファイル、またはパスが省略されているか `-` のときは標準入力からテキストを読み込みます。
fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    match path {
        Some(p) if p != Path::new("-") => Ok(fs::read_to_string(p)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_progress(progress: BatchProgress<'_>) {
    match progress.outcome {
        LineOutcome::Generated(item) => {
            println!("  [{}/{}] {}", progress.position, progress.total, item.file_name());
        }
        LineOutcome::Failed(failure) => {
            println!(
                "  [{}/{}] スキップ: {}",
                progress.position, progress.total, failure.source_text
            );
        }
    }
}

/// 生成した画像を1件ずつ `{output_dir}/{file_name}` に保存します。
///
/// 途中で書き込みに失敗した場合は、それまでに保存できた件数を `PartialWrite` で返します。
fn write_items(batch: &Batch, output_dir: &Path) -> Result<(), AppError> {
    let total = batch.items().len();
    for (written, item) in batch.items().iter().enumerate() {
        let path = output_dir.join(item.file_name());
        fs::write(&path, item.image_data()).map_err(|source| AppError::PartialWrite {
            path,
            written,
            total,
            source,
        })?;
    }
    println!(
        "  -> {} に {} 件の画像を保存しました。",
        output_dir.display(),
        batch.items().len()
    );
    Ok(())
}

/// すべての画像を `{output_dir}/{folder}.zip` にまとめて保存します。
fn write_archive(batch: &Batch, output_dir: &Path) -> Result<(), AppError> {
    let archive = ArchiveFile::export(batch)?;
    let path = output_dir.join(archive.file_name());
    archive.save_to_path(&path)?;
    println!("  -> ZIPを作成しました: {}", path.display());
    Ok(())
}

/// 印刷用 PDF を `{output_dir}/{folder}.pdf` に保存します。
fn write_print_sheet(
    batch: &Batch,
    output_dir: &Path,
    font_path: Option<&Path>,
) -> Result<(), AppError> {
    let font = PdfFont::new(font_path)?;
    let pdf = PdfFile::create_file(batch, &font)?;
    let path = output_dir.join(format!("{}.pdf", pdf.file_name));
    pdf.save_to_path(&path)?;
    println!("  -> PDFを作成しました: {} ({} ページ)", path.display(), pdf.page_count);
    Ok(())
}
