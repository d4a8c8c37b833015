use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use thiserror::Error;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::batch::pipeline::Batch;

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// 生成済みの画像が1件もない場合。
    #[error("アーカイブに入れる画像がありません")]
    Empty,

    #[error("ZIPアーカイブの作成に失敗しました: {0}")]
    Zip(#[from] ZipError),

    #[error("ZIPアーカイブの読み書きに失敗しました: {0}")]
    Io(#[from] std::io::Error),
}

/// メモリ上に作成した ZIP アーカイブ。
///
/// 生成した画像はすべて、モードごとのフォルダ（`qr_codes/` または `labels/`）の下に
/// 元の PNG バイト列のまま格納されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    folder_name: String,
    data: Vec<u8>,
}

impl ArchiveFile {
    // --- Public Methods ---

    /// バッチの結果から ZIP アーカイブを作成します。
    ///
    /// # 戻り値
    /// * `Err(ArchiveError::Empty)`: バッチに画像が1件もない場合。
    pub fn export(batch: &Batch) -> Result<Self, ArchiveError> {
        if batch.is_empty() {
            return Err(ArchiveError::Empty);
        }

        // STEP 1: モードごとのフォルダ名で、メモリ上に ZIP を開く
        let folder_name = batch.mode().folder_name();
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        // STEP 2: フォルダエントリと、その下に各画像を格納順に追加
        zip.add_directory(format!("{}/", folder_name), options)?;
        for item in batch.items() {
            zip.start_file(format!("{}/{}", folder_name, item.file_name()), options)?;
            zip.write_all(item.image_data())?;
        }

        // STEP 3: 書き込みを完了してバイト列を取り出す
        let data = zip.finish()?.into_inner();

        tracing::info!(
            folder = folder_name,
            entries = batch.items().len(),
            bytes = data.len(),
            "ZIPアーカイブを作成しました"
        );

        Ok(Self {
            folder_name: folder_name.to_string(),
            data,
        })
    }

    /// 保存時のファイル名（例: `qr_codes.zip`）。
    pub fn file_name(&self) -> String {
        format!("{}.zip", self.folder_name)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// アーカイブのバイト列を指定パスに書き込みます。
    pub fn save_to_path(&self, path: &Path) -> Result<(), ArchiveError> {
        fs::write(path, &self.data)?;
        Ok(())
    }
}
