use thiserror::Error;

/// 1行分の画像を生成できなかった理由。
///
/// バッチ全体は止めずに、その行だけをスキップする扱いになります。
#[derive(Debug, Error)]
pub enum RenderError {
    /// QR シンボルとして表現できない内容（長すぎるなど）。
    #[error("QRコードを生成できません: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// ラベル画像の合成に失敗した場合。
    #[error("ラベル画像を合成できません: {0}")]
    Composite(String),

    /// 完成したラスタ画像の PNG エンコードに失敗した場合。
    #[error("PNGのエンコードに失敗しました: {0}")]
    Png(#[from] image::ImageError),
}
