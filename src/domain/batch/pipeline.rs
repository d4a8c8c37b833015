//! 入力行を1行ずつ QR 画像（またはラベル画像）に変換するバッチ処理。
//!
//! 処理は厳密に入力順・逐次で行います。1行の失敗でバッチ全体を止めることはなく、
//! 失敗した行は結果から除外したうえで `Batch::failures` に記録します。

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

use super::generated_item::GeneratedItem;
use crate::domain::input_lines::InputLines;
use crate::domain::label::compositor::LabelCompositor;
use crate::domain::qr_encoder::QrEncoder;
use crate::domain::render_config::{RenderConfig, RenderMode};
use crate::domain::render_error::RenderError;

#[derive(Debug, Error)]
pub enum BatchError {
    /// ラベルモードなのにラベル合成器が設定されていない場合。1行も処理する前に返します。
    #[error("ラベルモードにはラベル合成器が必要です")]
    MissingCompositor,
}

/// 画像を生成できなかった行の記録。
#[derive(Debug)]
pub struct RenderFailure {
    /// 入力行の1始まりの位置。
    pub index: usize,
    pub source_text: String,
    pub error: RenderError,
}

/// 1行処理するごとに進捗コールバックへ渡される情報。
#[derive(Debug)]
pub struct BatchProgress<'a> {
    /// 処理済みの行数（1始まり）。
    pub position: usize,
    pub total: usize,
    pub outcome: LineOutcome<'a>,
}

#[derive(Debug)]
pub enum LineOutcome<'a> {
    Generated(&'a GeneratedItem),
    Failed(&'a RenderFailure),
}

/// 1回のバッチ実行の結果。呼び出し側が所有し、次の実行では丸ごと置き換えます。
#[derive(Debug)]
pub struct Batch {
    mode: RenderMode,
    requested: usize,
    items: Vec<GeneratedItem>,
    failures: Vec<RenderFailure>,
}

impl Batch {
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// 処理対象になった入力行の数。成功件数ではありません。
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// 生成に成功した画像。入力順に並びます。
    pub fn items(&self) -> &[GeneratedItem] {
        &self.items
    }

    pub fn failures(&self) -> &[RenderFailure] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// QR エンコーダと（ラベルモード用の）合成器をまとめたバッチ処理器。
pub struct BatchPipeline<E> {
    encoder: E,
    compositor: Option<LabelCompositor>,
}

impl<E: QrEncoder> BatchPipeline<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            compositor: None,
        }
    }

    pub fn with_compositor(mut self, compositor: LabelCompositor) -> Self {
        self.compositor = Some(compositor);
        self
    }

    /// すべての入力行を順番に処理して `Batch` を返します。
    ///
    /// # 引数
    /// * `lines`: 検証済みの入力行。
    /// * `config`: この実行で使う描画設定。
    /// * `on_progress`: 1行処理するたびに呼ばれるコールバック。
    ///
    /// # 戻り値
    /// * `Ok(Batch)`: 個々の行が失敗していても、最後の行まで処理すれば `Ok`。
    /// * `Err(BatchError::MissingCompositor)`: ラベルモードで合成器がない場合。
    pub fn run<F>(
        &self,
        lines: &InputLines,
        config: &RenderConfig,
        mut on_progress: F,
    ) -> Result<Batch, BatchError>
    where
        F: FnMut(BatchProgress<'_>),
    {
        // STEP 1: モードに応じて合成器を決める（ラベルモードで合成器がなければ全体を中止）
        let compositor = match config.mode() {
            RenderMode::Label => Some(
                self.compositor
                    .as_ref()
                    .ok_or(BatchError::MissingCompositor)?,
            ),
            RenderMode::Plain => None,
        };

        // STEP 2: 1行ずつ生成し、失敗した行は記録してスキップする
        let total = lines.len();
        let mut batch = Batch {
            mode: config.mode(),
            requested: total,
            items: Vec::with_capacity(total),
            failures: Vec::new(),
        };

        for (i, text) in lines.iter().enumerate() {
            let index = i + 1;
            let outcome = match self.render_png(text, config, compositor) {
                Ok(png) => {
                    let item = GeneratedItem::new(index, text, config.mode(), png);
                    tracing::debug!(index, file = item.file_name(), "画像を生成しました");
                    batch.items.push(item);
                    LineOutcome::Generated(&batch.items[batch.items.len() - 1])
                }
                Err(error) => {
                    tracing::warn!(index, text, %error, "画像を生成できなかったためスキップします");
                    batch.failures.push(RenderFailure {
                        index,
                        source_text: text.to_string(),
                        error,
                    });
                    LineOutcome::Failed(&batch.failures[batch.failures.len() - 1])
                }
            };
            on_progress(BatchProgress {
                position: index,
                total,
                outcome,
            });
        }

        Ok(batch)
    }

    /// 1行分の画像を生成し、PNG のバイト列にして返します。
    ///
    /// `compositor` が `Some` ならラベル画像、`None` なら QR 画像そのものを出力します。
    fn render_png(
        &self,
        text: &str,
        config: &RenderConfig,
        compositor: Option<&LabelCompositor>,
    ) -> Result<Vec<u8>, RenderError> {
        // STEP 1: QR コードを `size × size` で生成
        let size = config.pixel_size();
        let color = config.foreground();
        let qr = self.encoder.encode(text, size, color)?;

        // STEP 2: ラベルモードならテキストと合成
        let raster = match compositor {
            Some(compositor) => compositor.composite(text, &qr, size, color)?,
            None => qr,
        };

        // STEP 3: PNG にエンコード
        encode_png(&raster)
    }
}

/// 出力はすべて不透明なので、アルファチャンネルを落とした RGB の PNG にする。
fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::label::label_font::LabelFont;
    use crate::domain::qr_encoder::QrCodeEncoder;
    use crate::domain::render_config::ForegroundColor;
    use image::GenericImageView;

    /// 特定の内容だけ失敗させるテスト用エンコーダ。
    struct FailingOn<'a> {
        poison: &'a str,
        inner: QrCodeEncoder,
    }

    impl QrEncoder for FailingOn<'_> {
        fn encode(
            &self,
            text: &str,
            size: u32,
            color: ForegroundColor,
        ) -> Result<RgbaImage, RenderError> {
            if text == self.poison {
                return Err(RenderError::Composite("テスト用の失敗".to_string()));
            }
            self.inner.encode(text, size, color)
        }
    }

    fn config(size: u32, mode: RenderMode) -> RenderConfig {
        RenderConfig::new(size, ForegroundColor::BLACK, mode).unwrap()
    }

    fn decoded_dimensions(item: &GeneratedItem) -> (u32, u32) {
        image::load_from_memory(item.image_data())
            .expect("PNGとして読めるはず")
            .dimensions()
    }

    #[test]
    fn plain_mode_keeps_order_and_duplicates() {
        let lines = InputLines::parse("A\nB\nB").unwrap();
        let pipeline = BatchPipeline::new(QrCodeEncoder::new());
        let batch = pipeline
            .run(&lines, &config(200, RenderMode::Plain), |_| {})
            .unwrap();

        assert_eq!(batch.requested(), 3);
        let names: Vec<_> = batch.items().iter().map(|i| i.file_name()).collect();
        assert_eq!(names, vec!["qr_1_A.png", "qr_2_B.png", "qr_3_B.png"]);
        for item in batch.items() {
            assert_eq!(decoded_dimensions(item), (200, 200));
        }
        assert!(batch.failures().is_empty());
    }

    #[test]
    fn label_mode_produces_label_sized_png() {
        let text = "ABCDEFGHIJKLMNOPQRSTUVWXYZ01234";
        let lines = InputLines::parse(text).unwrap();
        let pipeline = BatchPipeline::new(QrCodeEncoder::new())
            .with_compositor(LabelCompositor::new(LabelFont::new(None).unwrap()));
        let batch = pipeline
            .run(&lines, &config(150, RenderMode::Label), |_| {})
            .unwrap();

        assert_eq!(batch.items().len(), 1);
        let item = &batch.items()[0];
        assert_eq!(item.file_name(), "label_1_ABCDEFGHIJKLMNOPQRST.png");
        assert_eq!(decoded_dimensions(item), (565, 190));
    }

    #[test]
    fn plain_mode_ignores_configured_compositor() {
        let lines = InputLines::parse("A").unwrap();
        let pipeline = BatchPipeline::new(QrCodeEncoder::new())
            .with_compositor(LabelCompositor::new(LabelFont::new(None).unwrap()));
        let batch = pipeline
            .run(&lines, &config(200, RenderMode::Plain), |_| {})
            .unwrap();

        let item = &batch.items()[0];
        assert_eq!(item.file_name(), "qr_1_A.png");
        assert_eq!(decoded_dimensions(item), (200, 200));
    }

    #[test]
    fn label_mode_without_compositor_fails_up_front() {
        let lines = InputLines::parse("A").unwrap();
        let pipeline = BatchPipeline::new(QrCodeEncoder::new());
        let mut calls = 0;
        let res = pipeline.run(&lines, &config(100, RenderMode::Label), |_| calls += 1);
        assert!(matches!(res, Err(BatchError::MissingCompositor)));
        assert_eq!(calls, 0);
    }

    /// 1行失敗しても残りの行は処理され、失敗は記録される。
    #[test]
    fn failed_line_is_skipped_and_recorded() {
        let lines = InputLines::parse("one\nbad\nthree").unwrap();
        let pipeline = BatchPipeline::new(FailingOn {
            poison: "bad",
            inner: QrCodeEncoder::new(),
        });
        let batch = pipeline
            .run(&lines, &config(100, RenderMode::Plain), |_| {})
            .unwrap();

        assert_eq!(batch.requested(), 3);
        let names: Vec<_> = batch.items().iter().map(|i| i.file_name()).collect();
        assert_eq!(names, vec!["qr_1_one.png", "qr_3_three.png"]);
        assert_eq!(batch.failures().len(), 1);
        assert_eq!(batch.failures()[0].index, 2);
        assert_eq!(batch.failures()[0].source_text, "bad");
    }

    #[test]
    fn too_long_payload_is_a_render_failure() {
        let long = "y".repeat(3000);
        let lines = InputLines::parse(&format!("ok\n{long}")).unwrap();
        let pipeline = BatchPipeline::new(QrCodeEncoder::new());
        let batch = pipeline
            .run(&lines, &config(100, RenderMode::Plain), |_| {})
            .unwrap();

        assert_eq!(batch.items().len(), 1);
        assert!(matches!(batch.failures()[0].error, RenderError::Encode(_)));
    }

    #[test]
    fn progress_is_reported_for_every_line_in_order() {
        let lines = InputLines::parse("x\nbad\nz").unwrap();
        let pipeline = BatchPipeline::new(FailingOn {
            poison: "bad",
            inner: QrCodeEncoder::new(),
        });
        let mut seen = Vec::new();
        pipeline
            .run(&lines, &config(100, RenderMode::Plain), |p| {
                let ok = matches!(p.outcome, LineOutcome::Generated(_));
                seen.push((p.position, p.total, ok));
            })
            .unwrap();

        assert_eq!(seen, vec![(1, 3, true), (2, 3, false), (3, 3, true)]);
    }
}
