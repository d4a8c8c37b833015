//! テキスト行のリストから QR コード画像（またはラベル画像）を一括生成するライブラリ。
//!
//! CLI 層（`main.rs` / `cli.rs` / `workflow.rs`）からはこのクレートの
//! `domain` と `error` だけが参照されます。

pub mod domain;
pub mod error;
