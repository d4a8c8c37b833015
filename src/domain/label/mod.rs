pub mod compositor;
pub mod label_font;
pub mod text_split;
