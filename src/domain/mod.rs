pub mod archive;
pub mod batch;
pub mod font_source;
pub mod input_lines;
pub mod label;
pub mod pdf_file;
pub mod qr_encoder;
pub mod render_config;
pub mod render_error;

