pub mod create_pdf;
pub mod pdf_font;
