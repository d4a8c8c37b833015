use image::Rgba;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 生成モード。`Plain` は QR コード単体、`Label` は QR コードとテキストを並べたラベル画像。
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    Plain,
    Label,
}

impl RenderMode {
    /// 個別ファイル名の先頭に付ける接頭辞。
    pub fn file_prefix(self) -> &'static str {
        match self {
            RenderMode::Plain => "qr",
            RenderMode::Label => "label",
        }
    }

    /// ZIP 内のフォルダ名。アーカイブのファイル名にも使われる。
    pub fn folder_name(self) -> &'static str {
        match self {
            RenderMode::Plain => "qr_codes",
            RenderMode::Label => "labels",
        }
    }
}

/// QR コードの前景色（暗いモジュールとラベル文字の色）。背景は常に白。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForegroundColor([u8; 3]);

impl ForegroundColor {
    pub const BLACK: Self = Self([0, 0, 0]);

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// 不透明な RGBA ピクセル値を返します。
    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

impl Default for ForegroundColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// `#RRGGBB` または `#RGB` 形式の16進カラーコードを解釈します（`#` は省略可）。
impl FromStr for ForegroundColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || ConfigError::InvalidColor(s.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #RGB は各桁を2回繰り返した #RRGGBB と同じ色
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Ok(Self::new(r, g, b))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ForegroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("QRコードのサイズは1ピクセル以上を指定してください。")]
    ZeroPixelSize,

    #[error("色の指定が不正です: '{0}' (#RRGGBB 形式で指定してください)")]
    InvalidColor(String),
}

/// 1回のバッチ実行で使う描画設定。実行中は変更されません。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pixel_size: u32,
    foreground: ForegroundColor,
    mode: RenderMode,
}

impl RenderConfig {
    pub fn new(
        pixel_size: u32,
        foreground: ForegroundColor,
        mode: RenderMode,
    ) -> Result<Self, ConfigError> {
        if pixel_size == 0 {
            return Err(ConfigError::ZeroPixelSize);
        }
        Ok(Self {
            pixel_size,
            foreground,
            mode,
        })
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }
    pub fn foreground(&self) -> ForegroundColor {
        self.foreground
    }
    pub fn mode(&self) -> RenderMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(
            "#1a2B3c".parse::<ForegroundColor>(),
            Ok(ForegroundColor::new(0x1a, 0x2b, 0x3c))
        );
        assert_eq!(
            "#f80".parse::<ForegroundColor>(),
            Ok(ForegroundColor::new(0xff, 0x88, 0x00))
        );
        assert_eq!(
            "000000".parse::<ForegroundColor>(),
            Ok(ForegroundColor::BLACK)
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "#12", "#12345", "#gg0000", "red", "#ï12"] {
            assert_eq!(
                bad.parse::<ForegroundColor>(),
                Err(ConfigError::InvalidColor(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let color = ForegroundColor::new(0, 128, 255);
        assert_eq!(color.to_string(), "#0080ff");
        assert_eq!(color.to_string().parse::<ForegroundColor>(), Ok(color));
    }

    #[test]
    fn zero_pixel_size_is_rejected() {
        let res = RenderConfig::new(0, ForegroundColor::BLACK, RenderMode::Plain);
        assert_eq!(res, Err(ConfigError::ZeroPixelSize));
    }

    #[test]
    fn mode_names() {
        assert_eq!(RenderMode::Plain.file_prefix(), "qr");
        assert_eq!(RenderMode::Plain.folder_name(), "qr_codes");
        assert_eq!(RenderMode::Label.file_prefix(), "label");
        assert_eq!(RenderMode::Label.folder_name(), "labels");
    }
}
