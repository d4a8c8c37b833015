/// 1行目に入れる最大文字数。
pub const FIRST_LINE_CHARS: usize = 18;

/// ラベルに載せる2行分のテキスト。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLines {
    pub first: String,
    pub second: String,
}

/// テキストを固定位置で2行に分割します。
///
/// 18文字を超える場合は先頭18文字を1行目、残りすべてを2行目にします。
/// 単語の境界は考慮しないため、単語やコードの途中で分かれることがあります。
/// 文字数は Unicode スカラー値単位で数えます。
pub fn split_label_text(text: &str) -> LabelLines {
    match text.char_indices().nth(FIRST_LINE_CHARS) {
        Some((byte_idx, _)) => LabelLines {
            first: text[..byte_idx].to_string(),
            second: text[byte_idx..].to_string(),
        },
        None => LabelLines {
            first: text.to_string(),
            second: String::new(),
        },
    }
}
