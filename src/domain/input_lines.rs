use thiserror::Error;

// --- 構造体定義 ---

/// QR コードの元になる、検証済みの入力行リスト。
///
/// `parse` を通じてのみインスタンス化でき、その際に以下の点が保証されます。
/// - 各行は前後の空白が取り除かれ、空ではないこと
/// - 1行以上含まれていること
///
/// 元の入力の順序はそのまま保持され、重複行も取り除きません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLines {
    lines: Vec<String>,
}

// --- エラー定義 ---

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// 空白以外の文字を含む行が1つもなかった場合。
    #[error("入力が空です。QRコードにする内容を1行以上入力してください。")]
    EmptyInput,
}

// --- 実装ブロック ---

impl InputLines {
    /// 改行区切りの生テキストから `InputLines` を作成します。
    ///
    /// 各行をトリムしてから空行を捨てるため、`\r\n` 改行のファイルもそのまま扱えます。
    ///
    /// # 戻り値
    /// * `Ok(InputLines)`: 空でない行が1つ以上あった場合。
    /// * `Err(InputError::EmptyInput)`: すべての行が空白だった場合。
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let lines: Vec<String> = raw
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if lines.is_empty() {
            return Err(InputError::EmptyInput);
        }
        Ok(Self { lines })
    }

    /// 行数。`parse` が空を拒否するので常に1以上。
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
