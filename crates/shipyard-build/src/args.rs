//! ビルド引数のパース
//!
//! CLI から渡される `key=value,key=value` 形式の文字列をマップに変換します。

use crate::error::{BuildError, Result};
use std::collections::HashMap;

/// `key=value,key=value` 形式のビルド引数をパース
///
/// 値に `=` を含む場合は最初の `=` で分割する。同じキーが複数ある場合は後勝ち。
/// `=` の無いペアやキーが空のペアはエラー。
pub fn parse_build_args(input: &str) -> Result<HashMap<String, String>> {
    let mut args = HashMap::new();

    for pair in input.split(',') {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| BuildError::BuildArgParse(format!("'{}' に '=' がありません", pair)))?;

        if key.is_empty() {
            return Err(BuildError::BuildArgParse(format!(
                "'{}' のキーが空です",
                pair
            )));
        }

        args.insert(key.to_string(), value.to_string());
    }

    Ok(args)
}
