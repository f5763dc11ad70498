//! # プラグインオプション
//!
//! ジョブごとに設定されるメール通知プラグインのオプションと、
//! そこから組み立てる宛先リスト。
//!
//! ```json
//! {
//!   "committer": true,
//!   "addresses": ["team@example.com"],
//!   "default_mailto_address": "ci-admin@example.com"
//! }
//! ```
//!
//! 宛先の並び順は「コミッター → `addresses` → `default_mailto_address`」で固定。
//! 重複は除去しない。
//!
//! `committer` はキーの有無だけを見る。`null` 以外の値であれば `false` や `0` でも
//! 有効とみなす。

use serde::{Deserialize, Deserializer, de::IgnoredAny};

use crate::build::BuildResult;

/// メール通知プラグインのオプション
///
/// デシリアライズ時に正規化し、以降は値の有無だけを見ればよい状態にする。
///
/// `default_mailto_address` は「未設定（`None`）」「空文字列（`Some("")`）」
/// 「値あり」を区別する。空文字列も宛先として追加され、配送時に失敗として数えられる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// コミッターにも送るか
    #[serde(deserialize_with = "present_flag")]
    pub committer:              bool,
    /// 追加の宛先（記載順に送信）
    pub addresses:              Vec<String>,
    /// 最後に必ず追加する宛先
    pub default_mailto_address: Option<String>,
}

impl PluginOptions {
    /// 宛先リストを組み立てる
    ///
    /// 1. `committer` が有効でコミッターアドレスが空でなければ追加
    /// 2. `addresses` を記載順に追加
    /// 3. `default_mailto_address` があれば末尾に追加
    pub fn recipients(&self, build: &BuildResult) -> Vec<String> {
        let mut recipients = Vec::with_capacity(self.addresses.len() + 2);

        if let Some(committer) = build.committer_email().filter(|_| self.committer) {
            recipients.push(committer.to_string());
        }

        recipients.extend(self.addresses.iter().cloned());

        if let Some(fallback) = &self.default_mailto_address {
            recipients.push(fallback.clone());
        }

        recipients
    }
}

/// 値の型は問わず、`null` 以外なら `true`
fn present_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IgnoredAny>::deserialize(deserializer)?.is_some())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn build_with_committer(email: Option<&str>) -> BuildResult {
        BuildResult::new(true, "log", email.map(str::to_string))
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_順序を保ち重複を除去しない() {
        let options = PluginOptions {
            committer: true,
            addresses: strings(&["b@x.com", "a@x.com"]),
            ..Default::default()
        };

        let recipients = options.recipients(&build_with_committer(Some("a@x.com")));

        assert_eq!(recipients, strings(&["a@x.com", "b@x.com", "a@x.com"]));
    }

    #[rstest]
    #[case::コミッター無効(false, Some("a@x.com"), vec![])]
    #[case::アドレスなし(true, None, vec![])]
    #[case::空のアドレス(true, Some(""), vec![])]
    #[case::両方あり(true, Some("a@x.com"), vec!["a@x.com"])]
    fn test_コミッターの追加条件(
        #[case] committer: bool,
        #[case] email: Option<&str>,
        #[case] expected: Vec<&str>,
    ) {
        let options = PluginOptions {
            committer,
            ..Default::default()
        };

        assert_eq!(
            options.recipients(&build_with_committer(email)),
            strings(&expected)
        );
    }

    #[test]
    fn test_default_mailto_addressは末尾に追加される() {
        let options = PluginOptions {
            committer:              true,
            addresses:              strings(&["b@x.com"]),
            default_mailto_address: Some("fallback@x.com".to_string()),
        };

        let recipients = options.recipients(&build_with_committer(Some("a@x.com")));

        assert_eq!(
            recipients,
            strings(&["a@x.com", "b@x.com", "fallback@x.com"])
        );
    }

    #[test]
    fn test_オプションが空なら宛先も空() {
        let recipients = PluginOptions::default().recipients(&build_with_committer(Some("a@x.com")));
        assert!(recipients.is_empty());
    }

    // ===== デシリアライズ テスト =====

    #[test]
    fn test_jsonからデシリアライズできる() {
        let options: PluginOptions = serde_json::from_str(
            r#"{
                "committer": true,
                "addresses": ["team@example.com"],
                "default_mailto_address": "admin@example.com"
            }"#,
        )
        .unwrap();

        assert_eq!(
            options,
            PluginOptions {
                committer:              true,
                addresses:              strings(&["team@example.com"]),
                default_mailto_address: Some("admin@example.com".to_string()),
            }
        );
    }

    #[test]
    fn test_省略したキーはデフォルトになる() {
        let options: PluginOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, PluginOptions::default());
    }

    #[rstest]
    #[case::真(r#"{ "committer": true }"#, true)]
    #[case::偽(r#"{ "committer": false }"#, true)]
    #[case::数値(r#"{ "committer": 1 }"#, true)]
    #[case::文字列(r#"{ "committer": "yes" }"#, true)]
    #[case::null(r#"{ "committer": null }"#, false)]
    #[case::省略("{}", false)]
    fn test_committerはnull以外の値があれば有効(#[case] json: &str, #[case] expected: bool) {
        let options: PluginOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.committer, expected);
        let expected_recipients = if expected { strings(&["a@x.com"]) } else { vec![] };
        assert_eq!(
            options.recipients(&build_with_committer(Some("a@x.com"))),
            expected_recipients
        );
    }

    #[test]
    fn test_空文字列のdefault_mailto_addressも宛先に追加される() {
        let options: PluginOptions = serde_json::from_str(
            r#"{ "addresses": ["b@x.com"], "default_mailto_address": "" }"#,
        )
        .unwrap();

        assert_eq!(options.default_mailto_address, Some(String::new()));
        assert_eq!(
            options.recipients(&build_with_committer(None)),
            strings(&["b@x.com", ""])
        );
    }

    #[test]
    fn test_nullのdefault_mailto_addressは未設定扱い() {
        let options: PluginOptions =
            serde_json::from_str(r#"{ "default_mailto_address": null }"#).unwrap();
        assert_eq!(options.default_mailto_address, None);
    }
}
