//! 引用提取服务 - 业务能力层
//!
//! 把一个文件的字节内容拆成若干条待校验引用。纯函数：同样的字节和格式永远得到同样的序列。

use crate::error::ExtractionError;
use crate::models::{ContentFormat, InputFile, VerificationUnit};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// JSON 记录中作为引用正文的字段
const CITATION_FIELD: &str = "citation_text";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 引用提取服务
#[derive(Debug, Default, Clone, Copy)]
pub struct UnitExtractor;

impl UnitExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 按文件推断的格式提取引用
    pub fn extract(
        &self,
        file: &InputFile,
        format: ContentFormat,
    ) -> Result<Vec<VerificationUnit>, ExtractionError> {
        self.extract_bytes(&file.payload, format)
    }

    /// 空文件或 `[]` 得到空序列，不算错误
    pub fn extract_bytes(
        &self,
        payload: &[u8],
        format: ContentFormat,
    ) -> Result<Vec<VerificationUnit>, ExtractionError> {
        let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);
        let text = std::str::from_utf8(payload).map_err(|_| ExtractionError::InvalidUtf8)?;

        match format {
            ContentFormat::Json => extract_json(text),
            ContentFormat::Lines => Ok(extract_lines(text)),
        }
    }
}

fn extract_json(text: &str) -> Result<Vec<VerificationUnit>, ExtractionError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;

    let units = match value {
        Value::Array(items) => items.into_iter().map(unit_from_element).collect(),
        other => vec![VerificationUnit::new(other.to_string())],
    };
    Ok(units)
}

fn unit_from_element(item: Value) -> VerificationUnit {
    match item {
        Value::String(s) => unit_with_detected_hints(s),
        Value::Object(ref record) => match record
            .get(CITATION_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
        {
            Some(citation) => {
                let field = |name: &str| {
                    record
                        .get(name)
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                };
                VerificationUnit {
                    text: citation.to_string(),
                    doi: field("doi"),
                    url: field("url"),
                    context: field("context"),
                }
            }
            None => VerificationUnit::new(item.to_string()),
        },
        other => VerificationUnit::new(other.to_string()),
    }
}

fn extract_lines(text: &str) -> Vec<VerificationUnit> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| unit_with_detected_hints(line.to_string()))
        .collect()
}

/// 纯文本引用中顺带识别 DOI / URL
fn unit_with_detected_hints(text: String) -> VerificationUnit {
    let doi = find_match(doi_pattern(), &text);
    let url = find_match(url_pattern(), &text);
    VerificationUnit {
        text,
        doi,
        url,
        context: None,
    }
}

fn find_match(pattern: Option<&Regex>, text: &str) -> Option<String> {
    pattern?
        .find(text)
        .map(|m| m.as_str().trim_end_matches(&['.', ',', ';', ')', ']'][..]).to_string())
}

fn doi_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\b10\.\d{4,9}/[^\s"<>]+"#).ok())
        .as_ref()
}

fn url_pattern() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s"<>]+"#).ok())
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(units: &[VerificationUnit]) -> Vec<&str> {
        units.iter().map(|u| u.text.as_str()).collect()
    }

    #[test]
    fn lines_skip_blanks_and_keep_order() {
        let payload = b"First, A. (2020) Title.\r\n\n   \nSecond, B. (2019)\nThird, C. (2018)\n";
        let units = UnitExtractor::new()
            .extract_bytes(payload, ContentFormat::Lines)
            .unwrap();
        assert_eq!(
            texts(&units),
            ["First, A. (2020) Title.", "Second, B. (2019)", "Third, C. (2018)"]
        );
    }

    #[test]
    fn plain_lines_pick_up_doi_and_url_hints() {
        let payload = b"Doe J. Nature 2021. doi:10.1038/s41586-021-03819-2. See https://example.org/paper).";
        let units = UnitExtractor::new()
            .extract_bytes(payload, ContentFormat::Lines)
            .unwrap();
        assert_eq!(units[0].doi.as_deref(), Some("10.1038/s41586-021-03819-2"));
        assert_eq!(units[0].url.as_deref(), Some("https://example.org/paper"));
    }

    #[test]
    fn json_array_elements_become_units() {
        let payload = br#"[
            "Plain string citation",
            {"citation_text": "Record citation", "doi": "10.1000/xyz", "context": "intro"},
            {"title": "No citation field"},
            42
        ]"#;
        let units = UnitExtractor::new()
            .extract_bytes(payload, ContentFormat::Json)
            .unwrap();

        assert_eq!(units.len(), 4);
        assert_eq!(units[0].text, "Plain string citation");
        assert_eq!(units[1].text, "Record citation");
        assert_eq!(units[1].doi.as_deref(), Some("10.1000/xyz"));
        assert_eq!(units[1].context.as_deref(), Some("intro"));
        assert_eq!(units[1].url, None);
        assert_eq!(units[2].text, r#"{"title":"No citation field"}"#);
        assert_eq!(units[3].text, "42");
    }

    #[test]
    fn json_object_is_a_single_unit() {
        let payload = br#"{"citation_text": "Whole payload", "year": 2020}"#;
        let units = UnitExtractor::new()
            .extract_bytes(payload, ContentFormat::Json)
            .unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].text.contains("Whole payload"));
    }

    #[test]
    fn malformed_json_fails_instead_of_line_splitting() {
        let err = UnitExtractor::new()
            .extract_bytes(b"[\"unterminated\", ", ContentFormat::Json)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidJson(_)));
    }

    #[test]
    fn empty_inputs_yield_no_units_without_error() {
        let extractor = UnitExtractor::new();
        assert_eq!(extractor.extract_bytes(b"", ContentFormat::Lines), Ok(vec![]));
        assert_eq!(extractor.extract_bytes(b"\n \n", ContentFormat::Lines), Ok(vec![]));
        assert_eq!(extractor.extract_bytes(b"[]", ContentFormat::Json), Ok(vec![]));
    }

    #[test]
    fn blank_citation_field_falls_back_to_whole_record() {
        let payload = br#"[{"citation_text": "", "title": "X"}, {"citation_text": "  ", "doi": "10.1/a"}]"#;
        let units = UnitExtractor::new()
            .extract_bytes(payload, ContentFormat::Json)
            .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].text, r#"{"citation_text":"","title":"X"}"#);
        assert_eq!(units[0].doi, None);
        assert_eq!(units[1].text, r#"{"citation_text":"  ","doi":"10.1/a"}"#);
    }

    #[test]
    fn bom_is_stripped_and_invalid_utf8_rejected() {
        let extractor = UnitExtractor::new();
        let units = extractor
            .extract_bytes(b"\xEF\xBB\xBF[\"a\"]", ContentFormat::Json)
            .unwrap();
        assert_eq!(texts(&units), ["a"]);

        assert_eq!(
            extractor.extract_bytes(&[0xff, 0xfe, 0x00], ContentFormat::Lines),
            Err(ExtractionError::InvalidUtf8)
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let payload = br#"[{"citation_text": "x", "url": "https://a.b"}, {"b": 1, "a": 2}, "y"]"#;
        let extractor = UnitExtractor::new();
        let first = extractor.extract_bytes(payload, ContentFormat::Json).unwrap();
        let second = extractor.extract_bytes(payload, ContentFormat::Json).unwrap();
        assert_eq!(first, second);
    }
}
