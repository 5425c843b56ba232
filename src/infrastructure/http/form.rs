//! `application/x-www-form-urlencoded` 解码
//!
//! 字段值保留为字节，非法 UTF-8 交给领域层判定，而不是被替换成 U+FFFD

/// 解码后的表单
#[derive(Debug, Default)]
pub struct RawForm {
    fields: Vec<(Vec<u8>, Vec<u8>)>,
}

impl RawForm {
    pub fn parse(body: &[u8]) -> Self {
        let fields = body
            .split(|b| *b == b'&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let mut parts = pair.splitn(2, |b| *b == b'=');
                let name = parts.next().unwrap_or_default();
                let value = parts.next().unwrap_or_default();
                (decode_component(name), decode_component(value))
            })
            .collect();

        Self { fields }
    }

    /// 取第一个同名字段；缺失返回 None
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(key, _)| key.as_slice() == name.as_bytes())
            .map(|(_, value)| value.as_slice())
    }

    /// 缺失字段视为空值
    pub fn get_or_empty(&self, name: &str) -> Vec<u8> {
        self.get(name).map(<[u8]>::to_vec).unwrap_or_default()
    }
}

/// `+` 转空格后做百分号解码；不完整的转义原样保留
fn decode_component(input: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    urlencoding::decode_binary(&spaced).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_form() {
        let form = RawForm::parse(b"userInput=He+told+her+the+news.&genreInput=drama");
        assert_eq!(form.get("userInput"), Some(&b"He told her the news."[..]));
        assert_eq!(form.get("genreInput"), Some(&b"drama"[..]));
        assert_eq!(form.get("missing"), None);
        assert!(form.get_or_empty("missing").is_empty());
    }

    #[test]
    fn test_percent_decoding() {
        let form = RawForm::parse(b"userInput=caf%C3%A9%20%26%3D");
        assert_eq!(form.get("userInput"), Some("café &=".as_bytes()));
    }

    #[test]
    fn test_invalid_utf8_kept_as_bytes() {
        let form = RawForm::parse(b"userInput=%FF%FE&genreInput=x");
        assert_eq!(form.get("userInput"), Some(&[0xff, 0xfe][..]));
    }

    #[test]
    fn test_malformed_escapes_left_literal() {
        let form = RawForm::parse(b"a=100%&b=%zz&c=%4");
        assert_eq!(form.get("a"), Some(&b"100%"[..]));
        assert_eq!(form.get("b"), Some(&b"%zz"[..]));
        assert_eq!(form.get("c"), Some(&b"%4"[..]));
    }

    #[test]
    fn test_encoded_plus_is_not_a_space() {
        let form = RawForm::parse(b"userInput=1%2B1+%3D+2");
        assert_eq!(form.get("userInput"), Some(&b"1+1 = 2"[..]));
    }

    #[test]
    fn test_first_value_wins_and_empty_values() {
        let form = RawForm::parse(b"a=1&a=2&b=&c");
        assert_eq!(form.get("a"), Some(&b"1"[..]));
        assert_eq!(form.get("b"), Some(&b""[..]));
        assert_eq!(form.get("c"), Some(&b""[..]));
    }
}
