//! Classifies chat text into one of the plugin's command families.

pub const CALORIE_PREFIX: &str = "卡路里";
pub const EXCHANGE_PREFIX: &str = "汇率";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Food item to look up; may be empty
    CalorieLookup(&'a str),
    /// Raw conversion expression, e.g. `1000 人民币 到 美元`
    CurrencyConversion(&'a str),
    NoMatch,
}

/// Prefixes are matched byte-for-byte against the trimmed text.
pub fn route(text: &str) -> Command<'_> {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix(CALORIE_PREFIX) {
        Command::CalorieLookup(rest.trim())
    } else if let Some(rest) = text.strip_prefix(EXCHANGE_PREFIX) {
        Command::CurrencyConversion(rest.trim())
    } else {
        Command::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calorie_prefix() {
        assert_eq!(route("卡路里 土豆"), Command::CalorieLookup("土豆"));
        assert_eq!(route("  卡路里土豆  "), Command::CalorieLookup("土豆"));
    }

    #[test]
    fn test_calorie_prefix_with_empty_argument() {
        assert_eq!(route("卡路里"), Command::CalorieLookup(""));
        assert_eq!(route("卡路里   "), Command::CalorieLookup(""));
    }

    #[test]
    fn test_exchange_prefix() {
        assert_eq!(
            route("汇率 1000 人民币 到 美元"),
            Command::CurrencyConversion("1000 人民币 到 美元")
        );
    }

    #[test]
    fn test_only_leading_prefix_is_stripped() {
        assert_eq!(
            route("卡路里 卡路里饼干"),
            Command::CalorieLookup("卡路里饼干")
        );
    }

    #[test]
    fn test_no_match() {
        for text in ["", "hello", "查询卡路里 土豆", "/start", "汇 率 100 USD 到 CNY", "calorie potato"] {
            assert_eq!(route(text), Command::NoMatch, "text: {text:?}");
        }
    }
}
