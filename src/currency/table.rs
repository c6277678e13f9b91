//! Currencies the bot understands, by ISO code and Chinese display name.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
}

impl Currency {
    /// `美元 (USD)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

pub const SUPPORTED_CURRENCIES: &[Currency] = &[
    Currency { code: "USD", name: "美元" },
    Currency { code: "AUD", name: "澳元" },
    Currency { code: "BGN", name: "保加利亚列弗" },
    Currency { code: "CAD", name: "加拿大元" },
    Currency { code: "CHF", name: "瑞士法郎" },
    Currency { code: "CNY", name: "人民币" },
    Currency { code: "EGP", name: "埃及镑" },
    Currency { code: "EUR", name: "欧元" },
    Currency { code: "GBP", name: "英镑" },
    Currency { code: "JPY", name: "日元" },
    Currency { code: "INR", name: "印度卢比" },
    Currency { code: "RUB", name: "俄罗斯卢布" },
    Currency { code: "HKD", name: "港币" },
    Currency { code: "MOP", name: "澳门元" },
    Currency { code: "TWD", name: "新台币" },
    Currency { code: "KRW", name: "韩元" },
    Currency { code: "SGD", name: "新加坡元" },
    Currency { code: "NZD", name: "新西兰元" },
    Currency { code: "THB", name: "泰铢" },
];

/// Resolve a user-facing label to its code. Accepts the display name or the
/// code itself (ASCII case-insensitive).
pub fn resolve(name: &str) -> Option<&'static str> {
    let name = name.trim();
    SUPPORTED_CURRENCIES
        .iter()
        .find(|c| c.name == name || c.code.eq_ignore_ascii_case(name))
        .map(|c| c.code)
}
