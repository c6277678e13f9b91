use crate::currency::table::SUPPORTED_CURRENCIES;
use crate::currency::SEPARATOR;
use crate::router::{CALORIE_PREFIX, EXCHANGE_PREFIX};

/// Usage text shown by `/help`, including every supported currency.
pub fn help_text() -> String {
    let mut text = format!(
        "该插件支持以下功能：\n\
         1. 查询食物的卡路里：输入【{cal} [食物名称]】\n\
         2. 进行货币转换：输入【{fx} [金额] [源货币] {sep} [目标货币]】\n\n\
         示例：\n  \
         - 【{cal} 土豆】将返回土豆的卡路里信息。\n  \
         - 【{fx} 1000 人民币 {sep} 美元】将返回1000人民币等于多少美元。\n\n\
         支持的货币符号及名称：\n",
        cal = CALORIE_PREFIX,
        fx = EXCHANGE_PREFIX,
        sep = SEPARATOR,
    );

    for currency in SUPPORTED_CURRENCIES {
        text.push_str(&format!("  - {}: {}\n", currency.code, currency.label()));
    }

    text.push_str("\n请根据上述格式输入查询内容。");
    text
}
