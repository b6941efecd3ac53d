//! Money, percentage and date rendering for the shell. Brazilian
//! conventions are the default (`R$ 1.234,50`, `15/06/2024`).

use chrono::NaiveDate;

/// Number formatting preferences derived from a locale tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleFormat {
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub day_first: bool,
}

impl LocaleFormat {
    pub const PT_BR: LocaleFormat = LocaleFormat {
        decimal_separator: ',',
        grouping_separator: '.',
        day_first: true,
    };

    pub const EN_US: LocaleFormat = LocaleFormat {
        decimal_separator: '.',
        grouping_separator: ',',
        day_first: false,
    };

    /// Unknown tags fall back to the Brazilian layout.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en-us" | "en" => Self::EN_US,
            "en-gb" => LocaleFormat {
                day_first: true,
                ..Self::EN_US
            },
            _ => Self::PT_BR,
        }
    }
}

impl Default for LocaleFormat {
    fn default() -> Self {
        Self::PT_BR
    }
}

pub fn symbol_for(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        other => other.into(),
    }
}

pub fn format_number(locale: &LocaleFormat, value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value.abs());
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part, locale.grouping_separator);
    if let Some(fraction) = fraction {
        rendered.push(locale.decimal_separator);
        rendered.push_str(fraction);
    }
    // Values that round to zero carry no sign.
    if value < 0.0 && rendered.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        rendered.insert(0, '-');
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// `R$ 1.234,50`, `-R$ 12,00`.
pub fn format_currency(amount: f64, currency: &str, locale: &LocaleFormat) -> String {
    let body = format_number(locale, amount, 2);
    let symbol = symbol_for(currency);
    match body.strip_prefix('-') {
        Some(positive) => format!("-{symbol} {positive}"),
        None => format!("{symbol} {body}"),
    }
}

/// Percentage with one decimal: `80,0%`.
pub fn format_percent(value: f64, locale: &LocaleFormat) -> String {
    format!("{}%", format_number(locale, value, 1))
}

pub fn format_date(locale: &LocaleFormat, date: NaiveDate) -> String {
    if locale.day_first {
        date.format("%d/%m/%Y").to_string()
    } else {
        date.format("%m/%d/%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brazilian_money_layout() {
        let locale = LocaleFormat::PT_BR;
        assert_eq!(format_currency(1234.5, "BRL", &locale), "R$ 1.234,50");
        assert_eq!(format_currency(-12.0, "BRL", &locale), "-R$ 12,00");
        assert_eq!(format_currency(0.0, "BRL", &locale), "R$ 0,00");
        assert_eq!(format_currency(1_000_000.0, "BRL", &locale), "R$ 1.000.000,00");
    }

    #[test]
    fn tiny_negatives_do_not_show_a_sign() {
        assert_eq!(format_number(&LocaleFormat::PT_BR, -0.001, 2), "0,00");
    }

    #[test]
    fn us_layout_and_percent() {
        let locale = LocaleFormat::from_tag("en-US");
        assert_eq!(format_currency(1234.5, "USD", &locale), "$ 1,234.50");
        assert_eq!(format_percent(80.0, &LocaleFormat::PT_BR), "80,0%");
    }

    #[test]
    fn dates_follow_locale_order() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(format_date(&LocaleFormat::PT_BR, date), "15/06/2024");
        assert_eq!(format_date(&LocaleFormat::EN_US, date), "06/15/2024");
    }
}
