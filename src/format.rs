use crate::{config::CURRENCY_SUFFIX, models::TransactionType};

/// `1234.5` → `"1234.50 Fca"`. Non-finite values (a `NaN` balance) show as `"- Fca"`.
pub fn format_money(amount: f64) -> String {
    if amount.is_finite() {
        format!("{:.2} {}", amount, CURRENCY_SUFFIX)
    } else {
        format!("- {}", CURRENCY_SUFFIX)
    }
}

pub fn type_label(kind: &TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "Entrée",
        _ => "Sortie",
    }
}

/// Text colour for a transaction card, keyed on the lower-cased type.
pub fn type_class(kind: &TransactionType) -> &'static str {
    match kind.as_str().to_lowercase().as_str() {
        "income" => "text-emerald-400 font-semibold",
        "expense" => "text-rose-400 font-semibold",
        "other" => "text-orange-400 font-semibold",
        _ => "text-orange-300 font-semibold",
    }
}

#[cfg(test)]
mod tests {
    use crate::models::TransactionType;

    use super::{format_money, type_class, type_label};

    #[test]
    fn money_has_two_decimals_and_currency() {
        assert_eq!(format_money(60.0), "60.00 Fca");
        assert_eq!(format_money(-12.5), "-12.50 Fca");
    }

    #[test]
    fn nan_is_not_printed() {
        assert_eq!(format_money(f64::NAN), "- Fca");
    }

    #[test]
    fn labels_and_classes_follow_the_type() {
        assert_eq!(type_label(&TransactionType::Income), "Entrée");
        assert_eq!(type_label(&TransactionType::Expense), "Sortie");
        assert_eq!(
            type_class(&TransactionType::Other("INCOME".to_string())),
            "text-emerald-400 font-semibold"
        );
        assert_eq!(
            type_class(&TransactionType::Other("gift".to_string())),
            "text-orange-300 font-semibold"
        );
    }
}
