use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// The direction of a transaction. Values other than `income` and `expense`
/// are kept verbatim so they survive an edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Income,
    Expense,
    Other(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Other(other) => other,
        }
    }

    /// `+1` for income, `-1` for everything else.
    pub fn sign(&self) -> f64 {
        match self {
            TransactionType::Income => 1.0,
            _ => -1.0,
        }
    }
}

impl From<String> for TransactionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "income" => TransactionType::Income,
            "expense" => TransactionType::Expense,
            _ => TransactionType::Other(value),
        }
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: String,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Transaction {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    fn value(self) -> f64 {
        match self {
            RawAmount::Number(amount) => amount,
            RawAmount::Text(text) => parse_amount(&text).unwrap_or(f64::NAN),
        }
    }
}

/// Amounts arrive either as JSON numbers or as numeric strings (decimal
/// columns). A string that does not parse becomes `NaN`.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawAmount::deserialize(deserializer)?.value())
}

/// Like [deserialize_amount], with `null` read as `None`.
fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawAmount>::deserialize(deserializer)?.map(RawAmount::value))
}

/// Parse an amount typed by the user or sent as a string by the server.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// The body of `POST /transactions` and `PUT /transactions/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionDraft {
    pub category_name: String,
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// The body returned by `/login` and `/register`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ForgotPasswordResponse {
    #[serde(default)]
    pub success: bool,
}

/// What the profile form submits. The image is only sent when the user
/// picked a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub image: Option<web_sys::File>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowTotals {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub income: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub expense: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatRow {
    pub label: String,
    pub totals: FlowTotals,
}

/// Income and expense per label (category name or month), in the order the
/// server sent them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct StatsTable(pub Vec<StatRow>);

impl StatsTable {
    pub fn rows(&self) -> &[StatRow] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The largest income or expense in the table, used to scale bars.
    pub fn peak(&self) -> f64 {
        self.0
            .iter()
            .flat_map(|row| [row.totals.income, row.totals.expense])
            .fold(0.0, f64::max)
    }
}

impl TryFrom<Map<String, Value>> for StatsTable {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        map.into_iter()
            .map(|(label, totals)| {
                Ok(StatRow {
                    label,
                    totals: serde_json::from_value(totals)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(StatsTable)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_income: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub total_expense: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub balance: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub budget: f64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{StatsTable, Summary, Transaction, TransactionDraft, TransactionType, User};

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        let from_number: Transaction = serde_json::from_value(json!({
            "id": 1, "title": "Salaire", "amount": 1500, "type": "income", "date": "2024-01-31"
        }))
        .unwrap();
        let from_string: Transaction = serde_json::from_value(json!({
            "id": 2, "title": "Lunch", "amount": "12.50", "type": "expense", "date": "2024-01-01",
            "category": { "name": "Food" }
        }))
        .unwrap();

        assert_eq!(from_number.amount, 1500.0);
        assert_eq!(from_string.amount, 12.5);
        assert_eq!(from_string.category_name(), Some("Food"));
    }

    #[test]
    fn unparseable_amount_string_becomes_nan() {
        let transaction: Transaction = serde_json::from_value(json!({
            "id": 3, "title": "?", "amount": "douze", "type": "expense", "date": "2024-01-01"
        }))
        .unwrap();

        assert!(transaction.amount.is_nan());
    }

    #[test]
    fn unknown_transaction_types_are_kept_verbatim() {
        let transaction: Transaction = serde_json::from_value(json!({
            "id": 4, "title": "Transfert", "amount": 10, "type": "transfer", "date": "2024-02-01"
        }))
        .unwrap();

        assert_eq!(transaction.kind, TransactionType::Other("transfer".to_string()));
        assert_eq!(transaction.kind.sign(), -1.0);
        assert_eq!(serde_json::to_value(&transaction).unwrap()["type"], "transfer");
    }

    #[test]
    fn draft_serializes_with_api_field_names() {
        let draft = TransactionDraft {
            category_name: "Food".to_string(),
            title: "Lunch".to_string(),
            amount: 12.5,
            kind: TransactionType::Expense,
            date: "2024-01-01".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({
                "category_name": "Food",
                "title": "Lunch",
                "amount": 12.5,
                "type": "expense",
                "date": "2024-01-01"
            })
        );
    }

    #[test]
    fn user_without_optional_fields_round_trips_through_storage() {
        let user: User =
            serde_json::from_str(r#"{"id":7,"name":"Awa","email":"awa@example.com"}"#).unwrap();

        let stored = serde_json::to_string(&user).unwrap();

        assert_eq!(stored, r#"{"id":7,"name":"Awa","email":"awa@example.com"}"#);
        assert_eq!(user.budget, None);
    }

    #[test]
    fn stats_table_keeps_server_order() {
        let table: StatsTable = serde_json::from_str(
            r#"{"Transport":{"income":0,"expense":30},"Alimentation":{"income":5,"expense":120}}"#,
        )
        .unwrap();

        let labels: Vec<&str> = table.rows().iter().map(|row| row.label.as_str()).collect();

        assert_eq!(labels, ["Transport", "Alimentation"]);
        assert_eq!(table.peak(), 120.0);
    }

    #[test]
    fn decimal_strings_are_accepted_in_every_money_field() {
        let user: User = serde_json::from_value(json!({
            "id": 7, "name": "Awa", "email": "awa@example.com", "budget": "1500.00"
        }))
        .unwrap();
        let summary: Summary = serde_json::from_value(json!({
            "total_income": "900.50", "total_expense": 120, "balance": "780.50", "budget": "1000"
        }))
        .unwrap();
        let table: StatsTable =
            serde_json::from_str(r#"{"Loyer":{"income":"0","expense":"150000.00"}}"#).unwrap();

        assert_eq!(user.budget, Some(1500.0));
        assert_eq!(summary.total_income, 900.5);
        assert_eq!(summary.balance, 780.5);
        assert_eq!(table.rows()[0].totals.expense, 150000.0);
    }

    #[test]
    fn null_budget_is_absent() {
        let user: User = serde_json::from_value(json!({
            "id": 7, "name": "Awa", "email": "awa@example.com", "budget": null
        }))
        .unwrap();

        assert_eq!(user.budget, None);
    }
}
