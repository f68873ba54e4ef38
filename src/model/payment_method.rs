use crate::model::lenient;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The kind of funding source a payment method draws from.
///
/// Documents may carry types this version does not know; those are kept as `Other` and written
/// back unchanged. Parsing from the command line only accepts the known types.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PaymentMethodType {
    #[default]
    Cash,
    Card,
    Bank,
    Other(String),
}

impl PaymentMethodType {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethodType::Cash => "cash",
            PaymentMethodType::Card => "card",
            PaymentMethodType::Bank => "bank",
            PaymentMethodType::Other(s) => s,
        }
    }

    fn from_stored(s: String) -> Self {
        match s.as_str() {
            "cash" => PaymentMethodType::Cash,
            "card" => PaymentMethodType::Card,
            "bank" => PaymentMethodType::Bank,
            _ => PaymentMethodType::Other(s),
        }
    }
}

/// Returned when parsing a payment method type that is not one of cash, card or bank.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown payment method type '{0}', expected one of: cash, card, bank")]
pub struct UnknownPaymentMethodType(String);

impl FromStr for PaymentMethodType {
    type Err = UnknownPaymentMethodType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match PaymentMethodType::from_stored(s.trim().to_lowercase()) {
            PaymentMethodType::Other(_) => Err(UnknownPaymentMethodType(s.to_string())),
            known => Ok(known),
        }
    }
}

impl Display for PaymentMethodType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentMethodType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentMethodType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match lenient::optional_string(deserializer)? {
            Some(s) if !s.is_empty() => PaymentMethodType::from_stored(s),
            _ => PaymentMethodType::default(),
        })
    }
}

/// A named funding source that expenses can be attributed to.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub icon: String,
    #[serde(rename = "type", default)]
    pub r#type: PaymentMethodType,
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, Value>,
}

/// The fields a caller supplies when adding a payment method. The id is minted by the store.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewPaymentMethod {
    pub name: String,
    pub icon: String,
    pub r#type: PaymentMethodType,
}

pub(crate) fn default_payment_methods() -> Vec<PaymentMethod> {
    vec![PaymentMethod {
        id: "cash".to_string(),
        name: "Cash".to_string(),
        icon: "💵".to_string(),
        r#type: PaymentMethodType::Cash,
        other_fields: BTreeMap::new(),
    }]
}
