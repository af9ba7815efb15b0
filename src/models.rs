//! Data models for the clinic CRM client.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The two kinds of billable line items an appointment accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Medicine handed out or administered.
    Medicine,
    /// Procedures performed.
    Procedure,
}

impl LineKind {
    pub const ALL: [LineKind; 2] = [LineKind::Medicine, LineKind::Procedure];

    /// Singular label used on input fields.
    pub fn label(self) -> &'static str {
        match self {
            LineKind::Medicine => "Medicine",
            LineKind::Procedure => "Procedure",
        }
    }

    /// Heading used on panels and tables.
    pub fn heading(self) -> &'static str {
        match self {
            LineKind::Medicine => "Medicine",
            LineKind::Procedure => "Procedures",
        }
    }

    /// Backend path of the catalog for this kind.
    pub fn catalog_path(self) -> &'static str {
        match self {
            LineKind::Medicine => "/drugs/drugs/get",
            LineKind::Procedure => "/procedure/procedures/get",
        }
    }
}

/// Subject identifier of the signed-in user, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// Returns `None` for an empty or blank subject.
    pub fn new(sub: impl Into<String>) -> Option<Self> {
        let sub = sub.into();
        let trimmed = sub.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selectable medicine or procedure from the user's catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntity {
    pub name: String,
    #[serde(deserialize_with = "decimal_from_json")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    /// Subject of the user owning this catalog row.
    #[serde(rename = "sub", default)]
    pub owner_ref: String,
}

/// One used/done row of an appointment ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    pub quantity: Decimal,
}

impl LedgerEntry {
    /// `price * quantity`, or `None` when the product does not fit a `Decimal`.
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

/// A client record as returned by the client search endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default, deserialize_with = "string_from_json")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "string_from_json")]
    pub phone: String,
    #[serde(default, deserialize_with = "string_from_json")]
    pub business_id: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default, deserialize_with = "string_from_json")]
    pub zip_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub country: String,
    /// Patient identifiers; anything other than an array decodes as empty.
    #[serde(default, deserialize_with = "patients_from_json")]
    pub patients: Vec<String>,
}

/// Body of `POST /client/client/search`.
#[derive(Debug, Serialize)]
pub struct ClientSearchRequest<'a> {
    pub sub: &'a str,
    pub name: &'a str,
}

/// Response of `POST /client/client/search`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ClientSearchResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub clients: Vec<Client>,
}

fn decimal_from_json<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = match &value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a number, found {other}"
            )))
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(serde::de::Error::custom)
}

fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn patients_from_json<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_identity_rejects_blank() {
        assert!(Identity::new("").is_none());
        assert!(Identity::new("   ").is_none());
        assert_eq!(Identity::new(" auth0|42 ").unwrap().as_str(), "auth0|42");
    }

    #[test]
    fn test_catalog_entity_decodes_numeric_and_string_prices() {
        let json = r#"[
            {"name": "Aspirin", "price": 10, "description": "pain", "sub": "u1"},
            {"name": "Saline", "price": 2.5, "description": "", "sub": "u1"},
            {"name": "Gauze", "price": "1.25"}
        ]"#;
        let entities: Vec<CatalogEntity> = serde_json::from_str(json).unwrap();
        assert_eq!(entities[0].price, dec!(10));
        assert_eq!(entities[0].owner_ref, "u1");
        assert_eq!(entities[1].price, dec!(2.5));
        assert_eq!(entities[2].price, dec!(1.25));
        assert_eq!(entities[2].description, "");
    }

    #[test]
    fn test_catalog_entity_rejects_non_numeric_price() {
        let json = r#"{"name": "Aspirin", "price": "ten"}"#;
        assert!(serde_json::from_str::<CatalogEntity>(json).is_err());
    }

    #[test]
    fn test_client_decodes_camel_case_and_patients() {
        let json = r#"{
            "message": "ok",
            "clients": [
                {"id": "c1", "name": "Jane Doe", "businessId": "B-7", "streetAddress": "Main 1",
                 "zipCode": 12345, "patients": ["p1", "p2"], "_id": "mongo"},
                {"id": "c2", "name": "John Roe", "patients": ""}
            ]
        }"#;
        let response: ClientSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message, "ok");
        let jane = &response.clients[0];
        assert_eq!(jane.business_id, "B-7");
        assert_eq!(jane.street_address, "Main 1");
        assert_eq!(jane.zip_code, "12345");
        assert_eq!(jane.patients, vec!["p1".to_string(), "p2".to_string()]);
        assert!(response.clients[1].patients.is_empty());
    }

    #[test]
    fn test_search_request_body_shape() {
        let body = ClientSearchRequest {
            sub: "u1",
            name: "Jane",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"sub": "u1", "name": "Jane"}));
    }
}
