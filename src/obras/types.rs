//! Production records as the API sends and receives them

use serde::{Deserialize, Deserializer, Serialize};

/// A production ("obra") held by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obra {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "diretor", default, deserialize_with = "null_as_default")]
    pub director: String,

    /// ISO date (`YYYY-MM-DD`)
    #[serde(rename = "data", default, deserialize_with = "null_as_default")]
    pub date: String,

    #[serde(rename = "local", default, deserialize_with = "null_as_default")]
    pub venue: String,

    #[serde(rename = "elenco", default, deserialize_with = "null_as_default")]
    pub cast: String,

    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rating between 1 and 10
    #[serde(rename = "nota", default, deserialize_with = "null_as_default")]
    pub rating: i32,
}

impl Obra {
    /// Case-insensitive match on name or director
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.director.to_lowercase().contains(&term)
    }
}

/// Request body for creating or updating an obra
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObraPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "diretor")]
    pub director: String,
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "local")]
    pub venue: String,
    #[serde(rename = "elenco")]
    pub cast: String,
    #[serde(rename = "nota")]
    pub rating: i32,
}

// the backend serializes unset columns as explicit nulls
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
