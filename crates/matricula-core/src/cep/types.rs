//! Wire and domain types for the CEP lookup service

use serde::{Deserialize, Serialize};

/// Raw response body returned by a ViaCEP-compatible endpoint
///
/// Every address field is optional on the wire. When the CEP is
/// well-formed but unknown, the service responds 200 with an `erro`
/// marker instead of address data.
#[derive(Debug, Clone, Deserialize)]
pub struct CepResponse {
    pub logradouro: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub localidade: Option<String>,
    pub uf: Option<String>,
    #[serde(default)]
    pub erro: Option<ErroFlag>,
}

/// Boolean-like `erro` marker
///
/// The service has emitted both `"erro": true` and `"erro": "true"`
/// over time, so both encodings are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErroFlag {
    Bool(bool),
    Text(String),
}

impl ErroFlag {
    /// Whether the marker is truthy
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(value) => value == "true",
        }
    }
}

impl CepResponse {
    /// Whether the service flagged this CEP as nonexistent
    pub fn cep_not_found(&self) -> bool {
        self.erro.as_ref().is_some_and(ErroFlag::is_set)
    }
}

/// Address fragment produced from a successful lookup
///
/// Field names are translated to the domain vocabulary (`localidade`
/// becomes `city`, `uf` becomes `state`). Fields the service omitted
/// are substituted with empty strings so callers never see absent
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CepAddress {
    pub street: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl From<CepResponse> for CepAddress {
    fn from(response: CepResponse) -> Self {
        Self {
            street: response.logradouro.unwrap_or_default(),
            complement: response.complemento.unwrap_or_default(),
            neighborhood: response.bairro.unwrap_or_default(),
            city: response.localidade.unwrap_or_default(),
            state: response.uf.unwrap_or_default(),
        }
    }
}
