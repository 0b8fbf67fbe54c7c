//! CEP lookup
//!
//! Client and types for resolving Brazilian postal codes (CEPs) through
//! a ViaCEP-compatible address service. The request shape is
//! `GET {base_url}/{cep}/json/`.

mod client;
mod types;

pub use client::{CepClient, CepClientBuilder, VIACEP_BASE_URL};
pub use types::{CepAddress, CepResponse, ErroFlag};

/// Strip hyphens from a postal code, `"01001-000"` becomes `"01001000"`
pub fn normalize_cep(cep: &str) -> String {
    cep.replace('-', "")
}
