use std::fmt;

use serde::{Deserialize, Serialize};

/// Valeur stockée dans le pool de constantes d'un chunk.
///
/// Seuls les littéraux numériques existent pour l'instant. `untagged` garde
/// la forme JSON naturelle (`[1.2, 3.4]`) dans les images de chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
