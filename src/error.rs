// src/error.rs
use thiserror::Error;

/// Everything the store and engines can refuse.
/// Validation variants carry the user-facing message; none of them leave the document changed.
#[derive(Debug, Error)]
pub enum PenaError {
    #[error("Nombre requerido")]
    MissingName,

    #[error("Selecciona la fecha del sorteo")]
    MissingDrawDate,

    #[error("Selecciona el mes de pago")]
    MissingPayMonth,

    #[error("Mes de pago no válido: {0} (se espera YYYY-MM)")]
    InvalidPayMonth(String),

    #[error("No hay jugadores aptos para {day} con el mes de pago {month}")]
    NoEligiblePlayers { day: String, month: String },

    #[error("Faltan números (se necesitan {expected}, hay {got})")]
    NotEnoughNumbers { expected: usize, got: usize },

    #[error("Faltan estrellas (se necesitan {expected}, hay {got})")]
    NotEnoughStars { expected: usize, got: usize },

    #[error("Apuesta no válida: {0}")]
    InvalidBet(String),

    #[error("Introduce 5 números y 2 estrellas para la apuesta fija")]
    InvalidFixedBet,

    #[error("Participante no encontrado: {0}")]
    UnknownParticipant(String),

    #[error("Sorteo no encontrado: {0}")]
    UnknownDraw(String),

    #[error("Apuesta no encontrada: {0}")]
    UnknownBet(String),

    #[error("Apuesta fija no encontrada: #{0}")]
    UnknownFixedBet(usize),

    #[error("El archivo no parece un respaldo válido: {0}")]
    InvalidBackup(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PenaError>;
