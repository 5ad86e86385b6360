use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

/// A clinical escalation request ("solicitação TRR"). The `solicitacoes`
/// table is owned by the surrounding platform; this service only reads the
/// record shape, either embedded in a database webhook event or referenced
/// by a `ScheduledNotification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solicitacao {
    pub id: ID,
    pub paciente: Option<String>,
    pub leito: Option<String>,
    pub motivo: Option<String>,
    /// Modified Early Warning Score; drives the urgency classification
    pub mews: Option<i32>,
    pub hospital_id: Option<String>,
    pub status: Option<String>,
}

/// The hospital "código" color derived from a MEWS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MewsLevel {
    Azul,
    Verde,
    Amarelo,
    Laranja,
    Vermelho,
}

impl MewsLevel {
    pub fn from_score(mews: i32) -> Self {
        if mews >= 7 {
            Self::Vermelho
        } else if mews >= 5 {
            Self::Laranja
        } else if mews >= 3 {
            Self::Amarelo
        } else if mews >= 1 {
            Self::Verde
        } else {
            Self::Azul
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Azul => "Código Azul",
            Self::Verde => "Código Verde",
            Self::Amarelo => "Código Amarelo",
            Self::Laranja => "Código Laranja",
            Self::Vermelho => "Código Vermelho",
        }
    }

    /// Only a red code is treated as high urgency at the delivery surface.
    pub fn is_high_urgency(&self) -> bool {
        matches!(self, Self::Vermelho)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_maps_mews_scores_to_levels() {
        let cases = vec![
            (0, MewsLevel::Azul),
            (1, MewsLevel::Verde),
            (3, MewsLevel::Amarelo),
            (5, MewsLevel::Laranja),
            (7, MewsLevel::Vermelho),
            (10, MewsLevel::Vermelho),
        ];
        for (score, expected) in cases {
            assert_eq!(MewsLevel::from_score(score), expected);
        }
    }

    #[test]
    fn only_red_code_is_high_urgency() {
        for score in 0..7 {
            assert!(!MewsLevel::from_score(score).is_high_urgency());
        }
        assert!(MewsLevel::from_score(7).is_high_urgency());
        assert!(MewsLevel::from_score(12).is_high_urgency());
    }
}
